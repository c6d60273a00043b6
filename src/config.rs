//! Configuration discovery.
//!
//! The config file is YAML with a single recognised key:
//!
//! ```yaml
//! ProfilesLocation: ~/dotfiles/envy
//! ```
//!
//! Resolution order for the profiles directory:
//! 1. `PROFILESLOCATION` environment variable, when set and non-empty
//! 2. `ProfilesLocation` in the config file (`--config` or `~/.envy/config.yaml`)
//! 3. `~/.envy/profiles`

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::pathvar::{EnvSnapshot, expand_env};
use crate::paths::Paths;

/// Environment variable that overrides `ProfilesLocation`
pub const PROFILES_LOCATION_ENV: &str = "PROFILESLOCATION";

/// On-disk shape of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(rename = "ProfilesLocation", default)]
    pub profiles_location: Option<String>,
}

impl ConfigFile {
    /// Read and parse a config file
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml_ng::from_str::<Option<Self>>(&content)
            .map(Option::unwrap_or_default)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `<name>.yaml` profile files
    pub profiles_dir: PathBuf,
    /// The config file that was read, if any
    pub source: Option<PathBuf>,
}

impl Config {
    /// Resolve the configuration.
    ///
    /// An explicit `config_path` must exist. The default config file is
    /// optional.
    pub fn load(paths: &Paths, config_path: Option<&Path>, env: &EnvSnapshot) -> Result<Self> {
        let (file, source) = match config_path {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file not found: {}", path.display());
                }
                (ConfigFile::read(path)?, Some(path.to_path_buf()))
            }
            None if paths.config_file.exists() => (
                ConfigFile::read(&paths.config_file)?,
                Some(paths.config_file.clone()),
            ),
            None => (ConfigFile::default(), None),
        };

        let location = env
            .get(PROFILES_LOCATION_ENV)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .or(file.profiles_location.filter(|v| !v.trim().is_empty()));

        let profiles_dir = match location {
            Some(raw) => paths.expand_home(expand_env(raw.trim(), env).as_str()),
            None => paths.default_profiles_dir.clone(),
        };

        Ok(Self {
            profiles_dir,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_paths;
    use tempfile::TempDir;

    fn no_env() -> EnvSnapshot {
        EnvSnapshot::default()
    }

    #[test]
    fn test_defaults_without_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);

        let config = Config::load(&paths, None, &no_env()).unwrap();
        assert_eq!(config.profiles_dir, paths.default_profiles_dir);
        assert!(config.source.is_none());
    }

    #[test]
    fn test_reads_default_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        fs::create_dir_all(&paths.base_dir).unwrap();
        fs::write(&paths.config_file, "ProfilesLocation: ~/my-profiles\n").unwrap();

        let config = Config::load(&paths, None, &no_env()).unwrap();
        assert_eq!(config.profiles_dir, temp_dir.path().join("my-profiles"));
        assert_eq!(config.source.as_deref(), Some(paths.config_file.as_path()));
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        let missing = temp_dir.path().join("nope.yaml");

        let err = Config::load(&paths, Some(&missing), &no_env()).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_explicit_config_expands_vars() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        let custom = temp_dir.path().join("custom.yaml");
        fs::write(&custom, "ProfilesLocation: $DOTFILES/envy\nOther: ignored\n").unwrap();

        let env = EnvSnapshot::from_pairs([("DOTFILES", "/srv/dotfiles")]);
        let config = Config::load(&paths, Some(&custom), &env).unwrap();
        assert_eq!(config.profiles_dir, PathBuf::from("/srv/dotfiles/envy"));
    }

    #[test]
    fn test_env_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        fs::create_dir_all(&paths.base_dir).unwrap();
        fs::write(&paths.config_file, "ProfilesLocation: /from/file\n").unwrap();

        let env = EnvSnapshot::from_pairs([(PROFILES_LOCATION_ENV, "/from/env")]);
        let config = Config::load(&paths, None, &env).unwrap();
        assert_eq!(config.profiles_dir, PathBuf::from("/from/env"));

        let env = EnvSnapshot::from_pairs([(PROFILES_LOCATION_ENV, "")]);
        let config = Config::load(&paths, None, &env).unwrap();
        assert_eq!(config.profiles_dir, PathBuf::from("/from/file"));
    }

    #[test]
    fn test_empty_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        fs::create_dir_all(&paths.base_dir).unwrap();
        fs::write(&paths.config_file, "").unwrap();

        let config = Config::load(&paths, None, &no_env()).unwrap();
        assert_eq!(config.profiles_dir, paths.default_profiles_dir);
    }

    #[test]
    fn test_corrupt_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = setup_test_paths(&temp_dir);
        fs::create_dir_all(&paths.base_dir).unwrap();
        fs::write(&paths.config_file, "ProfilesLocation: [unclosed").unwrap();

        let err = Config::load(&paths, None, &no_env()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
