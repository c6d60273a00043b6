use anyhow::{Context, Result};
use directories::BaseDirs;
use std::path::{Path, PathBuf};

/// All computed paths used by envy
#[derive(Debug, Clone)]
pub struct Paths {
    /// ~/.envy
    pub base_dir: PathBuf,
    /// ~/.envy/config.yaml
    pub config_file: PathBuf,
    /// ~/.envy/profiles, used when the config doesn't name a directory
    pub default_profiles_dir: PathBuf,
    /// The user's home directory, for `~/` expansion in config values
    pub home_dir: PathBuf,
}

impl Paths {
    pub fn new() -> Result<Self> {
        let base_dirs = BaseDirs::new().context("Failed to determine home directory")?;
        Ok(Self::with_home(base_dirs.home_dir()))
    }

    /// Compute the layout rooted at an explicit home directory
    pub fn with_home(home: &Path) -> Self {
        let base_dir = home.join(".envy");
        let config_file = base_dir.join("config.yaml");
        let default_profiles_dir = base_dir.join("profiles");

        Self {
            base_dir,
            config_file,
            default_profiles_dir,
            home_dir: home.to_path_buf(),
        }
    }

    /// Expand a leading `~/` against the home directory
    pub fn expand_home(&self, path: &str) -> PathBuf {
        match path.strip_prefix("~/") {
            Some(rest) => self.home_dir.join(rest),
            None if path == "~" => self.home_dir.clone(),
            None => PathBuf::from(path),
        }
    }
}
