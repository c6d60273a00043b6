//! The profiles directory.
//!
//! Each profile is a `<name>.yaml` file directly inside the configured
//! profiles directory. This module lists them, validates names and reads
//! them into [`Profile`] values.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};

use crate::profile::{Profile, parse_profile};

/// File extension of profile files
pub const PROFILE_EXTENSION: &str = "yaml";

/// List available profile names, sorted
pub fn list_profiles(profiles_dir: &Path) -> Result<Vec<String>> {
    if !profiles_dir.is_dir() {
        bail!(
            "Profile directory does not exist: {}\nHint: Create it, or set ProfilesLocation in your config file.",
            profiles_dir.display()
        );
    }

    let mut profiles = Vec::new();
    for entry in fs::read_dir(profiles_dir).with_context(|| {
        format!(
            "Failed to read profile directory: {}",
            profiles_dir.display()
        )
    })? {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(PROFILE_EXTENSION)
        {
            continue;
        }
        if let Some(name) = path.file_stem().and_then(|n| n.to_str()) {
            profiles.push(name.to_string());
        }
    }
    profiles.sort();
    Ok(profiles)
}

/// Path of the file backing profile `name`
pub fn profile_path(profiles_dir: &Path, name: &str) -> PathBuf {
    profiles_dir.join(format!("{name}.{PROFILE_EXTENSION}"))
}

/// Validate profile name
///
/// Only allows alphanumeric characters, underscores, hyphens and dots, and
/// may not start with a dot.
pub fn validate_profile_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("Profile name cannot be empty");
    }

    if name.chars().count() > 64 {
        bail!("Profile name cannot be longer than 64 characters");
    }

    if name.starts_with('.')
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        bail!(
            "Invalid profile name '{}'.\n\n Only alphanumeric characters, hyphens (-), underscores (_) and dots (.) are allowed.",
            name
        );
    }

    Ok(())
}

/// Read and parse profile `name` from the profiles directory
pub fn read_profile(profiles_dir: &Path, name: &str) -> Result<Profile> {
    validate_profile_name(name)?;

    let path = profile_path(profiles_dir, name);
    if !path.is_file() {
        bail!(
            "Profile '{}' does not exist.\nHint: Use 'envy list' to see available profiles.",
            name
        );
    }

    let raw =
        fs::read(&path).with_context(|| format!("Failed to read profile: {}", path.display()))?;
    parse_profile(&raw).with_context(|| format!("Failed to parse profile: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{setup_test_config, write_profile};
    use tempfile::TempDir;

    #[test]
    fn test_profile_name_validation() {
        assert!(validate_profile_name("work").is_ok());
        assert!(validate_profile_name("my-profile").is_ok());
        assert!(validate_profile_name("test_123").is_ok());
        assert!(validate_profile_name("node.18").is_ok());

        assert!(validate_profile_name("").is_err());
        assert!(validate_profile_name("invalid name").is_err());
        assert!(validate_profile_name("test/profile").is_err());
        assert!(validate_profile_name("../etc").is_err());
        assert!(validate_profile_name(".hidden").is_err());
        assert!(validate_profile_name("emoji😊").is_err());
        assert!(validate_profile_name(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_list_profiles_only_yaml_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let config = setup_test_config(&temp_dir);
        write_profile(&config, "work", "{}");
        write_profile(&config, "alpha", "{}");
        fs::write(config.profiles_dir.join("notes.txt"), "x").unwrap();
        fs::write(config.profiles_dir.join("old.yml"), "x").unwrap();
        fs::create_dir(config.profiles_dir.join("dir.yaml")).unwrap();

        let profiles = list_profiles(&config.profiles_dir).unwrap();
        assert_eq!(profiles, vec!["alpha", "work"]);
    }

    #[test]
    fn test_list_profiles_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let err = list_profiles(&temp_dir.path().join("nope")).unwrap_err();
        assert!(err.to_string().contains("Profile directory does not exist"));
    }

    #[test]
    fn test_read_profile() {
        let temp_dir = TempDir::new().unwrap();
        let config = setup_test_config(&temp_dir);
        write_profile(&config, "work", "variables:\n  FOO: bar\n");

        let profile = read_profile(&config.profiles_dir, "work").unwrap();
        assert_eq!(profile.variables.get("FOO").unwrap(), "bar");
    }

    #[test]
    fn test_read_missing_profile() {
        let temp_dir = TempDir::new().unwrap();
        let config = setup_test_config(&temp_dir);

        let err = read_profile(&config.profiles_dir, "ghost").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_read_corrupt_profile() {
        let temp_dir = TempDir::new().unwrap();
        let config = setup_test_config(&temp_dir);
        write_profile(&config, "broken", "path: [unclosed");

        let err = read_profile(&config.profiles_dir, "broken").unwrap_err();
        assert!(err.to_string().contains("Failed to parse profile"));
    }
}
