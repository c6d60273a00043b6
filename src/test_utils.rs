//! Test utilities shared across test modules

use std::fs;
use std::path::PathBuf;

use crate::config::Config;
use crate::paths::Paths;
use tempfile::TempDir;

/// Create a Paths struct rooted at a temporary home directory
pub fn setup_test_paths(temp_dir: &TempDir) -> Paths {
    Paths::with_home(temp_dir.path())
}

/// Config pointing at an existing, empty profiles directory inside `temp_dir`
pub fn setup_test_config(temp_dir: &TempDir) -> Config {
    let profiles_dir = temp_dir.path().join("profiles");
    fs::create_dir_all(&profiles_dir).unwrap();
    Config {
        profiles_dir,
        source: None,
    }
}

/// Write `<name>.yaml` into the config's profiles directory
pub fn write_profile(config: &Config, name: &str, yaml: &str) -> PathBuf {
    let path = config.profiles_dir.join(format!("{name}.yaml"));
    fs::write(&path, yaml).unwrap();
    path
}
