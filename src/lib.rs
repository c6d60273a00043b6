pub mod commands;
pub mod config;
pub mod doctor;
pub mod fs_utils;
pub mod pathvar;
pub mod paths;
pub mod profile;
pub mod profiles;
pub mod script;
pub mod ui;

#[cfg(test)]
pub mod test_utils;

pub use pathvar::{EnvSnapshot, expand_env, remove_segments};
pub use profile::{Profile, ProfileError, parse_profile};
pub use script::{build_load_script, build_unload_script};
