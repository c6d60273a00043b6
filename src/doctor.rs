//! Diagnostic tool for envy.
//!
//! This module implements the `envy doctor` command, which checks the setup
//! for common issues:
//! - Which config file is in effect and where profiles are read from.
//! - Whether every profile file parses.
//! - Entries that generate broken shell (unescaped quotes, bad names).
//! - Path entries that don't exist on disk.
//!
//! It reports issues to the user with a pass/fail/warn status.

use std::path::Path;

use crate::config::{Config, PROFILES_LOCATION_ENV};
use crate::pathvar::{EnvSnapshot, PATH_SEPARATOR, expand_env};
use crate::paths::Paths;
use crate::profile::Profile;
use crate::profiles::{list_profiles, read_profile};
use crate::ui::{ALERT, BOLD, DIM, Mark, Ui};

/// Run the doctor diagnostics
pub fn run_doctor(paths: &Paths, config: &Config, env: &EnvSnapshot, ui: &Ui) {
    ui.heading("envy Doctor");
    ui.blank();

    // 1. Config
    check_step(ui, "Configuration", || {
        match &config.source {
            Some(file) => ui.out(format!(
                "  {} Using config file: {}",
                ui.mark(Mark::Pass),
                file.display()
            )),
            None => ui.out(format!(
                "  {} No config file at {} (using defaults)",
                ui.mark(Mark::Note),
                paths.config_file.display()
            )),
        }
        if let Some(location) = env.get(PROFILES_LOCATION_ENV).filter(|v| !v.is_empty()) {
            ui.out(format!(
                "  {} {} overrides profiles location: {}",
                ui.mark(Mark::Note),
                PROFILES_LOCATION_ENV,
                location
            ));
        }
        true
    });

    // 2. Profiles directory
    check_step(ui, "Profiles Directory", || {
        if config.profiles_dir.is_dir() {
            ui.out(format!(
                "  {} Profiles directory exists: {}",
                ui.mark(Mark::Pass),
                config.profiles_dir.display()
            ));
            true
        } else {
            ui.out(format!(
                "  {} Profiles directory missing: {}",
                ui.mark(Mark::Fail),
                config.profiles_dir.display()
            ));
            false
        }
    });

    // 3. Profiles
    check_step(ui, "Profiles", || {
        let profiles = match list_profiles(&config.profiles_dir) {
            Ok(p) => p,
            Err(e) => {
                ui.out(format!("  {} Failed to list profiles: {}", ui.mark(Mark::Fail), e));
                return false;
            }
        };

        if profiles.is_empty() {
            ui.out(format!("  {} No profiles found", ui.mark(Mark::Warn)));
            return true;
        }

        ui.out(format!("  Found {} profiles:", profiles.len()));
        let mut all_valid = true;

        for name in profiles {
            match read_profile(&config.profiles_dir, &name) {
                Ok(profile) => {
                    let warnings = profile_warnings(&profile, env);
                    if warnings.is_empty() {
                        ui.out(format!("    {} {}", ui.mark(Mark::Pass), name));
                    } else {
                        ui.out(format!("    {} {}", ui.mark(Mark::Warn), name));
                        for warning in warnings {
                            ui.out(format!("        {}", ui.paint(warning, DIM)));
                        }
                    }
                }
                Err(e) => {
                    ui.out(format!("    {} {} ({:#})", ui.mark(Mark::Fail), name, e));
                    all_valid = false;
                }
            }
        }
        all_valid
    });

    // 4. Environment
    check_step(ui, "Environment", || {
        if env.path().is_empty() {
            ui.out(format!(
                "  {} PATH is empty; unload scripts will export an empty PATH",
                ui.mark(Mark::Warn)
            ));
        } else {
            ui.out(format!(
                "  {} PATH has {} segments",
                ui.mark(Mark::Pass),
                env.path().split(PATH_SEPARATOR).count()
            ));
        }
        true
    });
}

/// Problems in a profile that produce broken or surprising shell.
///
/// Nothing here is fatal: the scripts are still generated verbatim.
pub fn profile_warnings(profile: &Profile, env: &EnvSnapshot) -> Vec<String> {
    let mut warnings = Vec::new();

    for (name, value) in &profile.variables {
        if !is_shell_identifier(name) {
            warnings.push(format!("variable '{name}' is not a valid shell identifier"));
        }
        if value.contains('"') || value.contains('`') {
            warnings.push(format!(
                "variable '{name}' contains a double quote or backtick and is not escaped"
            ));
        }
    }

    for name in profile.functions.keys() {
        if !is_shell_identifier(name) {
            warnings.push(format!("function '{name}' is not a valid shell identifier"));
        }
    }

    for (name, command) in &profile.aliases {
        if name.is_empty() || name.contains(|c: char| c.is_whitespace() || "=/$`'\"".contains(c)) {
            warnings.push(format!("alias '{name}' is not a valid alias name"));
        }
        if command.contains('\'') {
            warnings.push(format!(
                "alias '{name}' contains a single quote and is not escaped"
            ));
        }
    }

    for segment in &profile.path {
        if segment.contains(PATH_SEPARATOR) {
            warnings.push(format!("path entry '{segment}' contains '{PATH_SEPARATOR}'"));
            continue;
        }
        let expanded = expand_env(segment, env);
        if !Path::new(&expanded).is_dir() {
            warnings.push(format!("path entry '{segment}' ({expanded}) does not exist"));
        }
    }

    warnings
}

fn is_shell_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn check_step<F>(ui: &Ui, name: &str, check_fn: F)
where
    F: FnOnce() -> bool,
{
    ui.out(ui.paint(format!("Checking {}...", name), BOLD));
    if !check_fn() {
        ui.out(ui.paint("  Issues detected!", ALERT));
    }
    ui.blank();
}
