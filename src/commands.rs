//! High-level command orchestration for the CLI.
//!
//! This module contains the handler functions for each CLI command (`load`,
//! `unload`, `list`, ...). It serves as the coordination layer between:
//! - `crate::config` for the resolved profiles directory.
//! - `crate::profiles` for reading profile files.
//! - `crate::script` for script generation.
//! - `crate::ui` for user-facing output.
//!
//! Each function here generally corresponds to a subcommand in `main.rs`.

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::doctor::run_doctor;
use crate::fs_utils::write_script_file;
use crate::pathvar::EnvSnapshot;
use crate::paths::Paths;
use crate::profile::Profile;
use crate::profiles::{list_profiles, profile_path, read_profile};
use crate::script::{
    POSTLOAD, POSTUNLOAD, PRELOAD, PREUNLOAD, build_load_script, build_unload_script,
};
use crate::ui::{BOLD, DIM, Ui};

/// Which script to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    Load,
    Unload,
}

impl ScriptKind {
    fn verb(self) -> &'static str {
        match self {
            ScriptKind::Load => "load",
            ScriptKind::Unload => "unload",
        }
    }
}

/// Read profile `name` and generate its script
pub fn generate_script(
    config: &Config,
    kind: ScriptKind,
    name: &str,
    env: &EnvSnapshot,
    ui: &Ui,
) -> Result<String> {
    ui.verbose(format!(
        "Reading profile from {}",
        profile_path(&config.profiles_dir, name).display()
    ));
    let profile = read_profile(&config.profiles_dir, name)?;

    Ok(match kind {
        ScriptKind::Load => build_load_script(&profile),
        ScriptKind::Unload => build_unload_script(&profile, env),
    })
}

/// Generate a script and write it to a new `envy_*` file in `dir`,
/// returning the file's path. Nothing is written when generation fails.
pub fn write_script(
    config: &Config,
    kind: ScriptKind,
    name: &str,
    env: &EnvSnapshot,
    dir: &Path,
    ui: &Ui,
) -> Result<PathBuf> {
    let script = generate_script(config, kind, name, env, ui)?;
    let path = write_script_file(dir, &script)
        .with_context(|| format!("Failed to write {} script for '{}'", kind.verb(), name))?;
    ui.verbose(format!("Temp file created: {}", path.display()));
    Ok(path)
}

/// Write the load script for a profile and print the file to source
pub fn load(config: &Config, name: &str, env: &EnvSnapshot, ui: &Ui) -> Result<()> {
    let path = write_script(config, ScriptKind::Load, name, env, &std::env::temp_dir(), ui)?;
    ui.out(path.display().to_string());
    Ok(())
}

/// Write the unload script for a profile and print the file to source
pub fn unload(config: &Config, name: &str, env: &EnvSnapshot, ui: &Ui) -> Result<()> {
    let path = write_script(config, ScriptKind::Unload, name, env, &std::env::temp_dir(), ui)?;
    ui.out(path.display().to_string());
    Ok(())
}

/// Print a generated script to stdout instead of writing a file
pub fn print(config: &Config, name: &str, kind: ScriptKind, env: &EnvSnapshot, ui: &Ui) -> Result<()> {
    let script = generate_script(config, kind, name, env, ui)?;
    ui.out(script);
    Ok(())
}

/// List all available profiles, one per line
pub fn list(config: &Config, ui: &Ui) -> Result<()> {
    ui.verbose(format!(
        "Listing profiles in {}",
        config.profiles_dir.display()
    ));
    let profiles = list_profiles(&config.profiles_dir)?;

    if profiles.is_empty() {
        ui.warn(format!(
            "No profiles found. Create one as {}",
            ui.paint(profile_path(&config.profiles_dir, "<name>").display().to_string(), BOLD)
        ));
        return Ok(());
    }

    for name in &profiles {
        ui.out(name);
    }
    Ok(())
}

/// Show the contents of a profile
pub fn inspect(config: &Config, name: &str, json: bool, ui: &Ui) -> Result<()> {
    let profile = read_profile(&config.profiles_dir, name)?;

    if json {
        let out = serde_json::to_string_pretty(&profile).context("Failed to serialize profile")?;
        ui.out(out);
        return Ok(());
    }

    ui.heading(format!("Profile: {}", name));
    ui.out(ui.paint(profile_path(&config.profiles_dir, name).display().to_string(), DIM));
    ui.blank();

    if profile.is_empty() {
        ui.warn("Profile is empty; loading it changes nothing.");
        return Ok(());
    }

    print_map(ui, "Variables", ["Name", "Value"], &profile.variables);

    if !profile.path.is_empty() {
        let mut table = ui.table(&["#", "Segment"]);
        for (i, segment) in profile.path.iter().enumerate() {
            table.add_row(vec![Cell::new(i + 1), Cell::new(segment)]);
        }
        print_table(ui, "Path", &table);
    }

    print_map(ui, "Functions", ["Name", "Body"], &profile.functions);
    print_map(ui, "Aliases", ["Name", "Command"], &profile.aliases);
    print_hooks(ui, &profile);

    Ok(())
}

fn print_table(ui: &Ui, title: &str, table: &Table) {
    ui.heading(title);
    ui.out(table.to_string());
    ui.blank();
}

fn print_map(ui: &Ui, title: &str, headers: [&str; 2], entries: &BTreeMap<String, String>) {
    if entries.is_empty() {
        return;
    }

    let mut table = ui.table(&headers);
    for (key, value) in entries {
        table.add_row(vec![ui.key_cell(key), Cell::new(value)]);
    }
    print_table(ui, title, &table);
}

fn print_hooks(ui: &Ui, profile: &Profile) {
    let hooks = [
        (PRELOAD, &profile.pre_load),
        (POSTLOAD, &profile.post_load),
        (PREUNLOAD, &profile.pre_unload),
        (POSTUNLOAD, &profile.post_unload),
    ];
    if hooks.iter().all(|(_, body)| body.is_empty()) {
        return;
    }

    let mut table = ui.table(&["Hook", "Body"]);
    for (name, body) in hooks {
        let cell = if body.is_empty() {
            ui.faint_cell("-")
        } else {
            Cell::new(body)
        };
        table.add_row(vec![Cell::new(name), cell]);
    }
    print_table(ui, "Hooks", &table);
}

/// Run diagnostics
pub fn doctor(paths: &Paths, config: &Config, env: &EnvSnapshot, ui: &Ui) -> Result<()> {
    run_doctor(paths, config, env, ui);
    Ok(())
}
