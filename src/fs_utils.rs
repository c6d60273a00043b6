//! Filesystem utility functions

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Prefix of generated script files
pub const SCRIPT_FILE_PREFIX: &str = "envy_";

/// Write a generated script to a new `envy_*` file inside `dir`
///
/// The file is kept after this returns so the caller's shell can source it.
///
/// # Returns
/// The path of the written file
pub fn write_script_file(dir: &Path, script: &str) -> Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix(SCRIPT_FILE_PREFIX)
        .tempfile_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;

    file.write_all(script.as_bytes())
        .with_context(|| format!("Failed to write temp file: {}", file.path().display()))?;
    file.flush()
        .with_context(|| format!("Failed to flush temp file: {}", file.path().display()))?;

    let (_, path) = file.keep().context("Failed to persist temp file")?;
    Ok(path)
}
