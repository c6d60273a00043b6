//! The profile data model.
//!
//! A profile is a declarative change set for a shell session: variables to
//! export, directories to prepend to `PATH`, shell functions, aliases and
//! four optional lifecycle hooks. Profiles are read from YAML:
//!
//! ```yaml
//! variables:
//!   JAVA_HOME: /opt/jdk-21
//! path:
//!   - $HOME/tools/bin
//! aliases:
//!   ll: ls -la
//! functions:
//!   greet: echo "hello $1"
//! preload: echo "loading"
//! ```
//!
//! Every key is optional and unknown keys are ignored. Maps are stored as
//! `BTreeMap` so script generation iterates them in lexicographic key order.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors produced while turning raw bytes into a [`Profile`]
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The document is not valid YAML or a key holds the wrong shape
    #[error("invalid profile document: {0}")]
    Deserialize(#[from] serde_yaml_ng::Error),
}

/// An environment profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    #[serde(deserialize_with = "string_map")]
    pub variables: BTreeMap<String, String>,

    /// Prepended to PATH in listed order. May hold unexpanded `$VAR` references.
    #[serde(deserialize_with = "string_seq")]
    pub path: Vec<String>,

    #[serde(deserialize_with = "string_map")]
    pub aliases: BTreeMap<String, String>,

    /// Function name to body. Bodies are opaque shell text.
    #[serde(deserialize_with = "string_map")]
    pub functions: BTreeMap<String, String>,

    #[serde(rename = "preload", deserialize_with = "nullable_string")]
    pub pre_load: String,

    #[serde(rename = "postload", deserialize_with = "nullable_string")]
    pub post_load: String,

    #[serde(rename = "preunload", deserialize_with = "nullable_string")]
    pub pre_unload: String,

    #[serde(rename = "postunload", deserialize_with = "nullable_string")]
    pub post_unload: String,
}

impl Profile {
    /// True when nothing would be emitted by a load script
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
            && self.path.is_empty()
            && self.aliases.is_empty()
            && self.functions.is_empty()
            && self.pre_load.is_empty()
            && self.post_load.is_empty()
            && self.pre_unload.is_empty()
            && self.post_unload.is_empty()
    }
}

/// Parse a profile from the bytes of a YAML document.
///
/// An empty document yields the empty profile. Missing keys take empty
/// defaults; unknown keys are ignored.
pub fn parse_profile(raw: &[u8]) -> Result<Profile, ProfileError> {
    if is_blank_document(raw) {
        return Ok(Profile::default());
    }
    let profile: Option<Profile> = serde_yaml_ng::from_slice(raw)?;
    Ok(profile.unwrap_or_default())
}

/// Only whitespace and `#` comment lines
fn is_blank_document(raw: &[u8]) -> bool {
    raw.split(|&b| b == b'\n').all(|line| {
        let line = line.trim_ascii();
        line.is_empty() || line.starts_with(b"#")
    })
}

// A key written with no value (`preload:`) is YAML null; treat it as absent.

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<Option<String>>>::deserialize(deserializer)?;
    Ok(entries.into_iter().flatten().flatten().collect())
}

fn string_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = Option::<BTreeMap<String, Option<String>>>::deserialize(deserializer)?;
    Ok(map
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| (k, v.unwrap_or_default()))
        .collect())
}
