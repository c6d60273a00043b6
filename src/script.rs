//! Load and unload script generation.
//!
//! Both builders return a shell script body with one statement per entry,
//! joined by newlines, without a shebang or trailing newline. The script is
//! meant to be `source`d so exports, aliases and functions reach the calling
//! shell.
//!
//! Values and alias commands are inserted verbatim: a variable value is
//! wrapped in double quotes (so `$HOME` inside it still expands when sourced)
//! and an alias command in single quotes, with no escaping. A value that
//! contains a `"` or backtick, or an alias command that contains a `'`, ends
//! up unbalanced in the output. `envy doctor` reports such entries.

use crate::pathvar::{EnvSnapshot, PATH_SEPARATOR, remove_segments};
use crate::profile::Profile;

/// Lifecycle hook names, also used as the generated function names
pub const PRELOAD: &str = "preload";
pub const POSTLOAD: &str = "postload";
pub const PREUNLOAD: &str = "preunload";
pub const POSTUNLOAD: &str = "postunload";

/// Build the script that applies `profile` to the sourcing shell
pub fn build_load_script(profile: &Profile) -> String {
    let mut script = Vec::new();

    push_hook(&mut script, PRELOAD, &profile.pre_load);

    for (name, value) in &profile.variables {
        script.push(format!("export {name}=\"{value}\""));
    }

    if !profile.path.is_empty() {
        script.push(format!(
            "export PATH=\"{}{PATH_SEPARATOR}$PATH\"",
            profile.path.join(PATH_SEPARATOR)
        ));
    }

    for (name, body) in &profile.functions {
        script.push(function(name, body));
    }

    for (name, command) in &profile.aliases {
        script.push(format!("alias {name}='{command}'"));
    }

    push_hook(&mut script, POSTLOAD, &profile.post_load);

    script.join("\n")
}

/// Build the script that reverts `profile`.
///
/// `env` supplies the current `PATH` and the values used to expand `$VAR`
/// references in the profile's path entries. The PATH export is always
/// emitted, even when the profile has no path entries.
pub fn build_unload_script(profile: &Profile, env: &EnvSnapshot) -> String {
    let mut script = Vec::new();

    push_hook(&mut script, PREUNLOAD, &profile.pre_unload);

    for name in profile.variables.keys() {
        script.push(format!("unset {name}"));
    }

    let path = remove_segments(env.path(), &profile.path, env);
    script.push(format!("export PATH=\"{path}\""));

    for name in profile.functions.keys() {
        script.push(format!("unset -f {name}"));
    }

    for name in profile.aliases.keys() {
        script.push(format!("unalias {name} 2>/dev/null || true"));
    }

    push_hook(&mut script, POSTUNLOAD, &profile.post_unload);

    script.join("\n")
}

fn function(name: &str, body: &str) -> String {
    format!("{name}() {{\n{body}\n}}")
}

/// Define the hook as a function and call it straight away
fn push_hook(script: &mut Vec<String>, name: &str, body: &str) {
    if !body.is_empty() {
        script.push(format!("{}\n{name}", function(name, body)));
    }
}
