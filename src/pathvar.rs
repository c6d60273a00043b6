//! PATH manipulation and `$VAR` expansion.
//!
//! Nothing here reads the process environment directly. Callers take an
//! [`EnvSnapshot`] once at the process boundary and pass it down, which keeps
//! script generation a pure function of its inputs.

use std::collections::BTreeMap;

/// Separator between PATH segments
pub const PATH_SEPARATOR: &str = ":";

/// An immutable copy of environment variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the current process environment.
    ///
    /// Entries whose name or value is not valid UTF-8 are skipped.
    pub fn from_process() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self { vars }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// The `PATH` value, or an empty string when unset
    pub fn path(&self) -> &str {
        self.get("PATH").unwrap_or_default()
    }
}

/// Replace `$NAME` and `${NAME}` references with values from `env`.
///
/// Follows POSIX shell naming: a bare name is the longest run of ASCII
/// letters, digits and `_`, except that a single special character
/// (`*#$@!?-` or one digit) is a complete name, so `$10` is `$1` then `0`.
/// Unset variables expand to the empty string. A `$` that starts no name is
/// kept, while the malformed forms `${}` and an unterminated `${` are dropped.
pub fn expand_env(input: &str, env: &EnvSnapshot) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut copied = 0;
    let mut j = 0;

    while j < bytes.len() {
        if bytes[j] == b'$' && j + 1 < bytes.len() {
            out.push_str(&input[copied..j]);
            let (name, width) = shell_name(&input[j + 1..]);
            match name {
                Some(name) => out.push_str(env.get(name).unwrap_or_default()),
                None if width == 0 => out.push('$'),
                None => {}
            }
            j += width;
            copied = j + 1;
        }
        j += 1;
    }

    out.push_str(&input[copied..]);
    out
}

/// The variable name at the start of `s` (the text after a `$`) and how many
/// bytes of `s` the reference spans.
fn shell_name(s: &str) -> (Option<&str>, usize) {
    let b = s.as_bytes();
    if b[0] == b'{' {
        if b.len() > 2 && is_special(b[1]) && b[2] == b'}' {
            return (Some(&s[1..2]), 3);
        }
        return match s[1..].find('}') {
            Some(0) => (None, 2),
            Some(end) => (Some(&s[1..end + 1]), end + 2),
            None => (None, 1),
        };
    }
    if is_special(b[0]) {
        return (Some(&s[..1]), 1);
    }

    let len = b.iter().take_while(|c| is_name_byte(**c)).count();
    if len == 0 {
        (None, 0)
    } else {
        (Some(&s[..len]), len)
    }
}

fn is_special(c: u8) -> bool {
    matches!(c, b'*' | b'#' | b'$' | b'@' | b'!' | b'?' | b'-') || c.is_ascii_digit()
}

fn is_name_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

/// Remove every occurrence of each of `to_remove` from a colon-delimited PATH.
///
/// Removal targets are expanded with [`expand_env`] before comparison.
/// Empty segments (`::`) in `path_value` are preserved and survivors keep
/// their relative order.
pub fn remove_segments<S: AsRef<str>>(
    path_value: &str,
    to_remove: &[S],
    env: &EnvSnapshot,
) -> String {
    if path_value.is_empty() || to_remove.is_empty() {
        return path_value.to_string();
    }

    let targets: Vec<String> = to_remove
        .iter()
        .map(|s| expand_env(s.as_ref(), env))
        .collect();

    path_value
        .split(PATH_SEPARATOR)
        .filter(|segment| !targets.iter().any(|t| t == segment))
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn env() -> EnvSnapshot {
        EnvSnapshot::from_pairs([("HOME", "/home/dev"), ("TOOLS", "/opt/tools")])
    }

    #[test]
    fn test_expand_plain_and_braced() {
        let env = env();
        assert_eq!(expand_env("$HOME/bin", &env), "/home/dev/bin");
        assert_eq!(expand_env("${HOME}bin", &env), "/home/devbin");
        assert_eq!(expand_env("$TOOLS:$HOME", &env), "/opt/tools:/home/dev");
    }

    #[test]
    fn test_expand_unset_is_empty() {
        assert_eq!(expand_env("$NOPE/bin", &env()), "/bin");
        assert_eq!(expand_env("${NOPE}/bin", &env()), "/bin");
    }

    #[test]
    fn test_expand_literal_dollar() {
        let env = env();
        assert_eq!(expand_env("cost $5", &env), "cost ");
        assert_eq!(expand_env("a$", &env), "a$");
        assert_eq!(expand_env("a$/b", &env), "a$/b");
        assert_eq!(expand_env("no refs", &env), "no refs");
    }

    #[test]
    fn test_expand_malformed_braces_dropped() {
        let env = env();
        assert_eq!(expand_env("${HOME/bin", &env), "HOME/bin");
        assert_eq!(expand_env("${}x", &env), "x");
    }

    #[test]
    fn test_expand_special_names() {
        let env = EnvSnapshot::from_pairs([("1", "x"), ("*", "all")]);
        assert_eq!(expand_env("$10/bin", &env), "x0/bin");
        assert_eq!(expand_env("$*/bin", &env), "all/bin");
        assert_eq!(expand_env("${*}", &env), "all");
        assert_eq!(expand_env("$*/bin", &EnvSnapshot::default()), "/bin");
    }

    #[test]
    fn test_expand_non_ascii_text_kept() {
        assert_eq!(expand_env("/opt/café/$HOME", &env()), "/opt/café//home/dev");
    }

    #[test]
    fn test_remove_no_targets_is_identity() {
        let empty: [&str; 0] = [];
        assert_eq!(remove_segments("/a:/b", &empty, &env()), "/a:/b");
    }

    #[test]
    fn test_remove_from_empty_path() {
        assert_eq!(remove_segments("", &["/a"], &env()), "");
    }

    #[test]
    fn test_remove_all_occurrences() {
        assert_eq!(remove_segments("/a:/b:/a", &["/a"], &env()), "/b");
    }

    #[test]
    fn test_remove_expands_targets() {
        let env = EnvSnapshot::from_pairs([("HOME", "/a")]);
        assert_eq!(remove_segments("/a:/b", &["$HOME"], &env), "/b");
    }

    #[test]
    fn test_remove_absent_target_is_noop() {
        assert_eq!(remove_segments("/a:/b", &["/c"], &env()), "/a:/b");
    }

    #[test]
    fn test_remove_preserves_empty_segments_and_order() {
        assert_eq!(
            remove_segments("/x::/a:/y:/a/", &["/a"], &env()),
            "/x::/y:/a/"
        );
    }

    #[test]
    fn test_remove_multiple_targets() {
        assert_eq!(
            remove_segments(
                "/home/dev/bin:/usr/bin:/opt/tools/bin:/bin",
                &["$HOME/bin", "${TOOLS}/bin"],
                &env()
            ),
            "/usr/bin:/bin"
        );
    }

    #[test]
    fn test_remove_everything() {
        assert_eq!(remove_segments("/a:/a", &["/a"], &env()), "");
    }

    #[test]
    fn test_snapshot_path_default() {
        assert_eq!(EnvSnapshot::default().path(), "");
        let env = EnvSnapshot::from_pairs([("PATH", "/usr/bin")]);
        assert_eq!(env.path(), "/usr/bin");
    }

    #[test]
    #[serial]
    fn test_snapshot_from_process() {
        unsafe { std::env::set_var("ENVY_SNAPSHOT_TEST", "captured") };
        let env = EnvSnapshot::from_process();
        unsafe { std::env::remove_var("ENVY_SNAPSHOT_TEST") };

        assert_eq!(env.get("ENVY_SNAPSHOT_TEST"), Some("captured"));
        assert_eq!(EnvSnapshot::from_process().get("ENVY_SNAPSHOT_TEST"), None);
    }
}
