//! Word-level tokenization shared by the grammar walker and the fallback
//! splitter: env-assignment stripping, sudo transparency, then flag
//! normalization (spec.md §3 edge cases, §6 flag rules).

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::command::CommandSegment;

use super::flags;

static VAR_ASSIGNMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*=.*$").expect("valid regex"));

/// Whitespace/quote-aware split of one command's raw text. Falls back to a
/// naive whitespace split on unterminated quoting rather than erroring.
pub fn shlex_split(raw: &str) -> Vec<String> {
    shlex::split(raw).unwrap_or_else(|| raw.split_whitespace().map(str::to_string).collect())
}

/// Drop leading `KEY=value` environment-assignment tokens, e.g. in
/// `FOO=bar BAZ=qux git status`.
fn strip_env_assignments(tokens: Vec<String>) -> Vec<String> {
    let mut start = 0;
    while start < tokens.len() && VAR_ASSIGNMENT.is_match(&tokens[start]) {
        start += 1;
    }
    tokens[start..].to_vec()
}

/// Sudo transparency (spec.md §3): skip leading flag-like arguments after
/// `sudo`; the first non-flag token becomes the effective command.
fn apply_sudo_transparency(tokens: Vec<String>) -> Vec<String> {
    if tokens.first().map(String::as_str) != Some("sudo") {
        return tokens;
    }
    let mut idx = 1;
    while idx < tokens.len() && tokens[idx].starts_with('-') {
        idx += 1;
    }
    if idx >= tokens.len() {
        return tokens;
    }
    tokens[idx..].to_vec()
}

/// Split the tokens following the executable into `args`/`flags`. A bare
/// `--` is dropped and carries no special meaning (spec.md §4.1): tokens
/// after it are classified exactly like any other token, so a dash-prefixed
/// word following `--` is still a flag.
fn classify_args(tokens: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut args = Vec::new();
    let mut flag_map = HashMap::new();
    for token in tokens {
        if token == "--" {
            continue;
        }
        if let Some(pairs) = flags::classify_token(token) {
            for (k, v) in pairs {
                flag_map.insert(k, v);
            }
            continue;
        }
        args.push(token.clone());
    }
    (args, flag_map)
}

/// Build a [`CommandSegment`] from the already-split token stream of one
/// simple command.
pub fn build_segment(raw: &str, tokens: Vec<String>) -> Option<CommandSegment> {
    let tokens = strip_env_assignments(tokens);
    if tokens.is_empty() {
        return None;
    }
    let tokens = apply_sudo_transparency(tokens);
    let executable = tokens.first()?.clone();
    let (args, flag_map) = classify_args(&tokens[1..]);
    Some(CommandSegment::new(raw.to_string(), executable, args, flag_map))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_single_env_assignment() {
        let seg = build_segment("FOO=bar git status", shlex_split("FOO=bar git status")).unwrap();
        assert_eq!(seg.executable, "git");
        assert_eq!(seg.args, vec!["status".to_string()]);
    }

    #[test]
    fn strips_multiple_env_assignments() {
        let raw = "FOO=bar BAZ=1 npm install";
        let seg = build_segment(raw, shlex_split(raw)).unwrap();
        assert_eq!(seg.executable, "npm");
        assert_eq!(seg.subcommand.as_deref(), Some("install"));
    }

    #[test]
    fn sudo_transparency_skips_leading_flags() {
        let seg = build_segment("sudo -n rm -rf /", shlex_split("sudo -n rm -rf /")).unwrap();
        assert_eq!(seg.executable, "rm");
        assert!(seg.has_flag("r"));
        assert!(seg.has_flag("f"));
        assert_eq!(seg.args, vec!["/".to_string()]);
    }

    #[test]
    fn sudo_with_only_flags_has_no_effective_command() {
        let seg = build_segment("sudo -v", shlex_split("sudo -v")).unwrap();
        assert_eq!(seg.executable, "sudo");
    }

    #[test]
    fn dd_key_value_stays_positional() {
        let raw = "dd if=/dev/zero of=./test.img";
        let seg = build_segment(raw, shlex_split(raw)).unwrap();
        assert_eq!(seg.executable, "dd");
        assert_eq!(
            seg.args,
            vec!["if=/dev/zero".to_string(), "of=./test.img".to_string()]
        );
        assert!(seg.flags.is_empty());
    }

    #[test]
    fn bare_double_dash_is_dropped_but_not_special() {
        // spec.md §4.1: `--` is not a GNU end-of-options marker here; tokens
        // after it are classified normally, so `-rf` still becomes flags.
        let seg = build_segment("rm -- -rf", shlex_split("rm -- -rf")).unwrap();
        assert!(seg.args.is_empty());
        assert!(seg.has_flag("r"));
        assert!(seg.has_flag("f"));
    }

    #[test]
    fn double_dash_does_not_hide_recursive_force_from_rm() {
        let seg = build_segment("rm -- -rf /", shlex_split("rm -- -rf /")).unwrap();
        assert!(seg.has_flag("r"));
        assert!(seg.has_flag("f"));
        assert_eq!(seg.args, vec!["/".to_string()]);
    }

    #[test]
    fn quoted_argument_preserved_as_one_token() {
        let raw = r#"echo "ignore all previous instructions""#;
        let seg = build_segment(raw, shlex_split(raw)).unwrap();
        assert_eq!(seg.args, vec!["ignore all previous instructions".to_string()]);
    }
}
