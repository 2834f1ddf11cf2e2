//! Flag normalization (spec.md §6) and the short↔long alias table used by
//! structural rule matching (spec.md §4.3).

use std::collections::HashMap;

/// Alias groups: every member of a group refers to the same logical flag.
/// `r ↔ recursive/R`, `f ↔ force`, `v ↔ verbose`, `i ↔ interactive`,
/// `n ↔ dry-run`, `o ↔ output`, `O ↔ output-document`, `q ↔ quiet`, `x ↔ extract`.
const ALIAS_GROUPS: &[&[&str]] = &[
    &["r", "R", "recursive"],
    &["f", "force"],
    &["v", "verbose"],
    &["i", "interactive"],
    &["n", "dry-run"],
    &["o", "output"],
    &["O", "output-document"],
    &["q", "quiet"],
    &["x", "extract"],
];

/// Every key that is an alias of `key`, including `key` itself.
pub fn alias_group_of(key: &str) -> Vec<&'static str> {
    for group in ALIAS_GROUPS {
        if group.contains(&key) {
            return group.to_vec();
        }
    }
    Vec::new()
}

/// True when `flags` contains `key` or any of its declared aliases.
pub fn flags_contains_aliased(flags: &HashMap<String, String>, key: &str) -> bool {
    if flags.contains_key(key) {
        return true;
    }
    alias_group_of(key).iter().any(|a| flags.contains_key(*a))
}

/// Classify one whitespace-delimited token into zero or more flag entries,
/// or `None` when the token is positional.
///
/// - `-abc` → `[(a,""), (b,""), (c,"")]`
/// - `-a` → `[(a,"")]`
/// - `--name` → `[(name,"")]`
/// - `--name=value` → `[(name,value)]`
/// - `-` alone, and anything not starting with `-`, is positional (`None`).
pub fn classify_token(token: &str) -> Option<Vec<(String, String)>> {
    if token == "-" || token == "--" || !token.starts_with('-') {
        return None;
    }

    if let Some(rest) = token.strip_prefix("--") {
        let (name, value) = match rest.split_once('=') {
            Some((n, v)) => (n.to_string(), v.to_string()),
            None => (rest.to_string(), String::new()),
        };
        return Some(vec![(name, value)]);
    }

    // Short cluster: "-abc" -> {a,b,c}, each empty-valued.
    let chars = &token[1..];
    Some(chars.chars().map(|c| (c.to_string(), String::new())).collect())
}
