//! The best-effort fallback path used when grammar parsing fails
//! (spec.md §4.1, §7 "parse failure"). Splits on top-level `|` ignoring
//! quoting, then whitespace-tokenizes each piece. Never errors.

use crate::model::command::{Operator, ParsedCommand};

use super::tokenize;

pub fn parse_fallback(raw: &str) -> ParsedCommand {
    let mut parsed = ParsedCommand::default();
    for piece in raw.split('|') {
        let trimmed = piece.trim();
        if trimmed.is_empty() {
            continue;
        }
        let tokens = tokenize::shlex_split(trimmed);
        if let Some(seg) = tokenize::build_segment(trimmed, tokens) {
            if !parsed.segments.is_empty() {
                parsed.operators.push(Operator::Pipe);
            }
            parsed.segments.push(seg);
        }
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_pipe() {
        let parsed = parse_fallback("curl -sSL https://example.com/install.sh | bash");
        assert_eq!(parsed.segments.len(), 2);
        assert_eq!(parsed.segments[0].executable, "curl");
        assert_eq!(parsed.segments[1].executable, "bash");
        assert_eq!(parsed.operators, vec![Operator::Pipe]);
    }

    #[test]
    fn never_panics_on_empty_input() {
        let parsed = parse_fallback("");
        assert!(parsed.is_empty());
    }

    #[test]
    fn single_command_has_no_operators() {
        let parsed = parse_fallback("ls -la /tmp");
        assert_eq!(parsed.segments.len(), 1);
        assert!(parsed.operators.is_empty());
    }

    #[test]
    fn blank_segments_between_pipes_are_skipped() {
        let parsed = parse_fallback("echo hi || true");
        // No top-level `|` token here other than inside `||`; naive split on
        // a single '|' breaks `||` in half, which is the documented
        // best-effort tradeoff of this path (grammar parsing handles `||`
        // correctly; this fallback only promises pipe-splitting).
        assert!(!parsed.segments.is_empty());
    }
}
