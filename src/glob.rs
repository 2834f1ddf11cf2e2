//! Glob pattern semantics shared by every rule-matching engine (§6).
//!
//! - A pattern with no metacharacters (`*`, `?`, `[`) is exact string equality.
//! - A pattern ending in `/**` matches the prefix itself, or anything under `prefix/`.
//! - A pattern ending in `/*` matches exactly one path component after `prefix/`.
//! - Any other pattern containing a metacharacter is a single-component
//!   (filename-style) glob: `*` does not cross `/`.

use globset::GlobMatcher;

/// A compiled glob pattern, ready to test candidate strings against.
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    kind: PatternKind,
}

#[derive(Debug, Clone)]
enum PatternKind {
    Exact,
    DoubleStarPrefix(String),
    Compiled(GlobMatcher),
}

/// Error compiling a glob pattern; carries the offending pattern and the
/// underlying message so a caller can report which rule was malformed.
#[derive(Debug, thiserror::Error)]
#[error("invalid glob pattern '{pattern}': {message}")]
pub struct GlobError {
    pub pattern: String,
    pub message: String,
}

impl Pattern {
    /// Compile `raw` into a `Pattern`. Never fails for patterns with no
    /// metacharacters (exact match); may fail for malformed `[...]` classes.
    pub fn compile(raw: &str) -> Result<Self, GlobError> {
        if let Some(prefix) = raw.strip_suffix("/**") {
            return Ok(Pattern {
                raw: raw.to_string(),
                kind: PatternKind::DoubleStarPrefix(prefix.to_string()),
            });
        }

        if !has_metacharacters(raw) {
            return Ok(Pattern {
                raw: raw.to_string(),
                kind: PatternKind::Exact,
            });
        }

        // `literal_separator` keeps `*`/`?` from crossing `/`, giving
        // single-component match semantics for both `/*` and bare filename globs.
        let glob = globset::GlobBuilder::new(raw)
            .literal_separator(true)
            .build()
            .map_err(|e| GlobError {
                pattern: raw.to_string(),
                message: e.to_string(),
            })?;
        Ok(Pattern {
            raw: raw.to_string(),
            kind: PatternKind::Compiled(glob.compile_matcher()),
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Test a candidate string against this pattern.
    pub fn is_match(&self, candidate: &str) -> bool {
        match &self.kind {
            PatternKind::Exact => self.raw == candidate,
            PatternKind::DoubleStarPrefix(prefix) => {
                candidate == prefix || candidate.starts_with(&format!("{prefix}/"))
            }
            PatternKind::Compiled(matcher) => matcher.is_match(candidate),
        }
    }
}

fn has_metacharacters(s: &str) -> bool {
    s.contains('*') || s.contains('?') || s.contains('[')
}
