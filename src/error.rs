//! Crate-wide error types.
//!
//! Per spec.md §7, the evaluation pipeline itself never surfaces partial
//! failure to the caller of `run_all` — parse failures fall back silently,
//! invalid user regex is skipped, a missing enrichment yields zero findings,
//! and guardian/session-store failures degrade gracefully. These types exist
//! only for the narrow set of genuinely fallible construction-time calls.

/// Errors raised at construction time, before any evaluation begins.
#[derive(Debug, thiserror::Error)]
pub enum ShieldError {
    /// `StructuralParser::new` was given a `max_parse_depth` of 0; spec.md
    /// §4.1 requires a minimum of 1.
    #[error("max_parse_depth must be at least 1, got {0}")]
    InvalidMaxDepth(u32),

    /// A custom `GuardianProvider` chose to report a hard failure rather than
    /// returning an empty response. The registry treats this as "no
    /// findings" for that layer (fail-open) and logs it; it is never
    /// propagated out of `Registry::run_all`.
    #[error("guardian provider error: {0}")]
    Guardian(String),
}
