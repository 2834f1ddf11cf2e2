//! Logging level conventions used throughout the pipeline.
//!
//! This crate emits through the `log` facade but never installs a logger —
//! that decision belongs to whatever binary or service embeds it, the same
//! way a library never calls `env_logger::init()` on a caller's behalf.
//!
//! Conventions followed by every analyzer:
//!
//! - `trace!` — analyzer entry/exit with the running finding count.
//! - `debug!` — each finding as it's appended, and each context enrichment
//!   (parsed command set, intent appended, dataflow appended).
//! - `warn!` — invalid user regex skipped, guardian provider error
//!   swallowed, session store failure degrading the stateful analyzer.
