//! AgentShield's core decision engine: a multi-layer pipeline that decides
//! ALLOW/AUDIT/BLOCK for a shell command issued by an autonomous agent.
//!
//! The pipeline is a pure function `(command, user_rules, session) ->
//! decision + findings`. Six analyzers run in a fixed order — regex,
//! structural, semantic, dataflow, stateful, guardian — each enriching a
//! shared [`model::AnalysisContext`] and contributing [`model::Finding`]s,
//! which the [`combiner::Combiner`] merges into one [`model::Decision`].
//!
//! Hosts assemble a [`registry::Registry`] from the analyzer layers they
//! want (see [`analyzer::AnalyzerStage`]) and call
//! [`registry::Registry::run_all`] once per command.

pub mod analyzer;
pub mod analyzers;
pub mod combiner;
pub mod error;
pub mod glob;
pub mod logging;
pub mod model;
pub mod parser;
pub mod registry;
pub mod session;
pub mod vocab;

pub use analyzer::{Analyzer, AnalyzerStage};
pub use combiner::{CombinedResult, Combiner, Strategy};
pub use error::ShieldError;
pub use model::{
    AnalysisContext, CommandIntent, CommandSegment, DataFlow, Decision, EvaluatedCommand, Finding,
    Operator, ParsedCommand, Redirect, RedirectOp, Risk,
};
pub use parser::StructuralParser;
pub use registry::Registry;
pub use session::{InMemorySessionStore, SessionStore};
