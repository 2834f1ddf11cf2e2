//! The `GuardianProvider` contract (spec.md §4.7): pluggable, trait-object
//! based since hosts may swap in an LLM-backed provider — unlike the fixed
//! six-layer `AnalyzerStage` sum type, the set of providers is open-ended.

use crate::error::ShieldError;
use crate::model::{Decision, Finding};

/// Severity of one guardian signal; maps to a suggested `Decision`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn suggested_decision(self) -> Decision {
        match self {
            Severity::Critical | Severity::High => Decision::Block,
            Severity::Medium | Severity::Low => Decision::Audit,
        }
    }
}

/// One detection emitted by a `GuardianProvider`.
#[derive(Debug, Clone)]
pub struct Signal {
    pub id: String,
    pub category: String,
    pub severity: Severity,
    pub confidence: f64,
    pub description: String,
}

impl Signal {
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        severity: Severity,
        confidence: f64,
        description: impl Into<String>,
    ) -> Self {
        Signal {
            id: id.into(),
            category: category.into(),
            severity,
            confidence: confidence.clamp(0.0, 1.0),
            description: description.into(),
        }
    }
}

/// Input handed to a `GuardianProvider`. `prior_decision`/`prior_signals`
/// summarize what the earlier five layers have already concluded about this
/// same command, so a provider can avoid re-flagging what is already BLOCKed.
#[derive(Debug, Clone)]
pub struct GuardianRequest {
    pub raw_command: String,
    pub agent_context: Option<String>,
    pub prior_decision: Option<Decision>,
    pub prior_signals: Vec<Signal>,
}

#[derive(Debug, Clone)]
pub struct GuardianResponse {
    pub signals: Vec<Signal>,
    pub suggested_decision: Decision,
    pub explanation: String,
}

pub trait GuardianProvider: Send + Sync {
    fn analyze(&self, request: &GuardianRequest) -> Result<GuardianResponse, ShieldError>;
}

/// Turn one signal into a `Finding`: `critical|high` -> BLOCK, else AUDIT;
/// rule id `guardian-<signal-id>`; taxonomy synthesized from category.
pub fn signal_to_finding(signal: &Signal) -> Finding {
    let decision = signal.severity.suggested_decision();
    Finding::new(
        "guardian",
        format!("guardian-{}", signal.id),
        decision,
        signal.confidence,
        signal.description.clone(),
    )
    .with_taxonomy(format!("guardian/{}", signal.category))
}
