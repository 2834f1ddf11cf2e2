//! Guardian analyzer (Layer 5, spec.md §4.7): delegates to a pluggable
//! `GuardianProvider`, default the built-in heuristic, and adapts its
//! signals into `Finding`s.

mod heuristic;
mod provider;

pub use heuristic::HeuristicGuardian;
pub use provider::{signal_to_finding, GuardianProvider, GuardianRequest, GuardianResponse, Severity, Signal};

use crate::analyzer::Analyzer;
use crate::model::{AnalysisContext, Finding};

pub struct GuardianAnalyzer {
    provider: Box<dyn GuardianProvider>,
    agent_context: Option<String>,
}

impl GuardianAnalyzer {
    pub fn new(provider: Box<dyn GuardianProvider>, agent_context: Option<String>) -> Self {
        GuardianAnalyzer { provider, agent_context }
    }
}

impl Default for GuardianAnalyzer {
    fn default() -> Self {
        GuardianAnalyzer::new(Box::new(HeuristicGuardian::new()), None)
    }
}

impl Analyzer for GuardianAnalyzer {
    fn name(&self) -> &'static str {
        "guardian"
    }

    fn analyze(&self, ctx: &mut AnalysisContext) -> Vec<Finding> {
        let request = GuardianRequest {
            raw_command: ctx.raw_command.clone(),
            agent_context: self.agent_context.clone(),
            prior_decision: None,
            prior_signals: Vec::new(),
        };

        match self.provider.analyze(&request) {
            Ok(response) => response.signals.iter().map(signal_to_finding).collect(),
            Err(e) => {
                log::warn!("guardian-analyzer: provider failed, treating as no findings: {e}");
                Vec::new()
            }
        }
    }
}
