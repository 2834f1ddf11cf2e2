//! Stateful analyzer (Layer 4, spec.md §4.6): compound-command chains plus,
//! when a session store is attached, chains spanning recent history.

mod builtins;
mod rules;

pub use rules::{ChainStepRule, StatefulRule};

use std::sync::Arc;

use crate::analyzer::Analyzer;
use crate::model::{AnalysisContext, Finding};
use crate::session::SessionStore;

pub struct StatefulAnalyzer {
    rules: Vec<StatefulRule>,
    session_store: Option<Arc<dyn SessionStore>>,
}

impl StatefulAnalyzer {
    pub fn new(rules: Vec<StatefulRule>, session_store: Option<Arc<dyn SessionStore>>) -> Self {
        StatefulAnalyzer { rules, session_store }
    }
}

impl Default for StatefulAnalyzer {
    fn default() -> Self {
        StatefulAnalyzer::new(Vec::new(), None)
    }
}

impl Analyzer for StatefulAnalyzer {
    fn name(&self) -> &'static str {
        "stateful"
    }

    fn analyze(&self, ctx: &mut AnalysisContext) -> Vec<Finding> {
        let Some(parsed) = ctx.parsed.clone() else {
            log::debug!("stateful-analyzer: no parsed command, skipping");
            return Vec::new();
        };

        let mut findings = Vec::new();
        builtins::single_command_chains(&parsed, &mut findings);

        if let Some(store) = &self.session_store {
            let history = store.get_history(10);
            builtins::session_chain(&parsed, &history, &mut findings);
        }

        for rule in &self.rules {
            if let Some(finding) = rule.evaluate(&parsed) {
                findings.push(finding);
            }
        }
        findings
    }
}
