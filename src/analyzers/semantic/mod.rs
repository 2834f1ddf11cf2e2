//! Semantic analyzer (Layer 2, spec.md §4.4): intent classification over
//! the parsed tree, plus user rules matching the accumulated intents.

mod builtins;
mod rules;

pub use rules::SemanticRule;

use crate::analyzer::Analyzer;
use crate::model::{AnalysisContext, Finding};

pub struct SemanticAnalyzer {
    rules: Vec<SemanticRule>,
}

impl SemanticAnalyzer {
    pub fn new(rules: Vec<SemanticRule>) -> Self {
        SemanticAnalyzer { rules }
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        SemanticAnalyzer::new(Vec::new())
    }
}

impl Analyzer for SemanticAnalyzer {
    fn name(&self) -> &'static str {
        "semantic"
    }

    fn analyze(&self, ctx: &mut AnalysisContext) -> Vec<Finding> {
        let Some(parsed) = ctx.parsed.clone() else {
            log::debug!("semantic-analyzer: no parsed command, skipping");
            return Vec::new();
        };

        let (mut findings, intents) = builtins::run(&ctx.raw_command, &parsed);
        for intent in intents {
            ctx.add_intent(intent);
        }

        for rule in &self.rules {
            if let Some(finding) = rule.evaluate(&ctx.intents) {
                findings.push(finding);
            }
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::structural::StructuralAnalyzer;

    #[test]
    fn no_parsed_yields_no_findings() {
        let analyzer = SemanticAnalyzer::default();
        let mut ctx = AnalysisContext::new("rm -rf /etc");
        assert!(analyzer.analyze(&mut ctx).is_empty());
    }

    #[test]
    fn appends_intents_to_context() {
        let structural = StructuralAnalyzer::default();
        let semantic = SemanticAnalyzer::default();
        let mut ctx = AnalysisContext::new("nmap -sS 10.0.0.0/24");
        structural.analyze(&mut ctx);
        semantic.analyze(&mut ctx);
        assert!(ctx.intents.iter().any(|i| i.category == "network-scan"));
    }
}
