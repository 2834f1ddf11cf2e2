//! Dataflow analyzer (Layer 3, spec.md §4.5): source/sink classification
//! over the parsed tree plus the raw command string, and user rules matching
//! a pipe- or redirect-based flow between two endpoints.

mod builtins;
mod rules;

pub use rules::{DataflowEndpoint, DataflowRule, EndpointKind};

use crate::analyzer::Analyzer;
use crate::model::{AnalysisContext, Finding};

pub struct DataflowAnalyzer {
    rules: Vec<DataflowRule>,
}

impl DataflowAnalyzer {
    pub fn new(rules: Vec<DataflowRule>) -> Self {
        DataflowAnalyzer { rules }
    }
}

impl Default for DataflowAnalyzer {
    fn default() -> Self {
        DataflowAnalyzer::new(Vec::new())
    }
}

impl Analyzer for DataflowAnalyzer {
    fn name(&self) -> &'static str {
        "dataflow"
    }

    fn analyze(&self, ctx: &mut AnalysisContext) -> Vec<Finding> {
        let Some(parsed) = ctx.parsed.clone() else {
            log::debug!("dataflow-analyzer: no parsed command, skipping");
            return Vec::new();
        };

        let (mut findings, dataflows) = builtins::run(&ctx.raw_command, &parsed);
        for flow in dataflows {
            ctx.add_dataflow(flow);
        }

        for rule in &self.rules {
            if let Some(finding) = rule.evaluate(&parsed) {
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
        let analyzer = DataflowAnalyzer::default();
        let mut ctx = AnalysisContext::new("cat /dev/zero > /dev/sda");
        assert!(analyzer.analyze(&mut ctx).is_empty());
    }

    #[test]
    fn populates_dataflows_on_context() {
        let structural = StructuralAnalyzer::default();
        let dataflow = DataflowAnalyzer::default();
        let mut ctx = AnalysisContext::new("cat /dev/zero > /dev/sda");
        structural.analyze(&mut ctx);
        let findings = dataflow.analyze(&mut ctx);
        assert!(findings.iter().any(|f| f.rule_id == "df-block-zero-to-device"));
        assert!(!ctx.dataflows.is_empty());
    }
}
