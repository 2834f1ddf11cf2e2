//! Structural analyzer (Layer 1, spec.md §4.3): runs the parser, storing
//! its result in the context, then evaluates built-in AST checks and
//! user-defined structural rules.

mod builtins;
mod rules;

pub use rules::{CompiledStructuralRule, StructuralRule};

use crate::analyzer::Analyzer;
use crate::model::{AnalysisContext, Finding};
use crate::parser::StructuralParser;

pub struct StructuralAnalyzer {
    parser: StructuralParser,
    rules: Vec<CompiledStructuralRule>,
}

impl StructuralAnalyzer {
    pub fn new(parser: StructuralParser, rules: Vec<StructuralRule>) -> Self {
        StructuralAnalyzer {
            parser,
            rules: rules.into_iter().map(CompiledStructuralRule::new).collect(),
        }
    }
}

impl Default for StructuralAnalyzer {
    fn default() -> Self {
        StructuralAnalyzer::new(StructuralParser::default(), Vec::new())
    }
}

impl Analyzer for StructuralAnalyzer {
    fn name(&self) -> &'static str {
        "structural"
    }

    fn analyze(&self, ctx: &mut AnalysisContext) -> Vec<Finding> {
        ctx.parsed = Some(self.parser.parse(&ctx.raw_command));
        let parsed = ctx.parsed.as_ref().expect("just assigned");
        log::debug!(
            "structural-analyzer: parsed {} top-level segment(s)",
            parsed.segments.len()
        );

        let mut findings = builtins::run(parsed);
        for rule in &self.rules {
            if let Some(finding) = rule.evaluate(parsed) {
                findings.push(finding);
            }
        }
        log::trace!("structural-analyzer: produced {} finding(s)", findings.len());
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn populates_parsed_on_context() {
        let analyzer = StructuralAnalyzer::default();
        let mut ctx = AnalysisContext::new("ls -la");
        analyzer.analyze(&mut ctx);
        assert!(ctx.parsed.is_some());
    }

    #[test]
    fn builtin_and_user_rule_findings_both_present() {
        let mut rule = StructuralRule {
            id: "custom".to_string(),
            decision: crate::model::Decision::Audit,
            confidence: 0.0,
            reason: "custom rule".to_string(),
            taxonomy: String::new(),
            executable: vec!["rm".to_string()],
            subcommand: None,
            flags_all: Vec::new(),
            flags_any: Vec::new(),
            flags_none: Vec::new(),
            args_any: Vec::new(),
            args_none: Vec::new(),
            has_pipe: None,
            pipe_to: Vec::new(),
            pipe_from: Vec::new(),
            negate: false,
        };
        rule.flags_all = vec!["r".to_string()];
        let analyzer = StructuralAnalyzer::new(StructuralParser::default(), vec![rule]);
        let mut ctx = AnalysisContext::new("rm --recursive --force /");
        let findings = analyzer.analyze(&mut ctx);
        assert!(findings.iter().any(|f| f.rule_id == "st-block-rm-recursive-root"));
        assert!(findings.iter().any(|f| f.rule_id == "custom"));
    }
}
