//! Registry (spec.md §4.10): runs the ordered analyzer chain, then the
//! combiner, against one `AnalysisContext`.

use crate::analyzer::{Analyzer, AnalyzerStage};
use crate::combiner::{CombinedResult, Combiner};
use crate::model::{AnalysisContext, Decision};

pub struct Registry {
    analyzers: Vec<AnalyzerStage>,
    combiner: Combiner,
}

impl Registry {
    pub fn new(analyzers: Vec<AnalyzerStage>, combiner: Combiner) -> Self {
        Registry { analyzers, combiner }
    }

    /// Run every analyzer in order against `ctx`, then combine. Order
    /// matters: the structural analyzer must precede any analyzer reading
    /// `ctx.parsed`.
    pub fn run_all(&self, ctx: &mut AnalysisContext, default_decision: Decision) -> CombinedResult {
        let mut findings = Vec::new();
        for stage in &self.analyzers {
            log::trace!("registry: running analyzer '{}'", stage.name());
            findings.extend(stage.analyze(ctx));
        }
        self.combiner.combine(findings, default_decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::dataflow::DataflowAnalyzer;
    use crate::analyzers::guardian::GuardianAnalyzer;
    use crate::analyzers::regex_layer::RegexAnalyzer;
    use crate::analyzers::semantic::SemanticAnalyzer;
    use crate::analyzers::stateful::StatefulAnalyzer;
    use crate::analyzers::structural::StructuralAnalyzer;

    fn default_registry() -> Registry {
        Registry::new(
            vec![
                AnalyzerStage::Regex(RegexAnalyzer::default()),
                AnalyzerStage::Structural(StructuralAnalyzer::default()),
                AnalyzerStage::Semantic(SemanticAnalyzer::default()),
                AnalyzerStage::Dataflow(DataflowAnalyzer::default()),
                AnalyzerStage::Stateful(StatefulAnalyzer::default()),
                AnalyzerStage::Guardian(GuardianAnalyzer::default()),
            ],
            Combiner::default(),
        )
    }

    #[test]
    fn clean_command_defaults_to_allow_when_default_is_allow() {
        let registry = default_registry();
        let mut ctx = AnalysisContext::new("ls -la /tmp");
        let result = registry.run_all(&mut ctx, Decision::Allow);
        assert_eq!(result.decision, Decision::Allow);
    }

    #[test]
    fn rm_rf_root_blocks_end_to_end() {
        let registry = default_registry();
        let mut ctx = AnalysisContext::new("rm -rf /");
        let result = registry.run_all(&mut ctx, Decision::Audit);
        assert_eq!(result.decision, Decision::Block);
    }

    #[test]
    fn dns_safe_lookup_overrides_any_regex_block_with_same_taxonomy() {
        let registry = default_registry();
        let mut ctx = AnalysisContext::new("dig _dmarc.example.com TXT");
        let result = registry.run_all(&mut ctx, Decision::Audit);
        assert_eq!(result.decision, Decision::Allow);
    }
}
