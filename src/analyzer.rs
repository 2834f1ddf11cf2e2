//! The `Analyzer` contract (spec.md §9 design note): six concrete layers
//! behind one dispatch point. The layer count is fixed by the spec, so the
//! registry holds a sum type over the six kinds rather than a trait-object
//! collection — each kind still implements the shared trait so the layers
//! stay individually testable and the registry's dispatch is one `match`.

use crate::model::{AnalysisContext, Finding};

/// One layer of the pipeline: reads the shared context, may enrich it for
/// later layers, and returns the findings it contributed.
pub trait Analyzer {
    fn name(&self) -> &'static str;
    fn analyze(&self, ctx: &mut AnalysisContext) -> Vec<Finding>;
}

use crate::analyzers::dataflow::DataflowAnalyzer;
use crate::analyzers::guardian::GuardianAnalyzer;
use crate::analyzers::regex_layer::RegexAnalyzer;
use crate::analyzers::semantic::SemanticAnalyzer;
use crate::analyzers::stateful::StatefulAnalyzer;
use crate::analyzers::structural::StructuralAnalyzer;

/// Sum type over the six fixed layers, in the order the registry must run
/// them (structural must precede anything reading `parsed`).
pub enum AnalyzerStage {
    Regex(RegexAnalyzer),
    Structural(StructuralAnalyzer),
    Semantic(SemanticAnalyzer),
    Dataflow(DataflowAnalyzer),
    Stateful(StatefulAnalyzer),
    Guardian(GuardianAnalyzer),
}

impl Analyzer for AnalyzerStage {
    fn name(&self) -> &'static str {
        match self {
            AnalyzerStage::Regex(a) => a.name(),
            AnalyzerStage::Structural(a) => a.name(),
            AnalyzerStage::Semantic(a) => a.name(),
            AnalyzerStage::Dataflow(a) => a.name(),
            AnalyzerStage::Stateful(a) => a.name(),
            AnalyzerStage::Guardian(a) => a.name(),
        }
    }

    fn analyze(&self, ctx: &mut AnalysisContext) -> Vec<Finding> {
        match self {
            AnalyzerStage::Regex(a) => a.analyze(ctx),
            AnalyzerStage::Structural(a) => a.analyze(ctx),
            AnalyzerStage::Semantic(a) => a.analyze(ctx),
            AnalyzerStage::Dataflow(a) => a.analyze(ctx),
            AnalyzerStage::Stateful(a) => a.analyze(ctx),
            AnalyzerStage::Guardian(a) => a.analyze(ctx),
        }
    }
}
