//! Combiner (spec.md §4.9): merges every layer's findings into one decision.

use std::collections::HashSet;

use crate::model::{Decision, Finding};

/// Output of `Combiner::combine`.
#[derive(Debug, Clone)]
pub struct CombinedResult {
    pub decision: Decision,
    pub triggered_rules: Vec<String>,
    pub reasons: Vec<String>,
    pub findings: Vec<Finding>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    MostRestrictive,
    WeightedVote,
}

pub struct Combiner {
    strategy: Strategy,
}

impl Combiner {
    pub fn new(strategy: Strategy) -> Self {
        Combiner { strategy }
    }

    pub fn combine(&self, findings: Vec<Finding>, default_decision: Decision) -> CombinedResult {
        if findings.is_empty() {
            return CombinedResult {
                decision: default_decision,
                triggered_rules: Vec::new(),
                reasons: Vec::new(),
                findings,
            };
        }

        match self.strategy {
            Strategy::MostRestrictive => most_restrictive(findings),
            Strategy::WeightedVote => weighted_vote(findings),
        }
    }
}

impl Default for Combiner {
    fn default() -> Self {
        Combiner::new(Strategy::MostRestrictive)
    }
}

fn is_override_source(analyzer_name: &str) -> bool {
    matches!(analyzer_name, "structural" | "semantic")
}

/// Findings that neutralize a same-`taxonomy_ref` BLOCK/AUDIT elsewhere:
/// ALLOW, confidence >= 0.80, tagged `structural-override`/`semantic-override`,
/// from the structural or semantic layer.
fn collect_override_taxonomies(findings: &[Finding]) -> HashSet<String> {
    findings
        .iter()
        .filter(|f| {
            is_override_source(&f.analyzer_name)
                && f.decision == Decision::Allow
                && f.confidence >= 0.80
                && (f.has_tag("structural-override") || f.has_tag("semantic-override"))
                && !f.taxonomy_ref.is_empty()
        })
        .map(|f| f.taxonomy_ref.clone())
        .collect()
}

fn most_restrictive(findings: Vec<Finding>) -> CombinedResult {
    let overrides = collect_override_taxonomies(&findings);
    let any_override = !overrides.is_empty();

    let mut best_severity: i32 = -1;
    let mut triggered_rules = Vec::new();
    let mut reasons = Vec::new();

    for f in &findings {
        if !is_override_source(&f.analyzer_name) && f.decision != Decision::Allow && overrides.contains(&f.taxonomy_ref)
        {
            continue;
        }
        if f.analyzer_name == "regex" && f.decision != Decision::Allow && f.taxonomy_ref.is_empty() && any_override {
            continue;
        }

        let severity = f.decision.severity() as i32;
        if severity > best_severity {
            best_severity = severity;
            triggered_rules = vec![f.rule_id.clone()];
            reasons = vec![f.reason.clone()];
        } else if severity == best_severity {
            triggered_rules.push(f.rule_id.clone());
            reasons.push(f.reason.clone());
        }
    }

    let decision = match best_severity {
        3 => Decision::Block,
        2 => Decision::Audit,
        1 => Decision::Allow,
        _ => Decision::Allow,
    };

    CombinedResult { decision, triggered_rules, reasons, findings }
}

fn weighted_vote(findings: Vec<Finding>) -> CombinedResult {
    let mut allow_weight = 0.0;
    let mut audit_weight = 0.0;
    let mut block_weight = 0.0;

    for f in &findings {
        let w = if f.confidence > 0.0 { f.confidence } else { 0.5 };
        match f.decision {
            Decision::Allow => allow_weight += w,
            Decision::Audit => audit_weight += w,
            Decision::Block => block_weight += w * 1.5,
        }
    }

    let decision = if block_weight >= audit_weight && block_weight >= allow_weight {
        Decision::Block
    } else if audit_weight >= allow_weight {
        Decision::Audit
    } else {
        Decision::Allow
    };

    let (triggered_rules, reasons) = findings
        .iter()
        .filter(|f| f.decision == decision)
        .map(|f| (f.rule_id.clone(), f.reason.clone()))
        .unzip();

    CombinedResult { decision, triggered_rules, reasons, findings }
}
