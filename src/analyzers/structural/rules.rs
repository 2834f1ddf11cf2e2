//! User-supplied structural rules (spec.md §4.3).

use serde::Deserialize;

use crate::glob::Pattern;
use crate::model::{CommandSegment, Decision, Finding, Operator, ParsedCommand};
use crate::parser::flags::flags_contains_aliased;

const ANALYZER_NAME: &str = "structural";

#[derive(Debug, Clone, Deserialize)]
pub struct StructuralRule {
    pub id: String,
    pub decision: Decision,
    #[serde(default)]
    pub confidence: f64,
    pub reason: String,
    #[serde(default)]
    pub taxonomy: String,
    #[serde(default)]
    pub executable: Vec<String>,
    #[serde(default)]
    pub subcommand: Option<String>,
    #[serde(default)]
    pub flags_all: Vec<String>,
    #[serde(default)]
    pub flags_any: Vec<String>,
    #[serde(default)]
    pub flags_none: Vec<String>,
    #[serde(default)]
    pub args_any: Vec<String>,
    #[serde(default)]
    pub args_none: Vec<String>,
    #[serde(default)]
    pub has_pipe: Option<bool>,
    #[serde(default)]
    pub pipe_to: Vec<String>,
    #[serde(default)]
    pub pipe_from: Vec<String>,
    #[serde(default)]
    pub negate: bool,
}

/// `StructuralRule` plus its pre-compiled glob patterns. Patterns that fail
/// to compile are dropped silently, same graceful-degradation stance as an
/// invalid user regex.
pub struct CompiledStructuralRule {
    rule: StructuralRule,
    args_any: Vec<Pattern>,
    args_none: Vec<Pattern>,
}

impl CompiledStructuralRule {
    pub fn new(rule: StructuralRule) -> Self {
        let args_any = compile_patterns(&rule.args_any, &rule.id);
        let args_none = compile_patterns(&rule.args_none, &rule.id);
        CompiledStructuralRule { rule, args_any, args_none }
    }

    pub fn evaluate(&self, parsed: &ParsedCommand) -> Option<Finding> {
        let raw_match = self.pipeline_predicates_hold(parsed)
            && parsed.all_segments().iter().any(|seg| self.segment_matches(seg));
        let matched = if self.rule.negate { !raw_match } else { raw_match };
        if !matched {
            return None;
        }
        let confidence = if self.rule.confidence == 0.0 { 0.80 } else { self.rule.confidence };
        let mut finding = Finding::new(
            ANALYZER_NAME,
            &self.rule.id,
            self.rule.decision,
            confidence,
            &self.rule.reason,
        );
        if !self.rule.taxonomy.is_empty() {
            finding = finding.with_taxonomy(&self.rule.taxonomy);
        }
        Some(finding)
    }

    fn segment_matches(&self, seg: &CommandSegment) -> bool {
        if !self.rule.executable.is_empty() && !self.rule.executable.iter().any(|e| e == &seg.executable) {
            return false;
        }
        if let Some(sc) = &self.rule.subcommand {
            match &seg.subcommand {
                Some(actual) if actual.eq_ignore_ascii_case(sc) => {}
                _ => return false,
            }
        }
        if !self.rule.flags_all.is_empty() && !self.rule.flags_all.iter().all(|k| flags_contains_aliased(&seg.flags, k)) {
            return false;
        }
        if !self.rule.flags_any.is_empty() && !self.rule.flags_any.iter().any(|k| flags_contains_aliased(&seg.flags, k)) {
            return false;
        }
        if self.rule.flags_none.iter().any(|k| flags_contains_aliased(&seg.flags, k)) {
            return false;
        }
        if !self.args_any.is_empty() && !seg.args.iter().any(|a| self.args_any.iter().any(|p| p.is_match(a))) {
            return false;
        }
        if seg.args.iter().any(|a| self.args_none.iter().any(|p| p.is_match(a))) {
            return false;
        }
        true
    }

    fn pipeline_predicates_hold(&self, parsed: &ParsedCommand) -> bool {
        if let Some(expected) = self.rule.has_pipe {
            let has_pipe = parsed.operators.iter().any(|op| *op == Operator::Pipe);
            if has_pipe != expected {
                return false;
            }
        }
        if !self.rule.pipe_to.is_empty() && !any_pipe_edge(parsed, |_l, r| self.rule.pipe_to.iter().any(|e| e == &r.executable)) {
            return false;
        }
        if !self.rule.pipe_from.is_empty() && !any_pipe_edge(parsed, |l, _r| self.rule.pipe_from.iter().any(|e| e == &l.executable)) {
            return false;
        }
        true
    }
}

fn any_pipe_edge(parsed: &ParsedCommand, pred: impl Fn(&CommandSegment, &CommandSegment) -> bool) -> bool {
    for (i, op) in parsed.operators.iter().enumerate() {
        if *op != Operator::Pipe {
            continue;
        }
        if let (Some(left), Some(right)) = (parsed.segments.get(i), parsed.segments.get(i + 1)) {
            if pred(left, right) {
                return true;
            }
        }
    }
    false
}

fn compile_patterns(raw: &[String], rule_id: &str) -> Vec<Pattern> {
    raw.iter()
        .filter_map(|p| match Pattern::compile(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                log::warn!("structural-analyzer: skipping invalid glob in rule '{rule_id}': {e}");
                None
            }
        })
        .collect()
}
