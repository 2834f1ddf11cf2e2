//! User-supplied semantic rules (spec.md §4.4): match against the
//! accumulated `CommandIntent`s rather than the parsed tree directly.

use serde::Deserialize;

use crate::model::{CommandIntent, Decision, Finding, Risk};

const ANALYZER_NAME: &str = "semantic";

#[derive(Debug, Clone, Deserialize)]
pub struct SemanticRule {
    pub id: String,
    pub decision: Decision,
    #[serde(default)]
    pub confidence: f64,
    pub reason: String,
    #[serde(default)]
    pub taxonomy: String,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub intent_any: Vec<String>,
    #[serde(default)]
    pub risk_min: Option<Risk>,
    #[serde(default)]
    pub negate: bool,
}

impl SemanticRule {
    pub fn evaluate(&self, intents: &[CommandIntent]) -> Option<Finding> {
        let raw_match = intents.iter().any(|intent| self.intent_matches(intent));
        let matched = if self.negate { !raw_match } else { raw_match };
        if !matched {
            return None;
        }
        let confidence = if self.confidence == 0.0 { 0.80 } else { self.confidence };
        let mut finding = Finding::new(ANALYZER_NAME, &self.id, self.decision, confidence, &self.reason);
        if !self.taxonomy.is_empty() {
            finding = finding.with_taxonomy(&self.taxonomy);
        }
        Some(finding)
    }

    fn intent_matches(&self, intent: &CommandIntent) -> bool {
        if let Some(want) = &self.intent {
            if &intent.category != want {
                return false;
            }
        }
        if !self.intent_any.is_empty() && !self.intent_any.iter().any(|c| c == &intent.category) {
            return false;
        }
        if let Some(min) = self.risk_min {
            if intent.risk < min {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(id: &str) -> SemanticRule {
        SemanticRule {
            id: id.to_string(),
            decision: Decision::Block,
            confidence: 0.0,
            reason: "test".to_string(),
            taxonomy: String::new(),
            intent: None,
            intent_any: Vec::new(),
            risk_min: None,
            negate: false,
        }
    }

    #[test]
    fn intent_equals_matches() {
        let mut rule = base("r1");
        rule.intent = Some("file-delete".to_string());
        let intents = vec![CommandIntent::new("file-delete", Risk::Critical, 0.9, -1, "")];
        assert!(rule.evaluate(&intents).is_some());
    }

    #[test]
    fn risk_min_filters_lower_risk() {
        let mut rule = base("r2");
        rule.risk_min = Some(Risk::High);
        let intents = vec![CommandIntent::new("network-scan", Risk::Medium, 0.85, -1, "")];
        assert!(rule.evaluate(&intents).is_none());
    }

    #[test]
    fn risk_min_allows_equal_or_higher() {
        let mut rule = base("r3");
        rule.risk_min = Some(Risk::Medium);
        let intents = vec![CommandIntent::new("network-scan", Risk::Medium, 0.85, -1, "")];
        assert!(rule.evaluate(&intents).is_some());
    }

    #[test]
    fn negate_inverts() {
        let mut rule = base("r4");
        rule.intent = Some("file-delete".to_string());
        rule.negate = true;
        let intents = vec![CommandIntent::new("network-scan", Risk::Medium, 0.85, -1, "")];
        assert!(rule.evaluate(&intents).is_some());
    }

    #[test]
    fn default_confidence_is_080() {
        let mut rule = base("r5");
        rule.intent_any = vec!["x".to_string()];
        let intents = vec![CommandIntent::new("x", Risk::Low, 0.1, -1, "")];
        assert_eq!(rule.evaluate(&intents).unwrap().confidence, 0.80);
    }
}
