use serde::{Deserialize, Serialize};

/// The three-way decision every analyzer and the combiner produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Allow,
    Audit,
    Block,
}

impl Decision {
    /// BLOCK=3, AUDIT=2, ALLOW=1 (spec.md §4.9).
    pub fn severity(self) -> u8 {
        match self {
            Decision::Block => 3,
            Decision::Audit => 2,
            Decision::Allow => 1,
        }
    }

    /// Parse the caller-supplied default decision string (spec.md §4.9, §6).
    /// Case-insensitive; unrecognized strings default to `Audit`.
    pub fn from_default_str(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "ALLOW" => Decision::Allow,
            "BLOCK" => Decision::Block,
            _ => Decision::Audit,
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Decision::Allow => "ALLOW",
            Decision::Audit => "AUDIT",
            Decision::Block => "BLOCK",
        };
        write!(f, "{s}")
    }
}

/// One analyzer's atomic output record (spec.md §3 `Finding`).
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub analyzer_name: String,
    pub rule_id: String,
    pub decision: Decision,
    /// Confidence in `[0, 1]`; clamped at construction.
    pub confidence: f64,
    pub reason: String,
    pub taxonomy_ref: String,
    pub tags: Vec<String>,
}

impl Finding {
    pub fn new(
        analyzer_name: impl Into<String>,
        rule_id: impl Into<String>,
        decision: Decision,
        confidence: f64,
        reason: impl Into<String>,
    ) -> Self {
        Finding {
            analyzer_name: analyzer_name.into(),
            rule_id: rule_id.into(),
            decision,
            confidence: confidence.clamp(0.0, 1.0),
            reason: reason.into(),
            taxonomy_ref: String::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_taxonomy(mut self, taxonomy_ref: impl Into<String>) -> Self {
        self.taxonomy_ref = taxonomy_ref.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
