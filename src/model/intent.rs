/// Risk level attached to an intent or a guardian signal, ordered
/// `None < Info < Low < Medium < High < Critical` (spec.md §3, §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Risk {
    None,
    Info,
    Low,
    Medium,
    High,
    Critical,
}

/// A semantic classification attached to a whole command or one of its
/// segments by the semantic analyzer (spec.md §3 `CommandIntent`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandIntent {
    pub category: String,
    pub risk: Risk,
    /// Confidence in `[0, 1]`; out-of-range values are clamped at construction.
    pub confidence: f64,
    /// Index into the owning `ParsedCommand::segments`, or `-1` for the whole command.
    pub segment_index: i32,
    pub detail: String,
}

impl CommandIntent {
    pub fn new(
        category: impl Into<String>,
        risk: Risk,
        confidence: f64,
        segment_index: i32,
        detail: impl Into<String>,
    ) -> Self {
        CommandIntent {
            category: category.into(),
            risk,
            confidence: confidence.clamp(0.0, 1.0),
            segment_index,
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_ordering_matches_spec() {
        assert!(Risk::None < Risk::Info);
        assert!(Risk::Info < Risk::Low);
        assert!(Risk::Low < Risk::Medium);
        assert!(Risk::Medium < Risk::High);
        assert!(Risk::High < Risk::Critical);
    }

    #[test]
    fn confidence_is_clamped() {
        let i = CommandIntent::new("x", Risk::Low, 1.5, -1, "");
        assert_eq!(i.confidence, 1.0);
        let i = CommandIntent::new("x", Risk::Low, -0.5, -1, "");
        assert_eq!(i.confidence, 0.0);
    }
}
