use chrono::{DateTime, Utc};

use super::finding::Decision;

/// A session-store record of one evaluated command (spec.md §3 `EvaluatedCommand`).
#[derive(Debug, Clone)]
pub struct EvaluatedCommand {
    pub command: String,
    pub decision: Decision,
    pub timestamp: DateTime<Utc>,
    pub paths: Vec<String>,
    pub domains: Vec<String>,
    pub tags: Vec<String>,
}

impl EvaluatedCommand {
    pub fn new(command: impl Into<String>, decision: Decision, timestamp: DateTime<Utc>) -> Self {
        EvaluatedCommand {
            command: command.into(),
            decision,
            timestamp,
            paths: Vec::new(),
            domains: Vec::new(),
            tags: Vec::new(),
        }
    }
}
