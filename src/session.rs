//! Session store (spec.md §4.8): a capability set for recording evaluated
//! commands and recalling them for the stateful analyzer's cross-command
//! chain detection.

use std::collections::VecDeque;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use crate::model::{Decision, EvaluatedCommand};

/// A path observed in an evaluated command, stamped with when it was seen.
#[derive(Debug, Clone)]
pub struct AccessedPath {
    pub path: String,
    pub timestamp: DateTime<Utc>,
}

/// Capability set backing the stateful analyzer's session-aware checks.
/// Implementations must serialize readers against the single writer.
pub trait SessionStore: Send + Sync {
    fn record(&self, command: EvaluatedCommand);
    fn get_history(&self, limit: usize) -> Vec<EvaluatedCommand>;
    fn get_accessed_paths(&self) -> Vec<AccessedPath>;
    fn get_risk_score(&self) -> f64;
    fn close(&self);
}

struct Inner {
    history: VecDeque<EvaluatedCommand>,
    risk_score: f64,
    closed: bool,
}

/// Bounded in-memory `SessionStore` (spec.md §4.8 default implementation).
/// Discards the oldest entry once `max_size` is exceeded; accumulates a risk
/// score (`BLOCK` += 1.0, `AUDIT` += 0.3); every read is a defensive copy.
pub struct InMemorySessionStore {
    max_size: usize,
    inner: RwLock<Inner>,
}

impl InMemorySessionStore {
    pub fn new(max_size: usize) -> Self {
        InMemorySessionStore {
            max_size: max_size.max(1),
            inner: RwLock::new(Inner {
                history: VecDeque::new(),
                risk_score: 0.0,
                closed: false,
            }),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        InMemorySessionStore::new(100)
    }
}

impl SessionStore for InMemorySessionStore {
    fn record(&self, command: EvaluatedCommand) {
        let mut guard = self.inner.write().expect("session store lock poisoned");
        if guard.closed {
            log::warn!("session-store: record() called after close(), ignoring");
            return;
        }
        guard.risk_score += match command.decision {
            Decision::Block => 1.0,
            Decision::Audit => 0.3,
            Decision::Allow => 0.0,
        };
        guard.history.push_back(command);
        while guard.history.len() > self.max_size {
            guard.history.pop_front();
        }
    }

    fn get_history(&self, limit: usize) -> Vec<EvaluatedCommand> {
        let guard = self.inner.read().expect("session store lock poisoned");
        guard.history.iter().rev().take(limit).rev().cloned().collect()
    }

    fn get_accessed_paths(&self) -> Vec<AccessedPath> {
        let guard = self.inner.read().expect("session store lock poisoned");
        guard
            .history
            .iter()
            .flat_map(|cmd| {
                cmd.paths.iter().map(move |p| AccessedPath {
                    path: p.clone(),
                    timestamp: cmd.timestamp,
                })
            })
            .collect()
    }

    fn get_risk_score(&self) -> f64 {
        self.inner.read().expect("session store lock poisoned").risk_score
    }

    fn close(&self) {
        self.inner.write().expect("session store lock poisoned").closed = true;
    }
}
