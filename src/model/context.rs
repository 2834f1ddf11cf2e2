use super::command::ParsedCommand;
use super::dataflow::DataFlow;
use super::intent::CommandIntent;

/// Snapshot of session state made available to analyzers that need to reason
/// about prior commands without talking to the session store directly.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub risk_score: f64,
    pub recent_paths: Vec<String>,
}

/// The shared per-request state threaded through every analyzer layer
/// (spec.md §3 `AnalysisContext`).
///
/// Created per evaluation, mutated in strict layer order by `Registry::run_all`,
/// consumed by the combiner, then discarded. Single-writer at a time: layers
/// run sequentially, never concurrently, against one context.
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    pub raw_command: String,
    pub parsed: Option<ParsedCommand>,
    pub intents: Vec<CommandIntent>,
    pub dataflows: Vec<DataFlow>,
    pub session_state: Option<SessionSnapshot>,
}

impl AnalysisContext {
    pub fn new(raw_command: impl Into<String>) -> Self {
        AnalysisContext {
            raw_command: raw_command.into(),
            parsed: None,
            intents: Vec::new(),
            dataflows: Vec::new(),
            session_state: None,
        }
    }

    pub fn with_session_state(mut self, snapshot: SessionSnapshot) -> Self {
        self.session_state = Some(snapshot);
        self
    }

    pub fn add_intent(&mut self, intent: CommandIntent) {
        self.intents.push(intent);
    }

    pub fn add_dataflow(&mut self, flow: DataFlow) {
        self.dataflows.push(flow);
    }
}
