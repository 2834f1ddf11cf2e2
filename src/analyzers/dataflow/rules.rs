//! User-supplied dataflow rules (spec.md §4.5): a named source endpoint and
//! sink endpoint, matched against either a pipe chain or a redirect.

use serde::Deserialize;

use crate::glob::Pattern;
use crate::model::{CommandSegment, Decision, Finding, ParsedCommand};
use crate::vocab;

const ANALYZER_NAME: &str = "dataflow";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    Credential,
    Sensitive,
    Zero,
    Network,
    Device,
    Cron,
}

fn path_matches_kind(kind: EndpointKind, path: &str) -> bool {
    match kind {
        EndpointKind::Credential => vocab::has_credential_fragment(path),
        EndpointKind::Sensitive => vocab::is_sensitive_path(path),
        EndpointKind::Zero => vocab::is_zero_source(path),
        EndpointKind::Device => vocab::is_block_device(path),
        EndpointKind::Cron => vocab::is_cron_sink(path),
        EndpointKind::Network => false,
    }
}

fn segment_matches_kind(kind: EndpointKind, seg: &CommandSegment) -> bool {
    match kind {
        EndpointKind::Network => vocab::is_network_command(&seg.executable),
        EndpointKind::Credential => seg.args.iter().any(|a| vocab::has_credential_fragment(a)),
        EndpointKind::Sensitive => seg.args.iter().any(|a| vocab::is_sensitive_path(a)),
        EndpointKind::Zero => seg.args.iter().any(|a| vocab::is_zero_source(a)),
        EndpointKind::Device => seg.args.iter().any(|a| vocab::is_block_device(a)),
        EndpointKind::Cron => seg.args.iter().any(|a| vocab::is_cron_sink(a)),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataflowEndpoint {
    #[serde(rename = "type", default)]
    pub kind: Option<EndpointKind>,
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default)]
    pub commands: Vec<String>,
}

impl DataflowEndpoint {
    fn compiled_paths(&self) -> Vec<Pattern> {
        self.paths
            .iter()
            .filter_map(|p| match Pattern::compile(p) {
                Ok(pat) => Some(pat),
                Err(e) => {
                    log::warn!("dataflow rule: skipping invalid path pattern: {e}");
                    None
                }
            })
            .collect()
    }

    /// At least one of `type`/`paths`/`commands` must be set and match; an
    /// endpoint with none set never matches anything.
    fn matches_segment(&self, seg: &CommandSegment) -> bool {
        let mut any = false;
        if let Some(kind) = self.kind {
            any = true;
            if !segment_matches_kind(kind, seg) {
                return false;
            }
        }
        if !self.commands.is_empty() {
            any = true;
            if !self.commands.iter().any(|c| c == &seg.executable) {
                return false;
            }
        }
        if !self.paths.is_empty() {
            any = true;
            let patterns = self.compiled_paths();
            if !seg.args.iter().any(|a| patterns.iter().any(|p| p.is_match(a))) {
                return false;
            }
        }
        any
    }

    fn matches_path(&self, path: &str) -> bool {
        let mut any = false;
        if let Some(kind) = self.kind {
            any = true;
            if !path_matches_kind(kind, path) {
                return false;
            }
        }
        if !self.paths.is_empty() {
            any = true;
            let patterns = self.compiled_paths();
            if !patterns.iter().any(|p| p.is_match(path)) {
                return false;
            }
        }
        any
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataflowRule {
    pub id: String,
    pub decision: Decision,
    #[serde(default)]
    pub confidence: f64,
    pub reason: String,
    #[serde(default)]
    pub taxonomy: String,
    #[serde(default)]
    pub source: Option<DataflowEndpoint>,
    #[serde(default)]
    pub sink: Option<DataflowEndpoint>,
    #[serde(default)]
    pub via: Vec<String>,
    #[serde(default)]
    pub negate: bool,
}

impl DataflowRule {
    pub fn evaluate(&self, parsed: &ParsedCommand) -> Option<Finding> {
        let raw_match = self.pipe_flow_exists(parsed) || self.redirect_flow_exists(parsed);
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

    fn pipe_flow_exists(&self, parsed: &ParsedCommand) -> bool {
        let (Some(source), Some(sink)) = (&self.source, &self.sink) else {
            return false;
        };
        for i in 0..parsed.segments.len() {
            if !source.matches_segment(&parsed.segments[i]) {
                continue;
            }
            for j in (i + 1)..parsed.segments.len() {
                if !sink.matches_segment(&parsed.segments[j]) {
                    continue;
                }
                if self.via.is_empty() {
                    return true;
                }
                if parsed.segments[i + 1..j]
                    .iter()
                    .any(|seg| self.via.iter().any(|v| v == &seg.executable))
                {
                    return true;
                }
            }
        }
        false
    }

    fn redirect_flow_exists(&self, parsed: &ParsedCommand) -> bool {
        let (Some(source), Some(sink)) = (&self.source, &self.sink) else {
            return false;
        };
        for (owner, redirect) in parsed.segment_redirects() {
            if !redirect.op.writes() {
                continue;
            }
            let Some(seg) = owner else { continue };
            if source.matches_segment(seg) && sink.matches_path(&redirect.path) {
                return true;
            }
        }
        false
    }
}
