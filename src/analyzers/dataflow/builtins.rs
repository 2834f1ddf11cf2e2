//! Built-in dataflow detectors (spec.md §4.5): source/sink classification,
//! redirect flow, pipe flow, and command-substitution exfiltration.

use crate::model::{CommandSegment, DataFlow, Decision, Finding, ParsedCommand, Risk};
use crate::vocab;

const ANALYZER_NAME: &str = "dataflow";

const SOURCE_READ_COMMANDS: &[&str] = &["cat", "head", "tail", "less", "more", "tac", "nl"];
const SUBSTITUTION_RAW_FRAGMENTS: &[&str] = &["/etc/passwd", "/etc/shadow", ".ssh/", ".aws/"];

pub fn run(raw_command: &str, parsed: &ParsedCommand) -> (Vec<Finding>, Vec<DataFlow>) {
    let mut findings = Vec::new();
    let mut dataflows = Vec::new();

    redirect_flow_check(parsed, &mut findings, &mut dataflows);
    pipe_flow_check(parsed, &mut findings, &mut dataflows);
    substitution_exfil_check(raw_command, parsed, &mut findings);

    (findings, dataflows)
}

/// Classify a segment's dataflow source, if any.
fn classify_source(seg: &CommandSegment) -> Option<&'static str> {
    let candidate = if SOURCE_READ_COMMANDS.contains(&seg.executable.as_str()) {
        seg.args.iter().map(String::as_str).collect::<Vec<_>>()
    } else if seg.executable == "dd" {
        seg.args
            .iter()
            .find_map(|a| a.strip_prefix("if="))
            .into_iter()
            .collect()
    } else {
        return None;
    };

    if candidate.iter().any(|a| vocab::is_zero_source(a)) {
        return Some("zero-source");
    }
    if candidate.iter().any(|a| vocab::is_sensitive_path(a)) {
        return Some("sensitive-source");
    }
    if candidate.iter().any(|a| vocab::has_credential_fragment(a)) {
        return Some("credential-source");
    }
    None
}

fn classify_sink(path: &str) -> Option<&'static str> {
    if vocab::is_block_device(path) {
        return Some("device-sink");
    }
    if vocab::is_cron_sink(path) {
        return Some("cron-sink");
    }
    None
}

fn redirect_flow_check(parsed: &ParsedCommand, findings: &mut Vec<Finding>, dataflows: &mut Vec<DataFlow>) {
    for (owner, redirect) in parsed.segment_redirects() {
        let sink = classify_sink(&redirect.path);
        let source = owner.and_then(classify_source);

        if source == Some("zero-source") && sink == Some("device-sink") {
            findings.push(Finding::new(
                ANALYZER_NAME,
                "df-block-zero-to-device",
                Decision::Block,
                0.95,
                format!("zero/random source written to block device {}", redirect.path),
            ));
            dataflows.push(DataFlow::new("zero-source", redirect.path.clone(), "redirect", Risk::Critical));
            continue;
        }
        if source == Some("sensitive-source") && sink == Some("device-sink") {
            findings.push(Finding::new(
                ANALYZER_NAME,
                "df-block-sensitive-to-device",
                Decision::Block,
                0.90,
                format!("sensitive source written to block device {}", redirect.path),
            ));
            dataflows.push(DataFlow::new("sensitive-source", redirect.path.clone(), "redirect", Risk::High));
            continue;
        }
        if redirect.op.writes() && sink == Some("cron-sink") {
            findings.push(Finding::new(
                ANALYZER_NAME,
                "df-block-write-cron-spool",
                Decision::Block,
                0.90,
                format!("write redirected into cron spool path {}", redirect.path),
            ));
            dataflows.push(DataFlow::new(source.unwrap_or(""), redirect.path.clone(), "redirect", Risk::High));
        }
    }
}

fn pipe_flow_check(parsed: &ParsedCommand, findings: &mut Vec<Finding>, dataflows: &mut Vec<DataFlow>) {
    if parsed.segments.len() < 2 {
        return;
    }
    let mut has_sensitive_source = false;
    let mut has_encoding = false;
    let mut source_label = "";

    for seg in &parsed.segments {
        if let Some(label) = classify_source(seg) {
            if label == "sensitive-source" || label == "credential-source" {
                has_sensitive_source = true;
                source_label = label;
            }
        }
        if vocab::is_encoding_command(&seg.executable) {
            has_encoding = true;
        }
        if vocab::is_network_command(&seg.executable) && has_sensitive_source {
            let transform = if has_encoding { "pipe+encoding" } else { "pipe" };
            findings.push(Finding::new(
                ANALYZER_NAME,
                "df-block-sensitive-to-network",
                Decision::Block,
                0.90,
                format!("sensitive data piped into network command {}", seg.executable),
            ));
            dataflows.push(DataFlow::new(source_label, seg.executable.clone(), transform, Risk::High));
        }
    }
}

fn subtree_has_sensitive_source(parsed: &ParsedCommand) -> bool {
    parsed.subcommands.iter().any(|sub| {
        sub.segments
            .iter()
            .any(|s| matches!(classify_source(s), Some("sensitive-source") | Some("credential-source")))
            || subtree_has_sensitive_source(sub)
    })
}

fn substitution_exfil_check(raw_command: &str, parsed: &ParsedCommand, findings: &mut Vec<Finding>) {
    let has_substitution = raw_command.contains("$(") || raw_command.contains('`');
    if !has_substitution {
        return;
    }

    let outer_is_dns = parsed.segments.iter().any(|s| vocab::is_dns_command(&s.executable));
    let outer_is_network_or_dns =
        outer_is_dns || parsed.segments.iter().any(|s| vocab::is_network_command(&s.executable));

    if outer_is_network_or_dns && subtree_has_sensitive_source(parsed) {
        findings.push(Finding::new(
            ANALYZER_NAME,
            "df-block-substitution-exfil",
            Decision::Block,
            0.85,
            "command substitution exfiltrating a sensitive/credential source",
        ));
        return;
    }

    if SUBSTITUTION_RAW_FRAGMENTS.iter().any(|f| raw_command.contains(f)) {
        let (decision, confidence) = if outer_is_dns { (Decision::Block, 0.85) } else { (Decision::Audit, 0.70) };
        findings.push(Finding::new(
            ANALYZER_NAME,
            "df-block-substitution-exfil",
            decision,
            confidence,
            "command substitution alongside a sensitive path fragment",
        ));
    }
}
