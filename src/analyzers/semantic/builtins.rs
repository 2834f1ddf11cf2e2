//! Built-in intent classification (spec.md §4.4). Requires `parsed`.

use crate::model::{CommandIntent, Decision, Finding, ParsedCommand, Risk};
use crate::vocab;

const ANALYZER_NAME: &str = "semantic";

const INTERPRETER_NAMES: &[&str] = &["python", "python3", "python2"];
const RMTREE_PATTERNS: &[&str] = &["shutil.rmtree", "os.remove", "os.unlink"];
const FORK_BOMB_PATTERNS: &[&str] = &["os.fork()"];
const DNS_SAFE_PREFIXES: &[&str] =
    &["_dmarc.", "_spf.", "_dkim.", "_domainkey.", "_acme-challenge.", "_mta-sts."];

pub fn run(raw_command: &str, parsed: &ParsedCommand) -> (Vec<Finding>, Vec<CommandIntent>) {
    let mut findings = Vec::new();
    let mut intents = Vec::new();

    find_delete(raw_command, parsed, &mut findings, &mut intents);
    for (i, seg) in parsed.all_segments().iter().enumerate() {
        let idx = i as i32;
        shred_wipefs(seg, idx, &mut findings, &mut intents);
        network_scan(seg, idx, &mut findings, &mut intents);
        dns_safe(seg, idx, &mut findings, &mut intents);
    }
    python_rmtree(raw_command, parsed, &mut findings, &mut intents);
    python_fork_bomb(raw_command, parsed, &mut findings, &mut intents);
    pipe_to_crontab(parsed, &mut findings, &mut intents);
    pip_config_index(raw_command, &mut findings, &mut intents);
    crontab_modify(parsed, &mut findings, &mut intents);

    (findings, intents)
}

fn under_system_path(path: &str) -> bool {
    vocab::SYSTEM_DIRECTORIES
        .iter()
        .any(|d| path == *d || path.starts_with(&format!("{d}/")))
}

fn find_delete(
    raw_command: &str,
    parsed: &ParsedCommand,
    findings: &mut Vec<Finding>,
    intents: &mut Vec<CommandIntent>,
) {
    if !raw_command.contains("find") || !(raw_command.contains("-delete") || raw_command.contains("-exec")) {
        return;
    }
    let hit = parsed
        .all_segments()
        .into_iter()
        .find(|seg| seg.executable == "find" && seg.args.iter().any(|a| under_system_path(a)));
    let Some(seg) = hit else { return };
    findings.push(Finding::new(
        ANALYZER_NAME,
        "se-block-find-delete",
        Decision::Block,
        0.90,
        format!("find with -delete/-exec targeting system path: {}", seg.raw),
    ));
    intents.push(CommandIntent::new("file-delete", Risk::Critical, 0.90, -1, "find -delete/-exec on system path"));
}

fn shred_wipefs(seg: &crate::model::CommandSegment, idx: i32, findings: &mut Vec<Finding>, intents: &mut Vec<CommandIntent>) {
    let (rule_id, confidence) = match seg.executable.as_str() {
        "shred" => ("se-block-shred-device", 0.95),
        "wipefs" => ("se-block-wipefs-device", 0.90),
        _ => return,
    };
    if !seg.args.iter().any(|a| vocab::is_block_device(a)) {
        return;
    }
    findings.push(Finding::new(
        ANALYZER_NAME,
        rule_id,
        Decision::Block,
        confidence,
        format!("{} targeting a block device", seg.executable),
    ));
    intents.push(CommandIntent::new("disk-destroy", Risk::Critical, confidence, idx, seg.raw.clone()));
}

fn network_scan(seg: &crate::model::CommandSegment, idx: i32, findings: &mut Vec<Finding>, intents: &mut Vec<CommandIntent>) {
    if !matches!(seg.executable.as_str(), "nmap" | "masscan" | "zmap") {
        return;
    }
    findings.push(Finding::new(
        ANALYZER_NAME,
        "se-audit-network-scan",
        Decision::Audit,
        0.85,
        format!("network scanning tool invoked: {}", seg.executable),
    ));
    intents.push(CommandIntent::new("network-scan", Risk::Medium, 0.85, idx, seg.raw.clone()));
}

fn dns_safe(seg: &crate::model::CommandSegment, idx: i32, findings: &mut Vec<Finding>, intents: &mut Vec<CommandIntent>) {
    if !vocab::is_dns_command(&seg.executable) {
        return;
    }
    let safe = seg.args.iter().any(|a| {
        let lower = a.to_ascii_lowercase();
        DNS_SAFE_PREFIXES.iter().any(|p| lower.starts_with(p))
    });
    if !safe {
        return;
    }
    findings.push(
        Finding::new(
            ANALYZER_NAME,
            "se-allow-dns-safe",
            Decision::Allow,
            0.90,
            format!("{} looking up a well-known verification record", seg.executable),
        )
        .with_taxonomy("dns-safe")
        .with_tags(vec!["semantic-override".to_string()]),
    );
    intents.push(CommandIntent::new("dns-lookup", Risk::Info, 0.90, idx, seg.raw.clone()));
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn subcommand_contains(parsed: &ParsedCommand, patterns: &[&str]) -> bool {
    parsed.subcommands.iter().any(|sub| {
        sub.segments.iter().any(|s| contains_any(&s.raw, patterns)) || subcommand_contains(sub, patterns)
    })
}

fn python_pattern_present(raw_command: &str, parsed: &ParsedCommand, patterns: &[&str]) -> bool {
    contains_any(raw_command, INTERPRETER_NAMES)
        && (contains_any(raw_command, patterns) || subcommand_contains(parsed, patterns))
}

fn python_rmtree(raw_command: &str, parsed: &ParsedCommand, findings: &mut Vec<Finding>, intents: &mut Vec<CommandIntent>) {
    if !python_pattern_present(raw_command, parsed, RMTREE_PATTERNS) {
        return;
    }
    findings.push(Finding::new(
        ANALYZER_NAME,
        "se-block-python-rmtree",
        Decision::Block,
        0.85,
        "python code performs a recursive filesystem delete",
    ));
    intents.push(CommandIntent::new("file-delete", Risk::High, 0.85, -1, "python rmtree/remove/unlink"));
}

fn python_fork_bomb(raw_command: &str, parsed: &ParsedCommand, findings: &mut Vec<Finding>, intents: &mut Vec<CommandIntent>) {
    if !python_pattern_present(raw_command, parsed, FORK_BOMB_PATTERNS) {
        return;
    }
    findings.push(Finding::new(
        ANALYZER_NAME,
        "se-block-python-fork-bomb",
        Decision::Block,
        0.85,
        "python code forks without bound, risking resource exhaustion",
    ));
    intents.push(CommandIntent::new("resource-exhaustion", Risk::Critical, 0.85, -1, "python os.fork()"));
}

fn pipe_to_crontab(parsed: &ParsedCommand, findings: &mut Vec<Finding>, intents: &mut Vec<CommandIntent>) {
    for (i, seg) in parsed.segments.iter().enumerate().skip(1) {
        if seg.executable == "crontab" && seg.args.iter().any(|a| a == "-") {
            findings.push(Finding::new(
                ANALYZER_NAME,
                "se-block-pipe-to-crontab",
                Decision::Block,
                0.90,
                "piping content directly into the user's crontab",
            ));
            intents.push(CommandIntent::new("persistence", Risk::High, 0.90, i as i32, seg.raw.clone()));
        }
    }
}

fn pip_config_index(raw_command: &str, findings: &mut Vec<Finding>, intents: &mut Vec<CommandIntent>) {
    if raw_command.contains("pip config set") && (raw_command.contains("index-url") || raw_command.contains("extra-index-url")) {
        findings.push(Finding::new(
            ANALYZER_NAME,
            "se-block-pip-config-index",
            Decision::Block,
            0.85,
            "pip package index being redirected",
        ));
        intents.push(CommandIntent::new("supply-chain", Risk::High, 0.85, -1, "pip config set index-url"));
    }
}

fn crontab_modify(parsed: &ParsedCommand, findings: &mut Vec<Finding>, intents: &mut Vec<CommandIntent>) {
    for (i, seg) in parsed.all_segments().into_iter().enumerate() {
        if seg.executable != "crontab" {
            continue;
        }
        let has_e = seg.has_flag("e");
        let has_non_list_arg = seg.args.iter().any(|a| a != "-l");
        let has_dash_arg = seg.args.iter().any(|a| a == "-");
        if has_e || has_non_list_arg || has_dash_arg {
            findings.push(Finding::new(
                ANALYZER_NAME,
                "se-audit-crontab-modify",
                Decision::Audit,
                0.85,
                "crontab invoked in a way that modifies the schedule",
            ));
            intents.push(CommandIntent::new("persistence", Risk::Medium, 0.85, i as i32, seg.raw.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    #[test]
    fn find_delete_on_system_path_blocks() {
        let parsed = parser::parse("find /etc -name '*.conf' -delete");
        let (findings, intents) = run("find /etc -name '*.conf' -delete", &parsed);
        assert!(findings.iter().any(|f| f.rule_id == "se-block-find-delete"));
        assert!(intents.iter().any(|i| i.category == "file-delete"));
    }

    #[test]
    fn shred_block_device_blocks() {
        let parsed = parser::parse("shred /dev/sda");
        let (findings, _) = run("shred /dev/sda", &parsed);
        assert!(findings.iter().any(|f| f.rule_id == "se-block-shred-device"));
    }

    #[test]
    fn nmap_audits() {
        let parsed = parser::parse("nmap -sS 10.0.0.0/24");
        let (findings, _) = run("nmap -sS 10.0.0.0/24", &parsed);
        assert!(findings.iter().any(|f| f.rule_id == "se-audit-network-scan"));
    }

    #[test]
    fn dns_safe_allows_dmarc_lookup() {
        let parsed = parser::parse("dig _dmarc.example.com TXT");
        let (findings, _) = run("dig _dmarc.example.com TXT", &parsed);
        let f = findings.iter().find(|f| f.rule_id == "se-allow-dns-safe").unwrap();
        assert_eq!(f.decision, Decision::Allow);
        assert!(f.has_tag("semantic-override"));
    }

    #[test]
    fn dns_unsafe_lookup_has_no_override() {
        let parsed = parser::parse("dig example.com TXT");
        let (findings, _) = run("dig example.com TXT", &parsed);
        assert!(!findings.iter().any(|f| f.rule_id == "se-allow-dns-safe"));
    }

    #[test]
    fn python_rmtree_pattern_blocks() {
        let raw = "python3 -c \"import shutil; shutil.rmtree('/data')\"";
        let parsed = parser::parse(raw);
        let (findings, _) = run(raw, &parsed);
        assert!(findings.iter().any(|f| f.rule_id == "se-block-python-rmtree"));
    }

    #[test]
    fn crontab_minus_e_audits() {
        let parsed = parser::parse("crontab -e");
        let (findings, _) = run("crontab -e", &parsed);
        assert!(findings.iter().any(|f| f.rule_id == "se-audit-crontab-modify"));
    }

    #[test]
    fn crontab_list_only_does_not_audit() {
        let parsed = parser::parse("crontab -l");
        let (findings, _) = run("crontab -l", &parsed);
        assert!(!findings.iter().any(|f| f.rule_id == "se-audit-crontab-modify"));
    }

    #[test]
    fn pip_config_index_url_blocks() {
        let raw = "pip config set global.index-url https://evil.example.com/simple";
        let parsed = parser::parse(raw);
        let (findings, _) = run(raw, &parsed);
        assert!(findings.iter().any(|f| f.rule_id == "se-block-pip-config-index"));
    }
}
