//! Built-in structural checks (spec.md §4.3).

use crate::model::{CommandSegment, Decision, Finding, Operator, ParsedCommand};
use crate::parser::flags::flags_contains_aliased;
use crate::vocab;

const ANALYZER_NAME: &str = "structural";

pub fn run(parsed: &ParsedCommand) -> Vec<Finding> {
    let mut findings = Vec::new();
    for seg in parsed.all_segments() {
        rm_recursive_root(seg, &mut findings);
        rm_system_dir(seg, &mut findings);
        dd_output_target(seg, &mut findings);
        chmod_symbolic(seg, &mut findings);
    }
    pipe_checks(parsed, &mut findings);
    findings
}

fn has_recursive_force(seg: &CommandSegment) -> bool {
    flags_contains_aliased(&seg.flags, "r") && flags_contains_aliased(&seg.flags, "f")
}

fn rm_recursive_root(seg: &CommandSegment, findings: &mut Vec<Finding>) {
    if seg.executable != "rm" || !has_recursive_force(seg) {
        return;
    }
    if seg.args.iter().any(|a| vocab::is_root_target(a)) {
        findings.push(Finding::new(
            ANALYZER_NAME,
            "st-block-rm-recursive-root",
            Decision::Block,
            0.95,
            format!("recursive force removal of a root target: {}", seg.raw),
        ));
    }
}

fn rm_system_dir(seg: &CommandSegment, findings: &mut Vec<Finding>) {
    if seg.executable != "rm" || !has_recursive_force(seg) {
        return;
    }
    if let Some(arg) = seg.args.iter().find(|a| vocab::is_system_directory(a)) {
        findings.push(Finding::new(
            ANALYZER_NAME,
            "st-block-rm-system-dir",
            Decision::Block,
            0.95,
            format!("recursive force removal of system directory {arg}"),
        ));
    }
}

fn dd_arg_value<'a>(seg: &'a CommandSegment, key: &str) -> Option<&'a str> {
    seg.args.iter().find_map(|a| a.strip_prefix(key))
}

fn dd_output_target(seg: &CommandSegment, findings: &mut Vec<Finding>) {
    if seg.executable != "dd" {
        return;
    }
    let Some(if_val) = dd_arg_value(seg, "if=") else { return };
    let Some(of_val) = dd_arg_value(seg, "of=") else { return };
    if vocab::is_zero_source(if_val) && !vocab::is_block_device(of_val) {
        findings.push(
            Finding::new(
                ANALYZER_NAME,
                "st-allow-dd-output-target",
                Decision::Allow,
                0.90,
                format!("dd writes {if_val} to ordinary file {of_val}, not a block device"),
            )
            .with_taxonomy("dd-output-target")
            .with_tags(vec!["structural-override".to_string()]),
        );
    }
}

fn under_system_directory(path: &str) -> bool {
    vocab::SYSTEM_DIRECTORIES
        .iter()
        .any(|d| path == *d || path.starts_with(&format!("{d}/")))
}

fn is_world_writable_mode(mode: &str) -> bool {
    mode == "777"
        || mode == "0777"
        || (mode.contains("a+") && mode.contains('w'))
        || (mode.contains("o+") && mode.contains('w'))
        || (mode.starts_with('+') && mode.contains('w'))
}

fn chmod_symbolic(seg: &CommandSegment, findings: &mut Vec<Finding>) {
    if seg.executable != "chmod" {
        return;
    }
    let Some(mode) = seg.args.first() else { return };
    if !is_world_writable_mode(mode) {
        return;
    }
    if let Some(path) = seg.args.iter().skip(1).find(|a| under_system_directory(a)) {
        findings.push(Finding::new(
            ANALYZER_NAME,
            "st-block-chmod-symbolic-system",
            Decision::Block,
            0.90,
            format!("world-writable chmod ({mode}) on system path {path}"),
        ));
    }
}

fn walk_pipe_edges(parsed: &ParsedCommand, findings: &mut Vec<Finding>) {
    for (i, op) in parsed.operators.iter().enumerate() {
        if *op != Operator::Pipe {
            continue;
        }
        let (Some(left), Some(right)) = (parsed.segments.get(i), parsed.segments.get(i + 1)) else {
            continue;
        };
        if vocab::is_download_command(&left.executable)
            && (vocab::is_shell(&right.executable) || right.is_code_interpreter())
        {
            findings.push(Finding::new(
                ANALYZER_NAME,
                "st-block-pipe-to-interpreter",
                Decision::Block,
                0.95,
                format!("{} piped directly into interpreter {}", left.executable, right.executable),
            ));
        }
        if vocab::DANGEROUS_PIPE_TARGETS.contains(&right.executable.as_str()) {
            findings.push(Finding::new(
                ANALYZER_NAME,
                "st-audit-pipe-to-dangerous-target",
                Decision::Audit,
                0.85,
                format!("piped into sensitive command {}", right.executable),
            ));
        }
    }
}

fn pipe_checks(parsed: &ParsedCommand, findings: &mut Vec<Finding>) {
    walk_pipe_edges(parsed, findings);
    for sub in &parsed.subcommands {
        pipe_checks(sub, findings);
    }
}
