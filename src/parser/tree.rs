//! Grammar-based structural parsing via `tree-sitter-bash`.
//!
//! Walks the concrete syntax tree by node kind rather than by named field,
//! since the thing we need reliably out of the grammar is top-level shape
//! (pipelines, logical connectors, statement separators, subshells,
//! redirects) — word-level splitting inside each simple command is handled
//! by [`super::tokenize`] against the node's own source span, so quoting
//! inside a command is respected without depending on the grammar's
//! internal word/string node structure.

use tree_sitter::{Node, Parser};

use crate::model::command::{Operator, ParsedCommand, Redirect, RedirectOp};

use super::tokenize;

/// Returns `None` when the grammar reports a syntax error or produces no
/// segments at all, signaling the caller to use the whitespace/pipe fallback.
pub fn parse_with_grammar(raw: &str) -> Option<ParsedCommand> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_bash::LANGUAGE.into()).ok()?;
    let tree = parser.parse(raw, None)?;
    let root = tree.root_node();
    if root.has_error() {
        return None;
    }

    let walker = Walker { source: raw.as_bytes() };
    let mut out = ParsedCommand::default();
    walker.walk(root, &mut out);

    if out.segments.is_empty() {
        return None;
    }
    Some(out)
}

struct Walker<'a> {
    source: &'a [u8],
}

impl<'a> Walker<'a> {
    fn text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source).unwrap_or("")
    }

    /// Walk a statement node, appending segments/operators/redirects to
    /// `out` in left-associative emission order.
    fn walk(&self, node: Node, out: &mut ParsedCommand) {
        match node.kind() {
            "program" => {
                let mut cursor = node.walk();
                let mut saw_statement = false;
                for child in node.children(&mut cursor) {
                    if !child.is_named() {
                        if child.kind() == ";" && saw_statement {
                            out.operators.push(Operator::Semi);
                        }
                        continue;
                    }
                    self.walk(child, out);
                    saw_statement = true;
                }
            }
            "list" => {
                let mut cursor = node.walk();
                let mut pending_op = None;
                let mut walked_left = false;
                for child in node.children(&mut cursor) {
                    match child.kind() {
                        "&&" => pending_op = Some(Operator::And),
                        "||" => pending_op = Some(Operator::Or),
                        _ if child.is_named() => {
                            if walked_left {
                                out.operators.push(pending_op.take().unwrap_or(Operator::Semi));
                            }
                            self.walk(child, out);
                            walked_left = true;
                        }
                        _ => {}
                    }
                }
            }
            "pipeline" => {
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    match child.kind() {
                        "|" | "|&" => out.operators.push(Operator::Pipe),
                        _ if child.is_named() => self.walk(child, out),
                        _ => {}
                    }
                }
            }
            "redirected_statement" => self.walk_redirected_statement(node, out),
            "subshell" | "negated_command" | "compound_statement" => {
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    if child.is_named() {
                        self.walk(child, out);
                    }
                }
            }
            "command" => {
                if let Some(seg) = self.build_segment(node) {
                    out.segments.push(seg);
                }
            }
            _ => self.fallback_leaf(node, out),
        }
    }

    fn fallback_leaf(&self, node: Node, out: &mut ParsedCommand) {
        let raw = self.text(node);
        if raw.trim().is_empty() {
            return;
        }
        let tokens = tokenize::shlex_split(raw);
        if let Some(seg) = tokenize::build_segment(raw, tokens) {
            out.segments.push(seg);
        }
    }

    fn build_segment(&self, node: Node) -> Option<crate::model::command::CommandSegment> {
        let raw = self.text(node);
        let tokens = tokenize::shlex_split(raw);
        tokenize::build_segment(raw, tokens)
    }

    /// A `redirected_statement` wraps a body (simple command, pipeline, or
    /// list) with one or more `file_redirect`/`heredoc_redirect` children.
    /// A redirect on a single-segment body attaches to that segment; a
    /// redirect on a multi-segment body is recorded at the statement level.
    fn walk_redirected_statement(&self, node: Node, out: &mut ParsedCommand) {
        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();

        let before = out.segments.len();
        for child in &children {
            if child.is_named() && child.kind() != "file_redirect" && child.kind() != "heredoc_redirect" {
                self.walk(*child, out);
            }
        }
        let added = out.segments.len().saturating_sub(before);

        let redirects: Vec<Redirect> = children
            .iter()
            .filter(|c| c.kind() == "file_redirect")
            .filter_map(|c| self.build_redirect(*c))
            .collect();

        if added == 1 {
            if let Some(seg) = out.segments.last_mut() {
                seg.redirects.extend(redirects);
            }
        } else {
            out.redirects.extend(redirects);
        }
    }

    fn build_redirect(&self, node: Node) -> Option<Redirect> {
        let mut cursor = node.walk();
        let mut descriptor = None;
        let mut op = None;
        let mut destination = None;
        for child in node.children(&mut cursor) {
            match child.kind() {
                "file_descriptor" => descriptor = Some(self.text(child)),
                ">" => op = Some(RedirectOp::Truncate),
                ">>" => op = Some(RedirectOp::Append),
                "<" => op = Some(RedirectOp::Input),
                _ if child.is_named() => destination = Some(self.text(child)),
                _ => {}
            }
        }
        let mut op = op?;
        if descriptor == Some("2") && op == RedirectOp::Truncate {
            op = RedirectOp::Stderr;
        }
        Some(Redirect { op, path: destination?.to_string() })
    }
}
