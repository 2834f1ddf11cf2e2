use std::collections::HashMap;

use crate::vocab;

/// A connector between two adjacent [`CommandSegment`]s in a [`ParsedCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `|`
    Pipe,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `;`
    Semi,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Pipe => "|",
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Semi => ";",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A redirection operator (spec.md §3 `Redirect`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectOp {
    /// `>`
    Truncate,
    /// `>>`
    Append,
    /// `<`
    Input,
    /// `2>`
    Stderr,
}

impl RedirectOp {
    pub fn as_str(self) -> &'static str {
        match self {
            RedirectOp::Truncate => ">",
            RedirectOp::Append => ">>",
            RedirectOp::Input => "<",
            RedirectOp::Stderr => "2>",
        }
    }

    /// True for the two operators that write to `path` (used by dataflow
    /// sink checks, which only care about writes).
    pub fn writes(self) -> bool {
        matches!(self, RedirectOp::Truncate | RedirectOp::Append)
    }
}

/// A single redirection: `{op, path}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub op: RedirectOp,
    pub path: String,
}

/// One executable invocation within a pipeline (spec.md §3 `CommandSegment`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSegment {
    /// Textual slice of the segment as it appeared in the source.
    pub raw: String,
    /// Base command name, after sudo transparency has been applied.
    pub executable: String,
    /// Second token for tools with a verb, e.g. `install` in `npm install`.
    /// Only populated when `executable` is in [`vocab::SUBCOMMAND_TOOLS`].
    pub subcommand: Option<String>,
    /// Positional arguments, in source order.
    pub args: Vec<String>,
    /// Normalized flags: key -> value (empty string when value-less).
    pub flags: HashMap<String, String>,
    /// Redirections attached directly to this segment.
    pub redirects: Vec<Redirect>,
    /// True when `executable` is a recognized shell.
    pub is_shell: bool,
}

impl CommandSegment {
    /// Construct a segment from already-classified parts, deriving
    /// `is_shell` and `subcommand` from the fixed vocabulary tables.
    pub fn new(raw: String, executable: String, args: Vec<String>, flags: HashMap<String, String>) -> Self {
        let is_shell = vocab::is_shell(&executable);
        let subcommand = if vocab::SUBCOMMAND_TOOLS.contains(&executable.as_str()) {
            args.first().cloned()
        } else {
            None
        };
        CommandSegment {
            raw,
            executable,
            subcommand,
            args,
            flags,
            redirects: Vec::new(),
            is_shell,
        }
    }

    /// True when `executable` is a recognized code interpreter (python, node, …).
    pub fn is_code_interpreter(&self) -> bool {
        vocab::is_code_interpreter(&self.executable)
    }

    /// Present and non-empty flag lookup by exact normalized key (e.g. `"r"` or `"recursive"`).
    pub fn has_flag(&self, key: &str) -> bool {
        self.flags.contains_key(key)
    }

    pub fn flag_value(&self, key: &str) -> Option<&str> {
        self.flags.get(key).map(|s| s.as_str())
    }
}

/// A normalized shell-syntax tree (spec.md §3 `ParsedCommand`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedCommand {
    /// One per pipeline-joined command, in source order.
    pub segments: Vec<CommandSegment>,
    /// Connectors between adjacent segments; `operators[i]` joins
    /// `segments[i]` and `segments[i+1]` under left-associative emission order.
    pub operators: Vec<Operator>,
    /// Redirects that apply to the overall statement rather than one segment.
    pub redirects: Vec<Redirect>,
    /// One entry per inline-code argument discovered at deeper parse depths
    /// (`sh -c '...'`, `python -c '...'`), each independently parsed.
    pub subcommands: Vec<ParsedCommand>,
}

impl ParsedCommand {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Iterate every segment in this tree, including those nested in
    /// `subcommands`, depth-first.
    pub fn all_segments(&self) -> Vec<&CommandSegment> {
        let mut out: Vec<&CommandSegment> = self.segments.iter().collect();
        for sub in &self.subcommands {
            out.extend(sub.all_segments());
        }
        out
    }

    /// All redirects visible at this level: this tree's top-level redirects
    /// plus each segment's own, paired with the owning segment when known.
    pub fn segment_redirects(&self) -> Vec<(Option<&CommandSegment>, &Redirect)> {
        let mut out = Vec::new();
        for (i, r) in self.redirects.iter().enumerate() {
            let owner = if i == 0 {
                self.segments.first()
            } else {
                self.segments.last()
            };
            out.push((owner, r));
        }
        for seg in &self.segments {
            for r in &seg.redirects {
                out.push((Some(seg), r));
            }
        }
        out
    }
}
