//! Line-oriented graph scripts for `lr run`.
//!
//! One command per line. Blank lines and lines starting with `#` are
//! ignored; a `#` after a command starts a trailing comment.
//!
//! ```text
//! page 3          # add three pages
//! link 1 2
//! link 3 2
//! damping 0.9
//! show
//! unlink 3 2
//! drop 1
//! iterations 50
//! reset
//! ```
//!
//! Parsing is all-or-nothing: a malformed line rejects the whole script
//! before anything runs.

use linkrank_core::NodeId;

/// One parsed script command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Add `count` pages.
    Page(usize),
    /// Remove a page and its links.
    Drop(NodeId),
    Link(NodeId, NodeId),
    Unlink(NodeId, NodeId),
    Reset,
    Damping(f64),
    Iterations(usize),
    /// Print the current ranking and link tables.
    Show,
}

/// A command together with the 1-based line it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub line: usize,
    pub command: Command,
}

/// A script line that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: unknown command `{word}`")]
    UnknownCommand { line: usize, word: String },
    #[error("line {line}: `{command}` expects {expected}")]
    WrongArity {
        line: usize,
        command: &'static str,
        expected: &'static str,
    },
    #[error("line {line}: invalid {what} `{value}`")]
    InvalidValue {
        line: usize,
        what: &'static str,
        value: String,
    },
}

impl ParseError {
    pub const fn line(&self) -> usize {
        match self {
            Self::UnknownCommand { line, .. }
            | Self::WrongArity { line, .. }
            | Self::InvalidValue { line, .. } => *line,
        }
    }
}

/// Parse a whole script.
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered, carrying its line number.
pub fn parse(source: &str) -> Result<Vec<Step>, ParseError> {
    let mut steps = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }
        let words: Vec<&str> = content.split_whitespace().collect();
        steps.push(Step {
            line,
            command: parse_words(line, &words)?,
        });
    }
    Ok(steps)
}

fn parse_words(line: usize, words: &[&str]) -> Result<Command, ParseError> {
    let arity = |command: &'static str, expected: &'static str| ParseError::WrongArity {
        line,
        command,
        expected,
    };

    match words {
        ["page"] => Ok(Command::Page(1)),
        ["page", count] => Ok(Command::Page(number(line, "page count", count)?)),
        ["page", ..] => Err(arity("page", "at most one count")),

        ["drop", id] => Ok(Command::Drop(page_id(line, id)?)),
        ["drop", ..] => Err(arity("drop", "one page id")),

        ["link", s, t] => Ok(Command::Link(page_id(line, s)?, page_id(line, t)?)),
        ["link", ..] => Err(arity("link", "a source and a target page id")),

        ["unlink", s, t] => Ok(Command::Unlink(page_id(line, s)?, page_id(line, t)?)),
        ["unlink", ..] => Err(arity("unlink", "a source and a target page id")),

        ["reset"] => Ok(Command::Reset),
        ["reset", ..] => Err(arity("reset", "no arguments")),

        ["damping", value] => value
            .parse::<f64>()
            .map(Command::Damping)
            .map_err(|_| invalid(line, "damping", value)),
        ["damping", ..] => Err(arity("damping", "one number")),

        ["iterations", value] => Ok(Command::Iterations(number(line, "iteration count", value)?)),
        ["iterations", ..] => Err(arity("iterations", "one count")),

        ["show"] => Ok(Command::Show),
        ["show", ..] => Err(arity("show", "no arguments")),

        _ => Err(ParseError::UnknownCommand {
            line,
            word: words.first().copied().unwrap_or_default().to_string(),
        }),
    }
}

fn page_id(line: usize, raw: &str) -> Result<NodeId, ParseError> {
    raw.parse::<NodeId>()
        .map_err(|_| invalid(line, "page id", raw))
}

fn number(line: usize, what: &'static str, raw: &str) -> Result<usize, ParseError> {
    raw.parse::<usize>().map_err(|_| invalid(line, what, raw))
}

fn invalid(line: usize, what: &'static str, raw: &str) -> ParseError {
    ParseError::InvalidValue {
        line,
        what,
        value: raw.to_string(),
    }
}
