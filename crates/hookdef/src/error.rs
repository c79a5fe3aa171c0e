//! Error types for definition parsing and script evaluation.

use std::{
    cmp::{max, min},
    fmt::Write as _,
};

use thiserror::Error;

/// Errors produced while parsing definitions or running embedded script.
///
/// Malformed-definition variants are expected at runtime and are logged and
/// skipped by the dispatcher rather than surfaced; script variants carry
/// enough location detail to render a useful diagnostic.
#[derive(Debug, Error, Clone)]
pub enum Error {
    /// The `data-had` attribute text is not a valid JSON event map.
    #[error("definition map is not valid JSON: {message}")]
    Map {
        /// Underlying parse failure.
        message: String,
    },
    /// A raw definition entry is neither a positional array nor a named
    /// object.
    #[error("definition is neither a positional array nor a named object")]
    Shape,
    /// A positional definition with out-of-range arity.
    #[error("positional definition must have 1 to 4 entries, got {len}")]
    Arity {
        /// Number of entries observed.
        len: usize,
    },
    /// A positional entry of the wrong type.
    #[error("definition entry {index} must be {expected}")]
    Field {
        /// Zero-based entry index.
        index: usize,
        /// Description of the expected type.
        expected: &'static str,
    },
    /// A definition without a usable action name.
    #[error("definition has no action name")]
    MissingAction,
    /// Embedded condition or callback source failed to compile or run.
    #[error("{message}")]
    Script {
        /// 1-based line number when known.
        line: Option<usize>,
        /// 1-based column number when known.
        col: Option<usize>,
        /// Human-readable error message.
        message: String,
        /// Rendered excerpt including a caret at the error location.
        excerpt: Option<String>,
    },
}

impl Error {
    /// Render a human-friendly message including location and excerpt when
    /// available.
    pub fn pretty(&self) -> String {
        match self {
            Self::Script {
                line,
                col,
                message,
                excerpt,
            } => {
                let mut out = match (line, col) {
                    (Some(l), Some(c)) => {
                        format!("script error at line {}, column {}\n{}", l, c, message)
                    }
                    (Some(l), None) => format!("script error at line {}\n{}", l, message),
                    _ => format!("script error\n{}", message),
                };
                if let Some(ex) = excerpt {
                    out.push('\n');
                    out.push_str(ex);
                }
                out
            }
            other => other.to_string(),
        }
    }
}

/// Build a small 2–3 line excerpt with a caret at `(line_no, col_no)`.
pub(crate) fn excerpt_at(source: &str, line_no: usize, col_no: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let total = lines.len();
    let start = max(1usize, line_no.saturating_sub(2));
    let end = min(total, line_no + 1);

    let mut out = String::new();
    for n in start..=end {
        let text = lines.get(n - 1).copied().unwrap_or("");
        let _ignored = writeln!(out, " {:>4} | {}", n, text);
        if n == line_no {
            let prefix = format!(" {:>4} | ", n);
            let _ignored = writeln!(
                out,
                "{}{}^",
                " ".repeat(prefix.len()),
                " ".repeat(col_no.saturating_sub(1))
            );
        }
    }
    out
}
