//! Source position tracking, following the line/column convention used
//! throughout this lineage for diagnostics (`"<line>:<col> <message>"`).

use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, serde::Serialize, serde::Deserialize)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

impl Span {
    pub fn new(line: usize, col: usize) -> Self {
        Span { line, col }
    }

    /// A span used for synthetic nodes the core itself constructs (e.g. a
    /// desugared compound-assignment target) that have no source position.
    pub fn synthetic() -> Self {
        Span { line: 0, col: 0 }
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
