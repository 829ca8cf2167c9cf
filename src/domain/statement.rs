use std::fmt;

use serde::Serialize;

/// Ordinal position of a statement within its own corpus (0-based).
pub type StatementId = usize;

/// Which of the two disjoint statement universes a corpus belongs to.
///
/// Ids are only unique within one kind: read statement 3 and write
/// statement 3 are unrelated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CorpusKind {
    Read,
    Write,
}

impl CorpusKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

impl fmt::Display for CorpusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub id: StatementId,
    pub text: String,
}

impl Statement {
    pub fn new(id: StatementId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }

    /// Single-line preview for logs, cut at `max_chars` with a trailing `...`.
    pub fn preview(&self, max_chars: usize) -> String {
        let flat = self.text.split_whitespace().collect::<Vec<_>>().join(" ");
        if flat.chars().count() > max_chars {
            let head: String = flat.chars().take(max_chars).collect();
            format!("{}...", head)
        } else {
            flat
        }
    }
}
