use tablematch_domain::{CorpusKind, Statement};

use crate::ports::StatementSource;

pub const STATEMENT_TERMINATOR: char = ';';

/// Statement corpus held as one text buffer and split lazily on each pass.
///
/// Text containing at least one `;` is split on `;`; anything else is treated
/// as one statement per line. Blank fragments are dropped before ids are
/// assigned, so ids are dense.
#[derive(Debug, Clone)]
pub struct CorpusText {
    kind: CorpusKind,
    text: String,
}

impl CorpusText {
    pub fn new(kind: CorpusKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn empty(kind: CorpusKind) -> Self {
        Self::new(kind, String::new())
    }

    pub fn is_line_delimited(&self) -> bool {
        !self.text.contains(STATEMENT_TERMINATOR)
    }
}

impl StatementSource for CorpusText {
    fn kind(&self) -> CorpusKind {
        self.kind
    }

    fn statements(&self) -> Box<dyn Iterator<Item = Statement> + '_> {
        let separator = if self.is_line_delimited() {
            '\n'
        } else {
            STATEMENT_TERMINATOR
        };
        Box::new(
            self.text
                .split(separator)
                .map(str::trim)
                .filter(|fragment| !fragment.is_empty())
                .enumerate()
                .map(|(id, fragment)| Statement::new(id, fragment)),
        )
    }
}
