use std::path::PathBuf;

use thiserror::Error;

use tablematch_domain::{CorpusKind, Statement};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorpusError {
    /// The corpus file does not exist. Aborts the run.
    #[error("corpus not found: {}", .path.display())]
    NotFound { path: PathBuf },
    /// The corpus could not be read or decoded in full. Whatever precedes the
    /// failure is still usable.
    #[error("failed to read corpus {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },
}

impl CorpusError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// An ordered corpus of statements that can be traversed any number of times.
///
/// Each call to [`statements`](StatementSource::statements) starts a fresh
/// pass from id 0.
pub trait StatementSource {
    fn kind(&self) -> CorpusKind;

    fn statements(&self) -> Box<dyn Iterator<Item = Statement> + '_>;
}
