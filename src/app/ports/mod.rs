pub mod match_sink;
pub mod statement_source;

pub use match_sink::{MatchSink, SinkError};
pub use statement_source::{CorpusError, StatementSource};
