pub mod corpus;
pub mod matcher;
pub mod ports;
pub mod profiler;
pub mod report;
pub mod sql_scanner;
pub mod table_extractor;
pub mod write_index;

pub use corpus::CorpusText;
pub use matcher::{MatchSummary, Matcher, StopReason};
pub use profiler::{CorpusProfile, ProfileReport};
pub use report::RunReport;
pub use table_extractor::{extract_from_read, extract_from_write};
pub use write_index::{BoundedWriteIndex, IndexStats};
