pub mod limits;
pub mod match_record;
pub mod statement;
pub mod table_set;
pub mod write_record;

pub use limits::{LimitsError, MatchLimits, ProfileSettings};
pub use match_record::MatchRecord;
pub use statement::{CorpusKind, Statement, StatementId};
pub use table_set::{TableSet, normalize_table_name};
pub use write_record::WriteRecord;
