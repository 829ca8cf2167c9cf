pub mod csv_sink;
pub mod file_corpus;
pub mod report_writer;

pub use csv_sink::{CsvMatchSink, MATCH_HEADER};
pub use file_corpus::{LoadedCorpus, load_corpus};
pub use report_writer::{ReportError, write_report};
