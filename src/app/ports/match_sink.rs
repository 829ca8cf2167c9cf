use thiserror::Error;

use tablematch_domain::MatchRecord;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(String),
    #[error("CSV error: {0}")]
    Csv(String),
}

/// Receives match records one at a time as the matcher produces them.
#[cfg_attr(test, mockall::automock)]
pub trait MatchSink {
    fn accept(&mut self, record: &MatchRecord) -> Result<(), SinkError>;

    /// Flushes anything still buffered. Called once after the last record.
    fn finish(&mut self) -> Result<(), SinkError>;
}

/// Collects records in memory. Only sensible for small inputs and tests.
impl MatchSink for Vec<MatchRecord> {
    fn accept(&mut self, record: &MatchRecord) -> Result<(), SinkError> {
        self.push(record.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}
