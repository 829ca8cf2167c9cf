use std::fs::File;
use std::io::Write;
use std::path::Path;

use tablematch_app::ports::{MatchSink, SinkError};
use tablematch_domain::MatchRecord;

pub const MATCH_HEADER: [&str; 5] = [
    "select_id",
    "select_tables",
    "write_id",
    "write_tables",
    "common_tables",
];

/// Writes one CSV row per match as it arrives. Fields are quoted whenever
/// they need to be; table sets are `;`-joined sorted names.
pub struct CsvMatchSink<W: Write> {
    writer: csv::Writer<W>,
    rows_written: usize,
}

impl CsvMatchSink<File> {
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        let file = File::create(path)
            .map_err(|e| SinkError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_writer(file)
    }
}

impl<W: Write> CsvMatchSink<W> {
    /// Wraps `inner` and writes the header row immediately.
    pub fn from_writer(inner: W) -> Result<Self, SinkError> {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(inner);
        writer.write_record(MATCH_HEADER).map_err(csv_error)?;
        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer
            .into_inner()
            .map_err(|e| SinkError::Io(e.error().to_string()))
    }
}

fn csv_error(e: csv::Error) -> SinkError {
    SinkError::Csv(e.to_string())
}

impl<W: Write> MatchSink for CsvMatchSink<W> {
    fn accept(&mut self, record: &MatchRecord) -> Result<(), SinkError> {
        self.writer
            .write_record([
                record.select_id.to_string(),
                record.select_tables.to_field(),
                record.write_id.to_string(),
                record.write_tables.to_field(),
                record.common_tables.to_field(),
            ])
            .map_err(csv_error)?;
        self.rows_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.writer.flush().map_err(|e| SinkError::Io(e.to_string()))
    }
}
