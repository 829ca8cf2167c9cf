use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use tablematch_app::RunReport;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report {path}: {message}")]
    Io { path: String, message: String },
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes the run report as pretty-printed JSON.
pub fn write_report(report: &RunReport, path: &Path) -> Result<(), ReportError> {
    let io_error = |e: std::io::Error| ReportError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer).map_err(io_error)?;
    writer.flush().map_err(io_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablematch_app::MatchSummary;
    use tablematch_domain::MatchLimits;

    #[test]
    fn report_round_trips_key_fields_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let mut report = RunReport::new(MatchLimits::default(), false);
        report.matching = Some(MatchSummary {
            matches_emitted: 12,
            ..MatchSummary::default()
        });

        write_report(&report, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["limits"]["max_total_matches"], 50_000);
        assert_eq!(value["matching"]["matches_emitted"], 12);
        assert_eq!(value["matching"]["stop_reason"], "exhausted");
        assert!(value["profile"].is_null());
    }

    #[test]
    fn unwritable_path_returns_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.json");

        let err = write_report(&RunReport::new(MatchLimits::default(), true), &path).unwrap_err();

        assert!(matches!(err, ReportError::Io { .. }));
    }
}
