use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{info, warn};

use tablematch_app::CorpusText;
use tablematch_app::corpus::STATEMENT_TERMINATOR;
use tablematch_app::ports::CorpusError;
use tablematch_domain::CorpusKind;

const UTF8_BOM: &str = "\u{feff}";

/// A corpus read from disk. `warning` is set when the file could only be
/// partly read; `corpus` then holds what came before the failure.
#[derive(Debug)]
pub struct LoadedCorpus {
    pub corpus: CorpusText,
    pub warning: Option<CorpusError>,
}

/// Reads a statement corpus into memory.
///
/// Only a missing file is an error. Any other read failure yields an empty
/// corpus with a warning, and invalid UTF-8 truncates the corpus at the last
/// complete statement before the first bad byte.
pub fn load_corpus(path: &Path, kind: CorpusKind) -> Result<LoadedCorpus, CorpusError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(CorpusError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            let warning = CorpusError::Read {
                path: path.to_path_buf(),
                message: e.to_string(),
            };
            warn!("{}; treating {} corpus as empty", warning, kind);
            return Ok(LoadedCorpus {
                corpus: CorpusText::empty(kind),
                warning: Some(warning),
            });
        }
    };

    let (text, warning) = match String::from_utf8(bytes) {
        Ok(text) => (text, None),
        Err(e) => {
            let valid_up_to = e.utf8_error().valid_up_to();
            let bytes = e.into_bytes();
            let semicolon_delimited = bytes.iter().any(|&b| char::from(b) == STATEMENT_TERMINATOR);
            let prefix = String::from_utf8_lossy(&bytes[..valid_up_to]);
            let text = truncate_to_complete_statements(&prefix, semicolon_delimited).to_string();
            let warning = CorpusError::Read {
                path: path.to_path_buf(),
                message: format!("invalid UTF-8 at byte {}", valid_up_to),
            };
            warn!("{}; {} corpus truncated", warning, kind);
            (text, Some(warning))
        }
    };

    let text = match text.strip_prefix(UTF8_BOM) {
        Some(rest) => rest.to_string(),
        None => text,
    };

    info!("loaded {} corpus from {} ({} bytes)", kind, path.display(), text.len());

    Ok(LoadedCorpus {
        corpus: CorpusText::new(kind, text),
        warning,
    })
}

/// Drops the trailing fragment that a decoding failure may have cut short.
/// The cut follows the delimiter of the whole file, so a `;` corpus is never
/// cut at a line break inside a statement.
fn truncate_to_complete_statements(prefix: &str, semicolon_delimited: bool) -> &str {
    let boundary = if semicolon_delimited {
        prefix.rfind(STATEMENT_TERMINATOR)
    } else {
        prefix.rfind('\n')
    };
    &prefix[..boundary.map_or(0, |pos| pos + 1)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablematch_app::ports::StatementSource;

    fn write_file(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    fn texts(loaded: &LoadedCorpus) -> Vec<String> {
        loaded.corpus.statements().map(|s| s.text).collect()
    }

    #[test]
    fn missing_file_returns_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.sql");

        let err = load_corpus(&path, CorpusKind::Read).unwrap_err();

        assert_eq!(err, CorpusError::NotFound { path });
        assert!(err.is_fatal());
    }

    #[test]
    fn valid_file_loads_all_statements() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "reads.sql", b"SELECT * FROM a;\nSELECT * FROM b;\n");

        let loaded = load_corpus(&path, CorpusKind::Read).unwrap();

        assert!(loaded.warning.is_none());
        assert_eq!(texts(&loaded), vec!["SELECT * FROM a", "SELECT * FROM b"]);
    }

    #[test]
    fn leading_bom_is_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bom.sql", "\u{feff}SELECT * FROM a".as_bytes());

        let loaded = load_corpus(&path, CorpusKind::Read).unwrap();

        assert_eq!(texts(&loaded), vec!["SELECT * FROM a"]);
    }

    #[test]
    fn invalid_utf8_truncates_at_last_complete_statement() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes = b"DELETE FROM a;\nDELETE FROM b;\nDELETE FROM c".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        bytes.extend_from_slice(b";\nDELETE FROM d;");
        let path = write_file(&dir, "writes.sql", &bytes);

        let loaded = load_corpus(&path, CorpusKind::Write).unwrap();

        assert!(matches!(loaded.warning, Some(CorpusError::Read { .. })));
        assert_eq!(texts(&loaded), vec!["DELETE FROM a", "DELETE FROM b"]);
    }

    #[test]
    fn invalid_utf8_in_first_line_yields_empty_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bad.sql", &[b'S', 0xff, b'\n']);

        let loaded = load_corpus(&path, CorpusKind::Read).unwrap();

        assert!(loaded.warning.is_some());
        assert!(texts(&loaded).is_empty());
    }

    #[test]
    fn invalid_utf8_inside_multiline_statement_drops_whole_statement() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "reads.sql", b"SELECT *\nFROM t\xff;\nSELECT * FROM u;");

        let loaded = load_corpus(&path, CorpusKind::Read).unwrap();

        assert!(loaded.warning.is_some());
        assert!(texts(&loaded).is_empty());
    }

    #[test]
    fn invalid_utf8_in_line_corpus_keeps_complete_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "reads.sql", b"SELECT * FROM a\nSELECT * FROM b\xff\n");

        let loaded = load_corpus(&path, CorpusKind::Read).unwrap();

        assert!(loaded.warning.is_some());
        assert_eq!(texts(&loaded), vec!["SELECT * FROM a"]);
    }

    #[test]
    fn directory_path_returns_empty_corpus_with_warning() {
        let dir = tempfile::tempdir().unwrap();

        let loaded = load_corpus(dir.path(), CorpusKind::Read).unwrap();

        assert!(matches!(loaded.warning, Some(CorpusError::Read { .. })));
        assert!(texts(&loaded).is_empty());
    }
}
