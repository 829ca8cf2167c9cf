use super::statement::StatementId;
use super::table_set::TableSet;

/// A write statement together with the tables it touches.
///
/// Owned by the write index once ingested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    pub id: StatementId,
    pub text: String,
    pub tables: TableSet,
}

impl WriteRecord {
    pub fn new(id: StatementId, text: impl Into<String>, tables: TableSet) -> Self {
        Self {
            id,
            text: text.into(),
            tables,
        }
    }

    /// A record that cannot take part in matching.
    pub fn is_incomplete(&self) -> bool {
        self.text.trim().is_empty() || self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_with_text_and_tables_is_complete() {
        let record = WriteRecord::new(0, "DELETE FROM t", TableSet::from_names(["t"]));

        assert!(!record.is_incomplete());
    }

    #[test]
    fn record_without_tables_is_incomplete() {
        let record = WriteRecord::new(0, "DELETE FROM t", TableSet::new());

        assert!(record.is_incomplete());
    }

    #[test]
    fn record_with_blank_text_is_incomplete() {
        let record = WriteRecord::new(0, "  ", TableSet::from_names(["t"]));

        assert!(record.is_incomplete());
    }
}
