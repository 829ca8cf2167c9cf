use super::statement::StatementId;
use super::table_set::TableSet;

/// One read/write pairing that shares at least one table.
///
/// Emitted to a sink and dropped; never collected in bulk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub select_id: StatementId,
    pub write_id: StatementId,
    pub select_tables: TableSet,
    pub write_tables: TableSet,
    pub common_tables: TableSet,
}

impl MatchRecord {
    /// Pairs a read with a write, or `None` when they share no table.
    pub fn pair(
        select_id: StatementId,
        select_tables: &TableSet,
        write_id: StatementId,
        write_tables: &TableSet,
    ) -> Option<Self> {
        let common_tables = select_tables.intersection(write_tables);
        if common_tables.is_empty() {
            return None;
        }
        Some(Self {
            select_id,
            write_id,
            select_tables: select_tables.clone(),
            write_tables: write_tables.clone(),
            common_tables,
        })
    }
}
