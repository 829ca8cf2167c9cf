//! Capacity-bounded table → write lookup.
//!
//! Each table keeps at most `capacity` write ids, first come first served.
//! Writes arriving after a table is full are still recorded, but if every
//! table they touch is full they are reachable from no lookup. Check
//! [`IndexStats::saturated_tables`] and [`IndexStats::unreachable_writes`] to
//! see how much a run lost to the cap.

use std::collections::{BTreeMap, HashMap};

use log::{debug, info, warn};
use serde::Serialize;

use tablematch_domain::{StatementId, TableSet, WriteRecord};

use crate::ports::StatementSource;
use crate::table_extractor::extract_from_write;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub capacity: usize,
    /// Every write offered to the index.
    pub total_writes: usize,
    /// Writes present in at least one candidate list.
    pub indexed_writes: usize,
    /// Writes with no recognizable table. They are recorded but never indexed.
    pub skipped_writes: usize,
    /// Recorded writes that every touched table was already full for.
    pub unreachable_writes: usize,
    pub unique_tables: usize,
    pub per_table_counts: BTreeMap<String, usize>,
    pub saturated_tables: Vec<String>,
}

#[derive(Debug)]
pub struct BoundedWriteIndex {
    capacity: usize,
    candidates: HashMap<String, Vec<StatementId>>,
    records: HashMap<StatementId, WriteRecord>,
    total_writes: usize,
    indexed_writes: usize,
    skipped_writes: usize,
}

impl BoundedWriteIndex {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            candidates: HashMap::new(),
            records: HashMap::new(),
            total_writes: 0,
            indexed_writes: 0,
            skipped_writes: 0,
        }
    }

    /// Single forward pass over a write corpus.
    pub fn build<S>(source: &S, capacity: usize) -> Self
    where
        S: StatementSource + ?Sized,
    {
        let mut index = Self::new(capacity);
        for statement in source.statements() {
            let tables = extract_from_write(&statement.text);
            if tables.is_empty() {
                debug!("write {} has no recognizable table, skipped", statement.id);
            }
            index.add_write(statement.id, statement.text, tables);
        }

        let stats = index.stats();
        info!(
            "write index built: {} writes, {} indexed, {} skipped, {} tables",
            stats.total_writes, stats.indexed_writes, stats.skipped_writes, stats.unique_tables
        );
        if !stats.saturated_tables.is_empty() {
            warn!(
                "{} table(s) reached the cap of {} writes, {} write(s) unreachable: {}",
                stats.saturated_tables.len(),
                capacity,
                stats.unreachable_writes,
                stats.saturated_tables.join(", ")
            );
        }
        index
    }

    /// Records the write unconditionally, then returns true when it landed in
    /// at least one candidate list.
    pub fn add_write(
        &mut self,
        id: StatementId,
        text: impl Into<String>,
        tables: TableSet,
    ) -> bool {
        self.total_writes += 1;
        if tables.is_empty() {
            self.skipped_writes += 1;
            self.records.insert(id, WriteRecord::new(id, text, tables));
            return false;
        }

        let mut accepted = false;
        for table in &tables {
            let list = self.candidates.entry(table.clone()).or_default();
            if list.len() < self.capacity {
                list.push(id);
                accepted = true;
            }
        }
        if accepted {
            self.indexed_writes += 1;
        }

        self.records.insert(id, WriteRecord::new(id, text, tables));
        accepted
    }

    /// Write ids for `table` in insertion order, at most `capacity` long.
    pub fn candidates_for(&self, table: &str) -> &[StatementId] {
        self.candidates.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn record_for(&self, id: StatementId) -> Option<&WriteRecord> {
        self.records.get(&id)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> IndexStats {
        let per_table_counts: BTreeMap<String, usize> = self
            .candidates
            .iter()
            .map(|(table, ids)| (table.clone(), ids.len()))
            .collect();
        let saturated_tables = per_table_counts
            .iter()
            .filter(|&(_, &count)| count >= self.capacity)
            .map(|(table, _)| table.clone())
            .collect();

        IndexStats {
            capacity: self.capacity,
            total_writes: self.total_writes,
            indexed_writes: self.indexed_writes,
            skipped_writes: self.skipped_writes,
            unreachable_writes: self
                .records
                .len()
                .saturating_sub(self.indexed_writes + self.skipped_writes),
            unique_tables: per_table_counts.len(),
            per_table_counts,
            saturated_tables,
        }
    }
}
