//! Streams reads against a built [`BoundedWriteIndex`] and emits matches.
//!
//! For each read, tables are visited in sorted order and candidates in index
//! insertion order, so identical inputs and limits always yield the same
//! output sequence. Work is bounded by `reads × max_matches_per_select` and
//! by `max_total_matches`, whichever is reached first.

use std::collections::HashSet;

use log::{debug, info, warn};
use serde::Serialize;

use tablematch_domain::{MatchLimits, MatchRecord, Statement, StatementId};

use crate::ports::{MatchSink, SinkError, StatementSource};
use crate::table_extractor::extract_from_read;
use crate::write_index::BoundedWriteIndex;

/// Reads processed between progress logs and scratch-set trims.
pub const RECLAIM_INTERVAL: usize = 5_000;
const SCRATCH_RETAINED_CAPACITY: usize = 1_024;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Every read statement was considered.
    #[default]
    Exhausted,
    /// `max_total_matches` was reached.
    TotalCapReached,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub reads_seen: usize,
    /// Reads with no recognizable table.
    pub reads_skipped: usize,
    pub candidates_considered: usize,
    /// Candidates already paired with the same read through another table.
    pub duplicate_candidates: usize,
    /// Candidates whose write record was missing or incomplete.
    pub integrity_warnings: usize,
    /// Reads that stopped early at `max_matches_per_select`.
    pub select_caps_hit: usize,
    pub matches_emitted: usize,
    pub stop_reason: StopReason,
}

pub struct Matcher<'a> {
    index: &'a BoundedWriteIndex,
    limits: MatchLimits,
}

impl<'a> Matcher<'a> {
    pub fn new(index: &'a BoundedWriteIndex, limits: MatchLimits) -> Self {
        Self { index, limits }
    }

    pub fn run<S, K>(&self, reads: &S, sink: &mut K) -> Result<MatchSummary, SinkError>
    where
        S: StatementSource + ?Sized,
        K: MatchSink + ?Sized,
    {
        let mut summary = MatchSummary::default();
        let mut paired: HashSet<StatementId> = HashSet::new();

        for statement in reads.statements() {
            self.match_statement(&statement, &mut paired, &mut summary, sink)?;

            if summary.matches_emitted >= self.limits.max_total_matches {
                summary.stop_reason = StopReason::TotalCapReached;
                break;
            }

            if summary.reads_seen % RECLAIM_INTERVAL == 0 {
                paired.shrink_to(SCRATCH_RETAINED_CAPACITY);
                info!(
                    "matched {} reads, {} matches so far",
                    summary.reads_seen, summary.matches_emitted
                );
            }
        }

        sink.finish()?;

        if summary.stop_reason == StopReason::TotalCapReached {
            info!(
                "stopped after {} reads: total match cap of {} reached",
                summary.reads_seen, self.limits.max_total_matches
            );
        }
        info!(
            "matching finished: {} reads ({} skipped), {} matches, {} integrity warnings",
            summary.reads_seen,
            summary.reads_skipped,
            summary.matches_emitted,
            summary.integrity_warnings
        );
        Ok(summary)
    }

    fn match_statement<K>(
        &self,
        statement: &Statement,
        paired: &mut HashSet<StatementId>,
        summary: &mut MatchSummary,
        sink: &mut K,
    ) -> Result<(), SinkError>
    where
        K: MatchSink + ?Sized,
    {
        summary.reads_seen += 1;

        let select_tables = extract_from_read(&statement.text);
        if select_tables.is_empty() {
            summary.reads_skipped += 1;
            debug!("read {} has no recognizable table, skipped", statement.id);
            return Ok(());
        }

        paired.clear();
        let mut emitted = 0;

        for table in select_tables.iter() {
            for &write_id in self.index.candidates_for(table) {
                if !paired.insert(write_id) {
                    summary.duplicate_candidates += 1;
                    continue;
                }
                summary.candidates_considered += 1;

                let Some(record) = self
                    .index
                    .record_for(write_id)
                    .filter(|record| !record.is_incomplete())
                else {
                    summary.integrity_warnings += 1;
                    warn!(
                        "write {} is indexed under '{}' but its record is missing or empty",
                        write_id, table
                    );
                    continue;
                };

                let Some(matched) =
                    MatchRecord::pair(statement.id, &select_tables, write_id, &record.tables)
                else {
                    continue;
                };

                sink.accept(&matched)?;
                emitted += 1;
                summary.matches_emitted += 1;

                if summary.matches_emitted >= self.limits.max_total_matches {
                    return Ok(());
                }
                if emitted >= self.limits.max_matches_per_select {
                    summary.select_caps_hit += 1;
                    return Ok(());
                }
            }
        }

        Ok(())
    }
}
