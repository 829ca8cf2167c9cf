//! Pre-run diagnostics: corpus sizes, sampled table frequencies, and a rough
//! estimate of how large the match output could grow.
//!
//! The estimate extrapolates from a fixed-size sample and is advisory only. It
//! never touches the write index.

use std::collections::BTreeMap;

use log::{info, warn};
use serde::Serialize;

use tablematch_domain::{CorpusKind, ProfileSettings, TableSet};

use crate::ports::StatementSource;
use crate::table_extractor::{extract_from_read, extract_from_write};

const TOP_SHARED_TABLES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusProfile {
    pub kind: CorpusKind,
    pub total_statements: usize,
    pub sampled_statements: usize,
    /// Sampled statements with no recognizable table.
    pub sampled_without_tables: usize,
    pub table_frequency: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileReport {
    pub reads: CorpusProfile,
    pub writes: CorpusProfile,
    pub shared_tables: Vec<String>,
    pub avg_reads_per_shared_table: f64,
    pub avg_writes_per_shared_table: f64,
    pub explosion_estimate: f64,
    pub explosion_threshold: u64,
}

impl ProfileReport {
    pub fn exceeds_threshold(&self) -> bool {
        self.explosion_estimate > self.explosion_threshold as f64
    }
}

fn extract_for(kind: CorpusKind, text: &str) -> TableSet {
    match kind {
        CorpusKind::Read => extract_from_read(text),
        CorpusKind::Write => extract_from_write(text),
    }
}

/// Counts the whole corpus, then tallies tables over its first
/// `sample_size` statements.
pub fn profile_corpus<S>(source: &S, sample_size: usize) -> CorpusProfile
where
    S: StatementSource + ?Sized,
{
    let kind = source.kind();
    let total_statements = source.statements().count();

    let mut table_frequency = BTreeMap::new();
    let mut sampled_statements = 0;
    let mut sampled_without_tables = 0;
    for statement in source.statements().take(sample_size) {
        sampled_statements += 1;
        let tables = extract_for(kind, &statement.text);
        if tables.is_empty() {
            sampled_without_tables += 1;
        }
        for table in &tables {
            *table_frequency.entry(table.clone()).or_insert(0) += 1;
        }
    }

    CorpusProfile {
        kind,
        total_statements,
        sampled_statements,
        sampled_without_tables,
        table_frequency,
    }
}

pub fn profile<R, W>(reads: &R, writes: &W, settings: &ProfileSettings) -> ProfileReport
where
    R: StatementSource + ?Sized,
    W: StatementSource + ?Sized,
{
    let reads = profile_corpus(reads, settings.sample_size);
    let writes = profile_corpus(writes, settings.sample_size);
    let report = estimate(reads, writes, settings.explosion_threshold);
    log_report(&report);
    report
}

fn estimate(reads: CorpusProfile, writes: CorpusProfile, threshold: u64) -> ProfileReport {
    let shared_tables: Vec<String> = reads
        .table_frequency
        .keys()
        .filter(|table| writes.table_frequency.contains_key(*table))
        .cloned()
        .collect();

    let (avg_reads, avg_writes) = if shared_tables.is_empty() {
        (0.0, 0.0)
    } else {
        let count = shared_tables.len() as f64;
        let sum = |freq: &BTreeMap<String, usize>| -> f64 {
            shared_tables.iter().map(|t| freq[t] as f64).sum()
        };
        (
            sum(&reads.table_frequency) / count,
            sum(&writes.table_frequency) / count,
        )
    };

    ProfileReport {
        explosion_estimate: avg_reads * avg_writes * shared_tables.len() as f64,
        avg_reads_per_shared_table: avg_reads,
        avg_writes_per_shared_table: avg_writes,
        shared_tables,
        explosion_threshold: threshold,
        reads,
        writes,
    }
}

fn log_report(report: &ProfileReport) {
    for corpus in [&report.reads, &report.writes] {
        info!(
            "{} corpus: {} statements, {} sampled, {} distinct tables in sample",
            corpus.kind,
            corpus.total_statements,
            corpus.sampled_statements,
            corpus.table_frequency.len()
        );
    }

    let mut hottest: Vec<(&String, usize)> = report
        .shared_tables
        .iter()
        .map(|t| (t, report.reads.table_frequency[t] * report.writes.table_frequency[t]))
        .collect();
    hottest.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    let hottest: Vec<String> = hottest
        .iter()
        .take(TOP_SHARED_TABLES)
        .map(|(t, pairs)| format!("{} ({})", t, pairs))
        .collect();

    info!(
        "{} shared tables, estimated matches ~{:.0}{}",
        report.shared_tables.len(),
        report.explosion_estimate,
        if hottest.is_empty() {
            String::new()
        } else {
            format!("; hottest: {}", hottest.join(", "))
        }
    );

    if report.exceeds_threshold() {
        warn!(
            "estimated match volume {:.0} exceeds {}; consider lowering \
             max_writes_per_table, max_matches_per_select or max_total_matches",
            report.explosion_estimate, report.explosion_threshold
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusText;

    fn corpus(kind: CorpusKind, text: &str) -> CorpusText {
        CorpusText::new(kind, text)
    }

    mod profile_corpus {
        use super::*;

        #[test]
        fn counts_all_but_samples_prefix() {
            let reads = corpus(
                CorpusKind::Read,
                "SELECT * FROM a;SELECT * FROM a JOIN b ON true;SELECT 1;SELECT * FROM c;",
            );

            let profile = profile_corpus(&reads, 3);

            assert_eq!(profile.total_statements, 4);
            assert_eq!(profile.sampled_statements, 3);
            assert_eq!(profile.sampled_without_tables, 1);
            assert_eq!(profile.table_frequency.get("a"), Some(&2));
            assert_eq!(profile.table_frequency.get("b"), Some(&1));
            assert_eq!(profile.table_frequency.get("c"), None);
        }

        #[test]
        fn write_corpus_uses_write_extraction() {
            let writes = corpus(CorpusKind::Write, "INSERT INTO a VALUES (1);UPDATE b SET x = 1;");

            let profile = profile_corpus(&writes, 10);

            assert_eq!(profile.kind, CorpusKind::Write);
            assert_eq!(profile.table_frequency.len(), 2);
        }
    }

    #[test]
    fn estimate_multiplies_shared_averages() {
        let reads = corpus(
            CorpusKind::Read,
            "SELECT * FROM a;SELECT * FROM a;SELECT * FROM b;SELECT * FROM b;SELECT * FROM r;",
        );
        let writes = corpus(
            CorpusKind::Write,
            "DELETE FROM a;DELETE FROM a;DELETE FROM a;DELETE FROM b;DELETE FROM only_write;",
        );

        let report = profile(&reads, &writes, &ProfileSettings::default());

        assert_eq!(report.shared_tables, vec!["a".to_string(), "b".to_string()]);
        assert!((report.avg_reads_per_shared_table - 2.0).abs() < f64::EPSILON);
        assert!((report.avg_writes_per_shared_table - 2.0).abs() < f64::EPSILON);
        assert!((report.explosion_estimate - 8.0).abs() < f64::EPSILON);
        assert!(!report.exceeds_threshold());
    }

    #[test]
    fn disjoint_corpora_estimate_zero() {
        let reads = corpus(CorpusKind::Read, "SELECT * FROM a;");
        let writes = corpus(CorpusKind::Write, "DELETE FROM b;");

        let report = profile(&reads, &writes, &ProfileSettings::default());

        assert!(report.shared_tables.is_empty());
        assert!(report.explosion_estimate.abs() < f64::EPSILON);
    }

    #[test]
    fn estimate_above_threshold_is_flagged() {
        let reads = corpus(CorpusKind::Read, "SELECT * FROM t;SELECT * FROM t;");
        let writes = corpus(CorpusKind::Write, "DELETE FROM t;DELETE FROM t;");
        let settings = ProfileSettings {
            sample_size: 10,
            explosion_threshold: 3,
        };

        let report = profile(&reads, &writes, &settings);

        assert!((report.explosion_estimate - 4.0).abs() < f64::EPSILON);
        assert!(report.exceeds_threshold());
    }
}
