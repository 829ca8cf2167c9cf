use serde::Serialize;

use tablematch_domain::MatchLimits;

use crate::matcher::MatchSummary;
use crate::profiler::ProfileReport;
use crate::write_index::IndexStats;

/// Everything a run learned, for operators. Sections a run skipped stay
/// `None` (e.g. `index` and `matching` in analysis-only mode).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub limits: MatchLimits,
    pub analysis_only: bool,
    /// Corpus read failures that truncated a corpus without aborting.
    pub corpus_warnings: Vec<String>,
    pub profile: Option<ProfileReport>,
    pub index: Option<IndexStats>,
    pub matching: Option<MatchSummary>,
}

impl RunReport {
    pub fn new(limits: MatchLimits, analysis_only: bool) -> Self {
        Self {
            limits,
            analysis_only,
            corpus_warnings: Vec::new(),
            profile: None,
            index: None,
            matching: None,
        }
    }
}
