//! Wires corpora, profiler, write index, matcher and sink into one run.

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use log::{debug, info};

use crate::app::ports::StatementSource;
use crate::app::{BoundedWriteIndex, CorpusText, Matcher, RunReport, profiler};
use crate::domain::{CorpusKind, MatchLimits, ProfileSettings};
use crate::infra::adapters::{CsvMatchSink, load_corpus};

const PREVIEW_STATEMENTS: usize = 5;
const PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub select_file: PathBuf,
    pub write_file: PathBuf,
    pub output: PathBuf,
    pub limits: MatchLimits,
    pub profile: ProfileSettings,
    pub analysis_only: bool,
}

impl RunOptions {
    pub fn new(select_file: PathBuf, write_file: PathBuf, output: PathBuf) -> Self {
        Self {
            select_file,
            write_file,
            output,
            limits: MatchLimits::default(),
            profile: ProfileSettings::default(),
            analysis_only: false,
        }
    }
}

/// Profiles both corpora, then (unless analysis-only) indexes the writes and
/// streams every read through the matcher into the CSV output.
///
/// A missing corpus aborts the run. A partly unreadable corpus is used as far
/// as it could be read and noted in the report.
pub fn run(options: &RunOptions) -> Result<RunReport> {
    options.limits.validate()?;
    options.profile.validate()?;

    let mut report = RunReport::new(options.limits, options.analysis_only);
    let reads = load(&options.select_file, CorpusKind::Read, &mut report)?;
    let writes = load(&options.write_file, CorpusKind::Write, &mut report)?;
    log_preview(&reads);
    log_preview(&writes);

    report.profile = Some(profiler::profile(&reads, &writes, &options.profile));
    if options.analysis_only {
        info!("analysis only: matching skipped");
        return Ok(report);
    }

    let index = BoundedWriteIndex::build(&writes, options.limits.max_writes_per_table);
    report.index = Some(index.stats());

    let mut sink = CsvMatchSink::create(&options.output)
        .wrap_err("failed to open match output")?;
    let summary = Matcher::new(&index, options.limits)
        .run(&reads, &mut sink)
        .wrap_err_with(|| format!("failed writing matches to {}", options.output.display()))?;

    if summary.matches_emitted == 0 {
        info!(
            "no read/write pairs share a table; {} holds the header only",
            options.output.display()
        );
    } else {
        info!("wrote {} matches to {}", sink.rows_written(), options.output.display());
    }
    report.matching = Some(summary);
    Ok(report)
}

fn load(path: &Path, kind: CorpusKind, report: &mut RunReport) -> Result<CorpusText> {
    let loaded = load_corpus(path, kind).wrap_err_with(|| format!("cannot load {} corpus", kind))?;
    if let Some(warning) = loaded.warning {
        report.corpus_warnings.push(warning.to_string());
    }
    Ok(loaded.corpus)
}

fn log_preview<S: StatementSource + ?Sized>(source: &S) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    debug!("first {} {} statements:", PREVIEW_STATEMENTS, source.kind());
    for statement in source.statements().take(PREVIEW_STATEMENTS) {
        debug!("  {}: {}", statement.id, statement.preview(PREVIEW_CHARS));
    }
}
