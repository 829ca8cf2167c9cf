use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use log::info;

use tablematch::error;
use tablematch::infra::adapters::write_report;
use tablematch::infra::config::RunConfigFile;
use tablematch::pipeline::{self, RunOptions};

/// Pair read and write SQL statements that touch the same tables.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File containing SELECT statements
    #[arg(long, env = "TABLEMATCH_SELECT_FILE")]
    select_file: PathBuf,

    /// File containing INSERT/UPDATE/DELETE statements
    #[arg(long, env = "TABLEMATCH_WRITE_FILE")]
    write_file: PathBuf,

    /// Match output (CSV)
    #[arg(long, short, default_value = "matches.csv")]
    output: PathBuf,

    #[arg(long)]
    max_writes_per_table: Option<usize>,

    #[arg(long)]
    max_matches_per_select: Option<usize>,

    #[arg(long)]
    max_total_matches: Option<usize>,

    /// Only profile the corpora; do not match
    #[arg(long, overrides_with = "no_analysis_only")]
    analysis_only: bool,

    /// Match even if the config file sets `analysis_only`
    #[arg(long, overrides_with = "analysis_only")]
    no_analysis_only: bool,

    /// Statements sampled per corpus by the profiler
    #[arg(long)]
    sample_size: Option<usize>,

    /// Estimated match count above which the profiler warns
    #[arg(long)]
    explosion_threshold: Option<u64>,

    /// Write a JSON run report here
    #[arg(long)]
    report: Option<PathBuf>,

    /// Config file (default: ./tablematch.toml, then the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter such as `debug` or `tablematch_app=trace` (default: RUST_LOG, else info)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn into_options(self, config: Option<&RunConfigFile>) -> RunOptions {
        let mut options = RunOptions::new(self.select_file, self.write_file, self.output);
        if let Some(config) = config {
            config.apply_to(&mut options.limits, &mut options.profile);
            options.analysis_only = config.analysis_only.unwrap_or(false);
        }

        if let Some(v) = self.max_writes_per_table {
            options.limits.max_writes_per_table = v;
        }
        if let Some(v) = self.max_matches_per_select {
            options.limits.max_matches_per_select = v;
        }
        if let Some(v) = self.max_total_matches {
            options.limits.max_total_matches = v;
        }
        if let Some(v) = self.sample_size {
            options.profile.sample_size = v;
        }
        if let Some(v) = self.explosion_threshold {
            options.profile.explosion_threshold = v;
        }
        if self.analysis_only {
            options.analysis_only = true;
        } else if self.no_analysis_only {
            options.analysis_only = false;
        }
        options
    }
}

fn init_logging(filters: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(filters) = filters {
        builder.parse_filters(filters);
    }
    builder.init();
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    error::install_hooks()?;

    let mut args = Args::parse();
    init_logging(args.log_level.as_deref());

    let config = RunConfigFile::discover(args.config.as_deref())?;
    if let Some((path, _)) = &config {
        info!("using config {}", path.display());
    }

    let report_path = args.report.take();
    let options = args.into_options(config.as_ref().map(|(_, c)| c));
    info!(
        "reads: {}, writes: {}, limits: {:?}",
        options.select_file.display(),
        options.write_file.display(),
        options.limits
    );

    let report = pipeline::run(&options)?;

    if let Some(path) = report_path {
        write_report(&report, &path)
            .wrap_err_with(|| format!("failed to write report {}", path.display()))?;
        info!("report written to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(flags: &[&str]) -> Args {
        let base = ["tablematch", "--select-file", "r.sql", "--write-file", "w.sql"];
        Args::try_parse_from(base.iter().chain(flags).copied()).unwrap()
    }

    fn config_with_analysis_only(value: bool) -> RunConfigFile {
        RunConfigFile {
            analysis_only: Some(value),
            ..RunConfigFile::default()
        }
    }

    #[rstest]
    #[case(&[], None, false)]
    #[case(&[], Some(true), true)]
    #[case(&["--analysis-only"], Some(false), true)]
    #[case(&["--no-analysis-only"], Some(true), false)]
    #[case(&["--analysis-only", "--no-analysis-only"], None, false)]
    #[case(&["--no-analysis-only", "--analysis-only"], None, true)]
    fn analysis_only_flag_overrides_config(
        #[case] flags: &[&str],
        #[case] config: Option<bool>,
        #[case] expected: bool,
    ) {
        let config = config.map(config_with_analysis_only);

        let options = parse(flags).into_options(config.as_ref());

        assert_eq!(options.analysis_only, expected);
    }

    #[test]
    fn cli_limit_overrides_config_limit() {
        let mut config = RunConfigFile::default();
        config.limits.max_total_matches = Some(9);

        let options = parse(&["--max-total-matches", "3"]).into_options(Some(&config));

        assert_eq!(options.limits.max_total_matches, 3);
    }
}
