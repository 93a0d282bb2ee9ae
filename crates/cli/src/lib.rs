//! CLI for benchdelta.
//!
//! This crate provides the `benchdelta` command: `compare` pairs a baseline
//! and a treatment directory of JMH results and writes the reports, and
//! `summary` re-reads a JSON report.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod output;
pub mod settings;

use anyhow::{bail, Context};
use benchdelta_compare::io::{self, DirectorySource, OutputFormat};
use benchdelta_compare::{
    compare_sources, sort_comparisons, CompareConfig, ComparisonFilter, ComparisonReport, SortKey,
};
use benchdelta_core::{Diagnostics, Mode, Status};
use clap::{Args, Parser, Subcommand, ValueEnum};
use settings::{validate_threshold, Settings};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// benchdelta CLI.
#[derive(Parser, Debug)]
#[command(name = "benchdelta")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (defaults to ./benchdelta.toml when present).
    #[arg(short, long, global = true, env = "BENCHDELTA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level or filter directive, e.g. `debug` or `benchdelta_compare=trace`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare baseline and treatment results and write the reports.
    ///
    /// Reads every `*.json` file in `<BASEPATH>/baseline` and
    /// `<BASEPATH>/treatment` and writes:
    /// - benchmark_comparison.json - the full report
    /// - benchmark_comparison.md - a Markdown summary
    Compare {
        /// Directory holding the `baseline` and `treatment` result folders.
        #[arg(default_value = ".")]
        basepath: PathBuf,

        /// Baseline directory override.
        #[arg(long)]
        baseline: Option<PathBuf>,

        /// Treatment directory override.
        #[arg(long)]
        treatment: Option<PathBuf>,

        /// Percent band within which a change counts as unchanged.
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Output directory (defaults to BASEPATH).
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Output format: json, markdown, or both.
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Filters for the additional filtered summary.
        #[command(flatten)]
        filter: FilterArgs,

        /// Column ordering the per-benchmark listing.
        #[arg(long, value_enum, default_value_t = SortColumn::Benchmark)]
        sort: SortColumn,

        /// Reverse the listing order.
        #[arg(long)]
        descending: bool,

        /// List every comparison.
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the summary of a previously written JSON report.
    Summary {
        /// Path to benchmark_comparison.json.
        report: PathBuf,

        /// Filters for the additional filtered summary.
        #[command(flatten)]
        filter: FilterArgs,
    },
}

/// Filter flags shared by the subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Keep benchmarks whose name contains this text (case-insensitive).
    #[arg(long)]
    pub name: Option<String>,

    /// Keep benchmarks with this status (improved, regressed, unchanged).
    #[arg(long)]
    pub status: Option<Status>,

    /// Keep benchmarks in this mode (thrpt, avgt, sample, ss).
    #[arg(long)]
    pub mode: Option<Mode>,

    /// Keep only benchmarks with variance information on both sides.
    #[arg(long)]
    pub reliable_only: bool,
}

impl FilterArgs {
    /// Build the engine filter from the flags.
    pub fn to_filter(&self) -> ComparisonFilter {
        let mut filter = ComparisonFilter::new();
        if let Some(name) = &self.name {
            filter = filter.name_contains(name.clone());
        }
        if let Some(status) = self.status {
            filter = filter.status(status);
        }
        if let Some(mode) = self.mode {
            filter = filter.mode(mode);
        }
        if self.reliable_only {
            filter = filter.reliable(true);
        }
        filter
    }
}

/// Sort columns accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    /// Benchmark name.
    Benchmark,
    /// Mode.
    Mode,
    /// Baseline score.
    Baseline,
    /// Treatment score.
    Treatment,
    /// Score unit.
    Unit,
    /// Speedup.
    Speedup,
    /// Improvement percent.
    Improvement,
}

impl From<SortColumn> for SortKey {
    fn from(column: SortColumn) -> Self {
        match column {
            SortColumn::Benchmark => SortKey::Benchmark,
            SortColumn::Mode => SortKey::Mode,
            SortColumn::Baseline => SortKey::BaselineScore,
            SortColumn::Treatment => SortKey::TreatmentScore,
            SortColumn::Unit => SortKey::Unit,
            SortColumn::Speedup => SortKey::Speedup,
            SortColumn::Improvement => SortKey::Improvement,
        }
    }
}

/// Filter directive for a bare level; full directives pass through.
pub fn log_directive(level: &str) -> String {
    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("warn,benchdelta={level}")
    }
}

/// Install the global tracing subscriber writing to stderr.
///
/// `RUST_LOG` wins over `level` when set.
pub fn init_tracing(level: &str, json: bool) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_directive(level))
            .with_context(|| format!("invalid log level `{level}`"))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

/// Run the CLI with the process arguments.
///
/// # Returns
///
/// Returns `Ok(())` on success, or an error if the command fails.
pub fn run() -> anyhow::Result<()> {
    load_dotenv();
    run_with(Cli::parse())
}

/// Load `.env` into the process environment, before arguments are parsed so
/// that clap's `env` fallbacks see it too.
pub fn load_dotenv() {
    // A missing .env is normal.
    let _ = dotenvy::dotenv();
}

/// Run an already-parsed command line.
pub fn run_with(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    let level = cli.log_level.clone().unwrap_or_else(|| settings.log_level.clone());
    init_tracing(&level, cli.log_json)?;
    debug!(?settings, "Loaded settings");

    execute(cli.command, &settings)
}

/// Execute one subcommand with already-loaded settings.
///
/// Does not touch logging, so it can be called repeatedly.
pub fn execute(command: Commands, settings: &Settings) -> anyhow::Result<()> {
    match command {
        Commands::Compare {
            basepath,
            baseline,
            treatment,
            threshold,
            output_dir,
            format,
            filter,
            sort,
            descending,
            verbose,
        } => {
            let threshold = validate_threshold(threshold.unwrap_or(settings.threshold_percent))?;
            let baseline_dir = baseline.unwrap_or_else(|| basepath.join(io::BASELINE_DIR));
            let treatment_dir = treatment.unwrap_or_else(|| basepath.join(io::TREATMENT_DIR));
            let output_dir = output_dir
                .or_else(|| settings.output_dir.clone())
                .unwrap_or_else(|| basepath.clone());
            let format = format.unwrap_or(settings.format);

            info!(
                baseline = %baseline_dir.display(),
                treatment = %treatment_dir.display(),
                threshold_percent = threshold,
                "Comparing benchmark results"
            );

            let config = CompareConfig::with_threshold(threshold);
            let mut diagnostics = Diagnostics::new();
            let result = compare_sources(
                &DirectorySource::new(&baseline_dir),
                &DirectorySource::new(&treatment_dir),
                &config,
                &mut diagnostics,
            );
            output::print_diagnostics(&diagnostics);
            let set = result?;

            let mut report = ComparisonReport::new(set, diagnostics, threshold);
            sort_comparisons(&mut report.comparisons, sort.into(), descending);

            output::print_summary("Summary", &report.summary);
            if verbose {
                output::print_comparisons(&report.comparisons);
            }
            print_filtered(&report, &filter);

            let written = io::write_all_outputs(&report, &output_dir, format)?;
            for path in &written {
                println!("Wrote {}", path.display());
            }
            Ok(())
        }
        Commands::Summary { report, filter } => {
            if !report.is_file() {
                bail!("report not found: {}", report.display());
            }
            let report = io::read_report_json(&report)
                .with_context(|| format!("failed to read report {}", report.display()))?;

            println!(
                "Report generated {} (threshold +/-{:.2}%)",
                report.generated_at.to_rfc3339(),
                report.threshold_percent
            );
            output::print_summary("Summary", &report.summary);
            print_filtered(&report, &filter);
            Ok(())
        }
    }
}

fn print_filtered(report: &ComparisonReport, args: &FilterArgs) {
    let filter = args.to_filter();
    if filter.is_empty() {
        return;
    }
    println!();
    output::print_summary("Filtered summary", &report.filtered_summary(&filter));
    output::print_comparisons(filter.apply(&report.comparisons));
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compare() {
        let cli = Cli::try_parse_from([
            "benchdelta",
            "compare",
            "results",
            "--threshold",
            "2.5",
            "--format",
            "md",
            "--status",
            "regressed",
            "--mode",
            "avgt",
            "--reliable-only",
            "--sort",
            "improvement",
        ])
        .unwrap();

        match cli.command {
            Commands::Compare {
                basepath,
                threshold,
                format,
                filter,
                sort,
                ..
            } => {
                assert_eq!(basepath, PathBuf::from("results"));
                assert_eq!(threshold, Some(2.5));
                assert_eq!(format, Some(OutputFormat::Markdown));
                assert_eq!(filter.status, Some(Status::Regressed));
                assert_eq!(filter.mode, Some(Mode::AverageTime));
                assert!(filter.reliable_only);
                assert_eq!(SortKey::from(sort), SortKey::Improvement);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let args = ["benchdelta", "summary", "r.json", "--mode", "fast"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_filter_args() {
        assert!(FilterArgs::default().to_filter().is_empty());

        let args = FilterArgs {
            name: Some("codec".to_string()),
            ..FilterArgs::default()
        };
        assert!(!args.to_filter().is_empty());
    }

    #[test]
    fn test_dotenv_config_reaches_cli() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("from-dotenv.toml");
        let dotenv = dir.path().join(".env");
        std::fs::write(&dotenv, format!("BENCHDELTA_CONFIG={}\n", config.display())).unwrap();

        dotenvy::from_path(&dotenv).unwrap();
        let cli = Cli::try_parse_from(["benchdelta", "summary", "report.json"]).unwrap();
        std::env::remove_var("BENCHDELTA_CONFIG");

        assert_eq!(cli.config, Some(config));
    }

    #[test]
    fn test_log_directive() {
        assert_eq!(log_directive("debug"), "warn,benchdelta=debug");
        assert_eq!(log_directive("benchdelta_compare=trace"), "benchdelta_compare=trace");
    }
}
