//! I/O operations for benchmark documents and comparison reports.
//!
//! This module provides the filesystem [`DocumentSource`] and functions to
//! write comparison reports in JSON and Markdown.

use benchdelta_core::{CompareError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::loader::{DocumentSource, RawDocument};
use crate::markdown;
use crate::report::ComparisonReport;

/// Baseline subdirectory under a results base path.
pub const BASELINE_DIR: &str = "baseline";

/// Treatment subdirectory under a results base path.
pub const TREATMENT_DIR: &str = "treatment";

/// JSON report file name.
pub const REPORT_FILE: &str = "benchmark_comparison.json";

/// Markdown summary file name.
pub const SUMMARY_FILE: &str = "benchmark_comparison.md";

/// All `*.json` files directly inside a directory, ordered by file name.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    path: PathBuf,
}

impl DirectorySource {
    /// Create a source for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentSource for DirectorySource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn documents(&self) -> Result<Vec<RawDocument>> {
        if !self.path.is_dir() {
            return Err(CompareError::MissingSource {
                path: self.path.clone(),
            });
        }

        let entries = fs::read_dir(&self.path)?.map(|entry| entry.map(|e| e.path()));
        Ok(read_documents(&self.path, entries))
    }
}

/// Read the `*.json` files among `entries` in path order. Entries that
/// could not be listed come first, as unreadable documents.
fn read_documents<I>(dir: &Path, entries: I) -> Vec<RawDocument>
where
    I: IntoIterator<Item = io::Result<PathBuf>>,
{
    let mut documents = Vec::new();
    let mut paths = Vec::new();
    for (position, entry) in entries.into_iter().enumerate() {
        match entry {
            Ok(path) if is_json_file(&path) => paths.push(path),
            Ok(_) => {}
            Err(e) => {
                warn!(dir = %dir.display(), entry = position, error = %e, "Failed to list directory entry");
                let id = format!("{} (entry {position})", dir.display());
                documents.push(RawDocument::unreadable(id, e));
            }
        }
    }
    paths.sort();

    documents.extend(paths.into_iter().map(|path| {
        let id = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        debug!(document = %id, "Reading document");
        match fs::read_to_string(&path) {
            Ok(contents) => RawDocument::new(id, contents),
            Err(e) => RawDocument::unreadable(id, e),
        }
    }));
    documents
}

fn is_json_file(path: &Path) -> bool {
    path.is_file() && path.extension().map_or(false, |ext| ext == "json")
}

/// Which report files to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON report only.
    Json,
    /// Markdown summary only.
    Markdown,
    /// Both files.
    #[default]
    Both,
}

impl OutputFormat {
    /// Whether the JSON report is written.
    pub fn includes_json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Both)
    }

    /// Whether the Markdown summary is written.
    pub fn includes_markdown(self) -> bool {
        matches!(self, OutputFormat::Markdown | OutputFormat::Both)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Markdown => f.write_str("markdown"),
            OutputFormat::Both => f.write_str("both"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "both" => Ok(OutputFormat::Both),
            other => Err(format!(
                "unknown output format `{other}` (expected json, markdown or both)"
            )),
        }
    }
}

/// Write the report as pretty-printed JSON.
pub fn write_report_json(report: &ComparisonReport, path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read a report previously written by [`write_report_json`].
pub fn read_report_json(path: impl AsRef<Path>) -> Result<ComparisonReport> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write the Markdown summary.
pub fn write_summary(report: &ComparisonReport, path: impl AsRef<Path>) -> Result<()> {
    fs::write(path, markdown::generate_summary(report))?;
    Ok(())
}

/// Write the requested report files into `output_dir`, creating it if
/// needed. Returns the paths written.
pub fn write_all_outputs(
    report: &ComparisonReport,
    output_dir: impl AsRef<Path>,
    format: OutputFormat,
) -> Result<Vec<PathBuf>> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let mut written = Vec::new();
    if format.includes_json() {
        let path = output_dir.join(REPORT_FILE);
        write_report_json(report, &path)?;
        written.push(path);
    }
    if format.includes_markdown() {
        let path = output_dir.join(SUMMARY_FILE);
        write_summary(report, &path)?;
        written.push(path);
    }

    info!(files = written.len(), dir = %output_dir.display(), "Wrote comparison reports");
    Ok(written)
}
