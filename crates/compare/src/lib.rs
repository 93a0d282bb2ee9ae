//! Comparison engine for JMH benchmark result sets.
//!
//! This crate pairs a baseline set of JMH results with a treatment set and
//! computes direction-aware deltas, reliability flags and summary
//! statistics.
//!
//! # Quick Start
//!
//! ```no_run
//! use benchdelta_compare::{compare_sources, CompareConfig, ComparisonReport};
//! use benchdelta_compare::io::DirectorySource;
//! use benchdelta_core::Diagnostics;
//!
//! let baseline = DirectorySource::new("results/baseline");
//! let treatment = DirectorySource::new("results/treatment");
//! let config = CompareConfig::default();
//!
//! let mut diagnostics = Diagnostics::new();
//! let set = compare_sources(&baseline, &treatment, &config, &mut diagnostics)?;
//! let report = ComparisonReport::new(set, diagnostics, config.threshold_percent);
//!
//! for comparison in &report.comparisons {
//!     println!("{}: {:+.2}%", comparison.label(), comparison.improvement_percent);
//! }
//! # Ok::<(), benchdelta_core::CompareError>(())
//! ```
//!
//! # Modules
//!
//! - [`loader`] - documents to measurement records
//! - [`index`] - records keyed by identity
//! - [`comparator`] - inner join and per-pair metrics
//! - [`aggregator`] - summary statistics
//! - [`filter`] - filtering and sorting for presentation
//! - [`report`] - the serializable `ComparisonReport`
//! - [`io`] - filesystem sources and report writers
//! - [`markdown`] - Markdown summary generation

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod aggregator;
pub mod comparator;
pub mod filter;
pub mod index;
pub mod io;
pub mod loader;
pub mod markdown;
pub mod report;

pub use aggregator::summarize;
pub use comparator::{
    compare_indices, compare_pair, CompareConfig, ComparisonSet, UnmatchedSummary,
};
pub use filter::{sort_comparisons, summarize_filtered, ComparisonFilter, SortKey};
pub use index::RecordIndex;
pub use loader::{load_side, DocumentSource, RawDocument};
pub use report::ComparisonReport;

use benchdelta_core::{Diagnostics, MeasurementRecord, Result, Side};

/// Index and compare two already-loaded record sets.
///
/// # Errors
///
/// Returns [`benchdelta_core::CompareError::NoMatch`] when the sets share no
/// identity.
pub fn compare_records(
    baseline: Vec<MeasurementRecord>,
    treatment: Vec<MeasurementRecord>,
    config: &CompareConfig,
    diagnostics: &mut Diagnostics,
) -> Result<ComparisonSet> {
    let baseline = RecordIndex::build(baseline, Side::Baseline, diagnostics);
    let treatment = RecordIndex::build(treatment, Side::Treatment, diagnostics);
    compare_indices(baseline, treatment, config, diagnostics)
}

/// Run the whole pipeline over two document sources.
///
/// Both sides are loaded before any terminal error is returned, so the
/// diagnostics cover every input document.
///
/// # Errors
///
/// Returns [`benchdelta_core::CompareError::EmptyInput`] when a side has no
/// valid records, [`benchdelta_core::CompareError::NoMatch`] when nothing
/// pairs up, and any error raised by the sources themselves.
pub fn compare_sources(
    baseline: &dyn DocumentSource,
    treatment: &dyn DocumentSource,
    config: &CompareConfig,
    diagnostics: &mut Diagnostics,
) -> Result<ComparisonSet> {
    let baseline_records = load_side(baseline, Side::Baseline, diagnostics);
    let treatment_records = load_side(treatment, Side::Treatment, diagnostics);
    compare_records(baseline_records?, treatment_records?, config, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchdelta_core::{BenchmarkIdentity, CompareError, DiagnosticKind, Mode, Status};

    fn record(name: &str, mode: Mode, score: f64) -> MeasurementRecord {
        MeasurementRecord::new(BenchmarkIdentity::new(name, mode, 1), score).with_sampling(5, 2)
    }

    #[test]
    fn test_compare_records_end_to_end() {
        let mut diagnostics = Diagnostics::new();
        let set = compare_records(
            vec![record("A", Mode::Throughput, 100.0), record("B", Mode::AverageTime, 10.0)],
            vec![
                record("A", Mode::Throughput, 150.0),
                record("B", Mode::AverageTime, 5.0),
                record("B", Mode::AverageTime, 20.0),
            ],
            &CompareConfig::default(),
            &mut diagnostics,
        )
        .unwrap();

        assert_eq!(set.comparisons.len(), 2);
        assert_eq!(set.comparisons[0].status, Status::Improved);
        // The later duplicate (20.0) wins on the treatment side.
        assert_eq!(set.comparisons[1].status, Status::Regressed);
        assert_eq!(diagnostics.count_of(DiagnosticKind::DuplicateIdentity), 1);
    }

    #[test]
    fn test_both_sides_are_loaded_before_failing() {
        let empty = || -> Result<Vec<RawDocument>> { Ok(vec![RawDocument::new("bad.json", "{")]) };

        let mut baseline = loader::MockDocumentSource::new();
        baseline.expect_describe().return_const("base".to_string());
        baseline.expect_documents().returning(empty);
        let mut treatment = loader::MockDocumentSource::new();
        treatment.expect_describe().return_const("treat".to_string());
        treatment.expect_documents().returning(empty);

        let mut diagnostics = Diagnostics::new();
        let config = CompareConfig::default();
        let err = compare_sources(&baseline, &treatment, &config, &mut diagnostics).unwrap_err();

        assert!(matches!(err, CompareError::EmptyInput { side: Side::Baseline, .. }));
        assert_eq!(diagnostics.count_of(DiagnosticKind::MalformedDocument), 2);
    }
}
