//! Comparison report types.
//!
//! This module provides the [`ComparisonReport`] handed to presentation
//! layers: every comparison, the unmatched identities, the diagnostics and
//! the overall summary.

use benchdelta_core::{ComparisonRecord, Diagnostic, Diagnostics, SummaryStatistics};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregator::summarize;
use crate::comparator::{ComparisonSet, UnmatchedSummary};
use crate::filter::{summarize_filtered, ComparisonFilter};

/// Complete result of one comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// Threshold used to classify changes.
    pub threshold_percent: f64,
    /// Summary over all comparisons.
    pub summary: SummaryStatistics,
    /// One entry per matched benchmark.
    pub comparisons: Vec<ComparisonRecord>,
    /// Benchmarks present on one side only.
    pub unmatched: UnmatchedSummary,
    /// Everything that was skipped or overwritten.
    pub diagnostics: Vec<Diagnostic>,
}

impl ComparisonReport {
    /// Assemble a report from the comparator output and the final diagnostics.
    pub fn new(set: ComparisonSet, diagnostics: Diagnostics, threshold_percent: f64) -> Self {
        let summary = summarize(&set.comparisons);
        Self {
            generated_at: Utc::now(),
            threshold_percent,
            summary,
            comparisons: set.comparisons,
            unmatched: set.unmatched,
            diagnostics: diagnostics.into_vec(),
        }
    }

    /// Summary over the comparisons passing `filter`.
    pub fn filtered_summary(&self, filter: &ComparisonFilter) -> SummaryStatistics {
        summarize_filtered(&self.comparisons, filter)
    }
}
