//! Filtering and ordering of comparison records.

use benchdelta_core::{ComparisonRecord, Mode, Status, SummaryStatistics};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::aggregator::summarize;

/// Conjunctive filter over comparison records. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonFilter {
    /// Case-insensitive substring of the benchmark name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_contains: Option<String>,
    /// Required status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    /// Required mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    /// Required reliability flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reliable: Option<bool>,
}

impl ComparisonFilter {
    /// Filter that matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match benchmark names containing `needle`, ignoring case.
    pub fn name_contains(mut self, needle: impl Into<String>) -> Self {
        self.name_contains = Some(needle.into());
        self
    }

    /// Match one status.
    pub fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Match one mode.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Match on the reliability flag.
    pub fn reliable(mut self, reliable: bool) -> Self {
        self.reliable = Some(reliable);
        self
    }

    /// Whether no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.name_contains.as_deref().map_or(true, str::is_empty)
            && self.status.is_none()
            && self.mode.is_none()
            && self.reliable.is_none()
    }

    /// Whether a record passes every criterion.
    pub fn matches(&self, record: &ComparisonRecord) -> bool {
        if let Some(needle) = self.name_contains.as_deref() {
            if !record
                .identity
                .benchmark
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        self.status.map_or(true, |s| record.status == s)
            && self.mode.map_or(true, |m| record.identity.mode == m)
            && self.reliable.map_or(true, |r| record.reliable == r)
    }

    /// Records passing the filter, in their original order.
    pub fn apply<'a>(
        &'a self,
        records: &'a [ComparisonRecord],
    ) -> impl Iterator<Item = &'a ComparisonRecord> + 'a {
        records.iter().filter(move |r| self.matches(r))
    }
}

/// Summarize only the records passing `filter`.
pub fn summarize_filtered(
    records: &[ComparisonRecord],
    filter: &ComparisonFilter,
) -> SummaryStatistics {
    summarize(filter.apply(records))
}

/// Column to order comparison records by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Benchmark name, then the rest of the identity.
    Benchmark,
    /// Mode.
    Mode,
    /// Baseline score.
    BaselineScore,
    /// Treatment score.
    TreatmentScore,
    /// Score unit.
    Unit,
    /// Speedup.
    Speedup,
    /// Improvement percent.
    Improvement,
}

/// Sort records in place. Ties keep identity order.
pub fn sort_comparisons(records: &mut [ComparisonRecord], key: SortKey, descending: bool) {
    records.sort_by(|a, b| {
        let ordering = compare_by(a, b, key).then_with(|| a.identity.cmp(&b.identity));
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn compare_by(a: &ComparisonRecord, b: &ComparisonRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Benchmark => a.identity.benchmark.cmp(&b.identity.benchmark),
        SortKey::Mode => a.identity.mode.cmp(&b.identity.mode),
        SortKey::BaselineScore => a.baseline.score.total_cmp(&b.baseline.score),
        SortKey::TreatmentScore => a.treatment.score.total_cmp(&b.treatment.score),
        SortKey::Unit => a.baseline.score_unit.cmp(&b.baseline.score_unit),
        SortKey::Speedup => a.speedup.total_cmp(&b.speedup),
        SortKey::Improvement => a.improvement_percent.total_cmp(&b.improvement_percent),
    }
}
