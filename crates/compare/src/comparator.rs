//! Pairing baseline and treatment records and computing their deltas.
//!
//! Scores are compared in the direction of their mode: for throughput a
//! higher treatment score is an improvement, for the time-based modes a
//! lower one is. Both `improvement_percent` and `speedup` are oriented so
//! that positive (respectively above 1.0) always means the treatment is
//! better.

use benchdelta_core::{
    BenchmarkIdentity, CompareError, ComparisonRecord, Diagnostic, DiagnosticKind, Diagnostics,
    MeasurementRecord, Mode, Result, Side, Status, DEFAULT_THRESHOLD_PERCENT,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::index::RecordIndex;

/// Comparator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Changes within +/- this many percent are `unchanged`.
    pub threshold_percent: f64,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            threshold_percent: DEFAULT_THRESHOLD_PERCENT,
        }
    }
}

impl CompareConfig {
    /// Create a config with a custom threshold.
    pub fn with_threshold(threshold_percent: f64) -> Self {
        Self { threshold_percent }
    }
}

/// Direction-adjusted change between two scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delta {
    /// Signed improvement in percent.
    pub improvement_percent: f64,
    /// Multiplicative speedup.
    pub speedup: f64,
    /// False when a zero denominator made a value infinite.
    pub bounded: bool,
}

/// Compute the change from `baseline` to `treatment` for a mode.
///
/// A zero baseline never produces NaN: two zero scores are no change, and a
/// move away from zero is reported as an unbounded improvement or
/// regression.
pub fn compute_delta(mode: Mode, baseline: f64, treatment: f64) -> Delta {
    if baseline == 0.0 {
        if treatment == 0.0 {
            return Delta {
                improvement_percent: 0.0,
                speedup: 1.0,
                bounded: true,
            };
        }
        // Throughput rising from zero is better; latency rising from zero is worse.
        let better = if mode.higher_is_better() {
            treatment > 0.0
        } else {
            treatment < 0.0
        };
        let (improvement_percent, speedup) = if better {
            (f64::INFINITY, f64::INFINITY)
        } else {
            (f64::NEG_INFINITY, 0.0)
        };
        return Delta {
            improvement_percent,
            speedup,
            bounded: false,
        };
    }

    let (improvement_percent, speedup) = if mode.higher_is_better() {
        ((treatment - baseline) / baseline * 100.0, treatment / baseline)
    } else if treatment == 0.0 {
        (100.0, f64::INFINITY)
    } else {
        ((baseline - treatment) / baseline * 100.0, baseline / treatment)
    };

    // Tiny baselines can overflow even with a non-zero denominator.
    Delta {
        improvement_percent,
        speedup,
        bounded: improvement_percent.is_finite() && speedup.is_finite(),
    }
}

/// Build the comparison record for one matched pair.
pub fn compare_pair(
    baseline: MeasurementRecord,
    treatment: MeasurementRecord,
    config: &CompareConfig,
) -> ComparisonRecord {
    let identity = baseline.identity.clone();
    let delta = compute_delta(identity.mode, baseline.score, treatment.score);
    let status = Status::classify(delta.improvement_percent, config.threshold_percent);
    let reliable = baseline.has_variance_information() && treatment.has_variance_information();

    ComparisonRecord {
        identity,
        baseline,
        treatment,
        improvement_percent: delta.improvement_percent,
        speedup: delta.speedup,
        status,
        reliable,
        bounded: delta.bounded,
    }
}

/// Identities that appear on one side only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedSummary {
    /// Present in the baseline only.
    pub baseline_only: Vec<BenchmarkIdentity>,
    /// Present in the treatment only.
    pub treatment_only: Vec<BenchmarkIdentity>,
}

impl UnmatchedSummary {
    /// Number of baseline-only identities.
    pub fn baseline_only_count(&self) -> usize {
        self.baseline_only.len()
    }

    /// Number of treatment-only identities.
    pub fn treatment_only_count(&self) -> usize {
        self.treatment_only.len()
    }

    /// Whether every identity was matched.
    pub fn is_empty(&self) -> bool {
        self.baseline_only.is_empty() && self.treatment_only.is_empty()
    }
}

/// Output of the comparator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSet {
    /// One record per matched identity, in identity order.
    pub comparisons: Vec<ComparisonRecord>,
    /// Identities left unmatched.
    pub unmatched: UnmatchedSummary,
}

/// Inner-join two indices and compare every matched pair.
///
/// # Errors
///
/// Returns [`CompareError::NoMatch`] when no identity is present on both
/// sides.
pub fn compare_indices(
    baseline: RecordIndex,
    mut treatment: RecordIndex,
    config: &CompareConfig,
    diagnostics: &mut Diagnostics,
) -> Result<ComparisonSet> {
    let mut comparisons = Vec::with_capacity(baseline.len().min(treatment.len()));
    let mut baseline_only = Vec::new();

    for (identity, base) in baseline.into_records() {
        match treatment.remove(&identity) {
            Some(treat) => comparisons.push(compare_pair(base, treat, config)),
            None => baseline_only.push(identity),
        }
    }
    let treatment_only: Vec<BenchmarkIdentity> = treatment.into_records().into_keys().collect();

    for identity in &baseline_only {
        debug!(benchmark = %identity, "Unmatched baseline-only benchmark");
    }
    for identity in &treatment_only {
        debug!(benchmark = %identity, "Unmatched treatment-only benchmark");
    }
    report_unmatched(Side::Baseline, &baseline_only, diagnostics);
    report_unmatched(Side::Treatment, &treatment_only, diagnostics);

    if comparisons.is_empty() {
        return Err(CompareError::NoMatch {
            baseline_only: baseline_only.len(),
            treatment_only: treatment_only.len(),
        });
    }

    info!(
        matched = comparisons.len(),
        baseline_only = baseline_only.len(),
        treatment_only = treatment_only.len(),
        "Compared benchmark results"
    );

    Ok(ComparisonSet {
        comparisons,
        unmatched: UnmatchedSummary {
            baseline_only,
            treatment_only,
        },
    })
}

fn report_unmatched(side: Side, identities: &[BenchmarkIdentity], diagnostics: &mut Diagnostics) {
    if identities.is_empty() {
        return;
    }
    let message = format!("{} unmatched {}-only benchmarks", identities.len(), side);
    warn!(side = %side, count = identities.len(), "{}", message);
    diagnostics.push(Diagnostic::new(side, "join", DiagnosticKind::Unmatched, message));
}
