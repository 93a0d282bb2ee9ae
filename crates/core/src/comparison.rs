// Copyright 2025 Benchdelta Contributors
// SPDX-License-Identifier: Apache-2.0

//! Comparison records and summary statistics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::identity::BenchmarkIdentity;
use crate::record::MeasurementRecord;

/// Default tolerance, in percent, within which a change counts as noise.
pub const DEFAULT_THRESHOLD_PERCENT: f64 = 1.0;

/// Verdict for a matched pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Treatment is better by more than the threshold.
    Improved,
    /// Treatment is worse by more than the threshold.
    Regressed,
    /// Change is within the threshold.
    Unchanged,
}

impl Status {
    /// Classify a direction-adjusted improvement against a tolerance.
    pub fn classify(improvement_percent: f64, threshold_percent: f64) -> Self {
        if improvement_percent > threshold_percent {
            Status::Improved
        } else if improvement_percent < -threshold_percent {
            Status::Regressed
        } else {
            Status::Unchanged
        }
    }

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Improved => "improved",
            Status::Regressed => "regressed",
            Status::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "improved" => Ok(Status::Improved),
            "regressed" => Ok(Status::Regressed),
            "unchanged" => Ok(Status::Unchanged),
            other => Err(format!("unknown status `{other}`")),
        }
    }
}

/// One matched baseline/treatment pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    /// Shared identity of both records.
    pub identity: BenchmarkIdentity,
    /// Baseline measurement.
    pub baseline: MeasurementRecord,
    /// Treatment measurement.
    pub treatment: MeasurementRecord,
    /// Signed improvement; positive means the treatment is better.
    #[serde(with = "unbounded_float")]
    pub improvement_percent: f64,
    /// Multiplicative factor; above 1.0 means the treatment is better.
    #[serde(with = "unbounded_float")]
    pub speedup: f64,
    /// Verdict against the configured threshold.
    pub status: Status,
    /// False when either side lacks variance information.
    pub reliable: bool,
    /// False when a zero baseline produced an unbounded value.
    pub bounded: bool,
}

impl ComparisonRecord {
    /// Label of the shared identity.
    pub fn label(&self) -> String {
        self.identity.label()
    }

    /// Status to display, or `None` when the row is not reliable enough to
    /// carry a verdict.
    pub fn display_status(&self) -> Option<Status> {
        self.reliable.then_some(self.status)
    }
}

/// Serializes infinite values as `"Infinity"` / `"-Infinity"`, the way JMH
/// writes them, since JSON numbers cannot carry them.
mod unbounded_float {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_sign_positive() {
            serializer.serialize_str("Infinity")
        } else {
            serializer.serialize_str("-Infinity")
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(v),
            Repr::Text(s) => match s.as_str() {
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                "NaN" => Ok(f64::NAN),
                other => Err(de::Error::invalid_value(de::Unexpected::Str(other), &"a number")),
            },
        }
    }
}

/// Statistics over the regressed subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionSummary {
    /// Number of regressed records.
    pub count: usize,
    /// Mean improvement of regressed records (negative).
    pub mean_improvement: f64,
    /// Median improvement of regressed records.
    pub median_improvement: f64,
    /// Mean speedup of regressed records.
    pub mean_speedup: f64,
    /// Median speedup of regressed records.
    pub median_speedup: f64,
}

impl Default for RegressionSummary {
    fn default() -> Self {
        Self {
            count: 0,
            mean_improvement: 0.0,
            median_improvement: 0.0,
            mean_speedup: 1.0,
            median_speedup: 1.0,
        }
    }
}

/// Summary over any set of comparison records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Number of records.
    pub total: usize,
    /// Records with status `improved`.
    pub improved_count: usize,
    /// Records with status `regressed`.
    pub regressed_count: usize,
    /// Records with status `unchanged`.
    pub unchanged_count: usize,
    /// Records flagged as not reliable.
    pub unreliable_count: usize,
    /// Records whose improvement or speedup is unbounded.
    pub unbounded_count: usize,
    /// Mean improvement percent.
    pub mean_improvement: f64,
    /// Median improvement percent.
    pub median_improvement: f64,
    /// Mean speedup.
    pub mean_speedup: f64,
    /// Median speedup.
    pub median_speedup: f64,
    /// Regression-only figures.
    pub regressions: RegressionSummary,
}
