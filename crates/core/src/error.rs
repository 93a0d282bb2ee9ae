// Copyright 2025 Benchdelta Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for the comparison pipeline.
//!
//! [`RecordError`] explains why a single JMH entry was rejected; it is always
//! turned into a diagnostic and never aborts a run. [`CompareError`] is
//! terminal: the pipeline stops and no report is produced.

use std::path::PathBuf;
use thiserror::Error;

use crate::diagnostics::Side;

/// Reasons a JMH entry fails structural validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    /// Entry is not a JSON object.
    #[error("entry is not a JSON object")]
    NotAnObject,

    /// A required field is absent or empty.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A field has an unexpected JSON type.
    #[error("field `{field}` must be {expected}")]
    InvalidType {
        /// Field path.
        field: &'static str,
        /// Expected type description.
        expected: &'static str,
    },

    /// Mode string is not a known JMH mode.
    #[error("unknown benchmark mode `{0}`")]
    UnknownMode(String),

    /// Score is present but not a finite number.
    #[error("primaryMetric.score is not a finite number: {0}")]
    NonFiniteScore(String),

    /// Score is below zero, which JMH never reports.
    #[error("primaryMetric.score must not be negative: {0}")]
    NegativeScore(f64),
}

/// Terminal pipeline errors.
#[derive(Debug, Error)]
pub enum CompareError {
    /// One side produced no valid records at all.
    #[error("no valid benchmark records found in {side} input ({origin})")]
    EmptyInput {
        /// Side that came up empty.
        side: Side,
        /// Description of the input source.
        origin: String,
    },

    /// The join of baseline and treatment produced no pairs.
    #[error(
        "no matching benchmarks between baseline and treatment \
         ({baseline_only} baseline-only, {treatment_only} treatment-only)"
    )]
    NoMatch {
        /// Identities found only in the baseline.
        baseline_only: usize,
        /// Identities found only in the treatment.
        treatment_only: usize,
    },

    /// An input directory does not exist.
    #[error("input directory {} does not exist", path.display())]
    MissingSource {
        /// Directory that was looked up.
        path: PathBuf,
    },

    /// Filesystem error while reading inputs or writing reports.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error while writing or reading a report.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, CompareError>;
