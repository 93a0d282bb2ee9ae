// Copyright 2025 Benchdelta Contributors
// SPDX-License-Identifier: Apache-2.0

//! Core types for comparing JMH benchmark results.
//!
//! This crate holds the value types shared by every stage of the comparison
//! pipeline:
//!
//! - [`mode`] - JMH benchmark modes and their scoring direction
//! - [`identity`] - the composite key pairing baseline and treatment records
//! - [`record`] - validated measurement records
//! - [`comparison`] - comparison records, verdicts and summary statistics
//! - [`diagnostics`] - the collector for recoverable problems
//! - [`error`] - terminal and per-record errors

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod comparison;
pub mod diagnostics;
pub mod error;
pub mod identity;
pub mod mode;
pub mod record;

pub use comparison::{
    ComparisonRecord, RegressionSummary, Status, SummaryStatistics, DEFAULT_THRESHOLD_PERCENT,
};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Side};
pub use error::{CompareError, RecordError, Result};
pub use identity::BenchmarkIdentity;
pub use mode::Mode;
pub use record::{MeasurementRecord, RunMetadata};
