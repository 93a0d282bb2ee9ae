// Copyright 2025 Benchdelta Contributors
// SPDX-License-Identifier: Apache-2.0

//! Recoverable problems collected while running the pipeline.
//!
//! A [`Diagnostics`] collector is created by the caller before the first
//! stage runs and passed to each stage by mutable reference. Stages only
//! append to it. Once the pipeline returns, the caller owns a read-only view
//! of everything that was skipped, overwritten or left unmatched.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which input set a record or document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Reference measurements.
    Baseline,
    /// Measurements under evaluation.
    Treatment,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Baseline => f.write_str("baseline"),
            Side::Treatment => f.write_str("treatment"),
        }
    }
}

/// Category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Document could not be read.
    UnreadableDocument,
    /// Document is not valid JSON or not a JSON array.
    MalformedDocument,
    /// A single entry failed validation and was skipped.
    InvalidRecord,
    /// Document parsed but contained no valid entries.
    EmptyDocument,
    /// An identity appeared twice on one side; the later record won.
    DuplicateIdentity,
    /// Identities present on only one side.
    Unmatched,
}

/// A single recoverable problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Side the problem was found on, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    /// Document identifier or benchmark label.
    pub origin: String,
    /// Category.
    pub kind: DiagnosticKind,
    /// Human-readable reason.
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic tied to one side.
    pub fn new(
        side: Side,
        origin: impl Into<String>,
        kind: DiagnosticKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            side: Some(side),
            origin: origin.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.side {
            Some(side) => write!(f, "[{}] {}: {}", side, self.origin, self.message),
            None => write!(f, "{}: {}", self.origin, self.message),
        }
    }
}

/// Append-only collector of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Number of diagnostics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Count diagnostics of one kind.
    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    /// Diagnostics recorded for one side.
    pub fn for_side(&self, side: Side) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.side == Some(side))
    }

    /// Consume the collector.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
