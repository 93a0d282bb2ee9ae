//! Identity index over the records of one side.

use benchdelta_core::{
    BenchmarkIdentity, Diagnostic, DiagnosticKind, Diagnostics, MeasurementRecord, Side,
};
use std::collections::BTreeMap;
use tracing::warn;

/// Records of one side keyed by identity.
///
/// Iteration order is the identity order, so everything derived from an
/// index is deterministic regardless of input file order.
#[derive(Debug, Clone)]
pub struct RecordIndex {
    side: Side,
    records: BTreeMap<BenchmarkIdentity, MeasurementRecord>,
}

impl RecordIndex {
    /// Index records in input order. A later duplicate replaces the earlier
    /// one and is reported.
    pub fn build(
        records: Vec<MeasurementRecord>,
        side: Side,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut index = BTreeMap::new();
        for record in records {
            let identity = record.identity.clone();
            if let Some(previous) = index.insert(identity, record) {
                let label = previous.identity.label();
                warn!(side = %side, benchmark = %label, "Duplicate benchmark identity, keeping the later record");
                diagnostics.push(Diagnostic::new(
                    side,
                    label,
                    DiagnosticKind::DuplicateIdentity,
                    format!(
                        "duplicate identity; score {} replaced by a later record",
                        previous.score
                    ),
                ));
            }
        }
        Self {
            side,
            records: index,
        }
    }

    /// Side this index was built from.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Look up a record.
    pub fn get(&self, identity: &BenchmarkIdentity) -> Option<&MeasurementRecord> {
        self.records.get(identity)
    }

    /// Number of distinct identities.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Identities in order.
    pub fn identities(&self) -> impl Iterator<Item = &BenchmarkIdentity> {
        self.records.keys()
    }

    pub(crate) fn remove(&mut self, identity: &BenchmarkIdentity) -> Option<MeasurementRecord> {
        self.records.remove(identity)
    }

    pub(crate) fn into_records(self) -> BTreeMap<BenchmarkIdentity, MeasurementRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchdelta_core::Mode;

    fn record(name: &str, mode: Mode, threads: u32, score: f64) -> MeasurementRecord {
        MeasurementRecord::new(BenchmarkIdentity::new(name, mode, threads), score)
    }

    #[test]
    fn test_distinct_identities() {
        let mut diagnostics = Diagnostics::new();
        let index = RecordIndex::build(
            vec![
                record("A", Mode::Throughput, 1, 1.0),
                record("A", Mode::Throughput, 2, 2.0),
                record("A", Mode::AverageTime, 1, 3.0),
            ],
            Side::Baseline,
            &mut diagnostics,
        );
        assert_eq!(index.len(), 3);
        assert_eq!(index.side(), Side::Baseline);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_later_duplicate_wins() {
        let mut diagnostics = Diagnostics::new();
        let index = RecordIndex::build(
            vec![
                record("A", Mode::Throughput, 1, 100.0),
                record("B", Mode::Throughput, 1, 7.0),
                record("A", Mode::Throughput, 1, 150.0),
            ],
            Side::Treatment,
            &mut diagnostics,
        );

        let id = BenchmarkIdentity::new("A", Mode::Throughput, 1);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(&id).map(|r| r.score), Some(150.0));
        assert_eq!(diagnostics.count_of(DiagnosticKind::DuplicateIdentity), 1);

        let diagnostic = diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.side, Some(Side::Treatment));
        assert_eq!(diagnostic.origin, "A [thrpt, 1 threads]");
    }

    #[test]
    fn test_identities_are_ordered() {
        let mut diagnostics = Diagnostics::new();
        let index = RecordIndex::build(
            vec![record("B", Mode::Throughput, 1, 1.0), record("A", Mode::Throughput, 1, 1.0)],
            Side::Baseline,
            &mut diagnostics,
        );
        let names: Vec<&str> = index.identities().map(|id| id.benchmark.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
