// Copyright 2025 Benchdelta Contributors
// SPDX-License-Identifier: Apache-2.0

//! Composite identity used to pair baseline and treatment records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::mode::Mode;

/// Identity of a benchmark measurement.
///
/// Two records describe the same measurement when benchmark name, mode,
/// thread count and JMH parameters are all equal. Parameters are kept sorted
/// so equality, hashing and ordering are structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BenchmarkIdentity {
    /// Fully qualified benchmark method name.
    pub benchmark: String,
    /// Benchmark mode.
    pub mode: Mode,
    /// Number of benchmark threads.
    pub threads: u32,
    /// JMH `@Param` values, empty for parameterless benchmarks.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}

impl BenchmarkIdentity {
    /// Create an identity without parameters.
    pub fn new(benchmark: impl Into<String>, mode: Mode, threads: u32) -> Self {
        Self {
            benchmark: benchmark.into(),
            mode,
            threads,
            params: BTreeMap::new(),
        }
    }

    /// Add a JMH parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Human-readable label, e.g. `Foo.bar [thrpt, 4 threads]`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BenchmarkIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}, {} threads]", self.benchmark, self.mode, self.threads)?;
        if !self.params.is_empty() {
            let params: Vec<String> = self
                .params
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            write!(f, " {{{}}}", params.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_label_without_params() {
        let id = BenchmarkIdentity::new("org.acme.Bench.parse", Mode::Throughput, 4);
        assert_eq!(id.label(), "org.acme.Bench.parse [thrpt, 4 threads]");
    }

    #[test]
    fn test_label_with_sorted_params() {
        let id = BenchmarkIdentity::new("Bench.run", Mode::AverageTime, 1)
            .with_param("size", "1024")
            .with_param("codec", "lz4");
        assert_eq!(id.label(), "Bench.run [avgt, 1 threads] {codec=lz4, size=1024}");
    }

    #[test]
    fn test_structural_equality_and_hash() {
        let a = BenchmarkIdentity::new("A", Mode::Throughput, 1);
        let b = BenchmarkIdentity::new("A", Mode::Throughput, 1);
        let c = BenchmarkIdentity::new("A", Mode::AverageTime, 1);
        let d = BenchmarkIdentity::new("A", Mode::Throughput, 2);

        let set: HashSet<_> = [a.clone(), b, c, d].into_iter().collect();
        assert_eq!(set.len(), 3);
        assert!(set.contains(&a));
    }
}
