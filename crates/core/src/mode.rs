// Copyright 2025 Benchdelta Contributors
// SPDX-License-Identifier: Apache-2.0

//! JMH benchmark modes and their scoring direction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RecordError;

/// Execution mode of a JMH benchmark.
///
/// The mode decides whether a higher or a lower score is better, which in turn
/// fixes the sign convention of every comparison metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Mode {
    /// Operations per unit of time.
    #[serde(rename = "thrpt", alias = "Throughput")]
    Throughput,
    /// Average time per operation.
    #[serde(rename = "avgt", alias = "AverageTime")]
    AverageTime,
    /// Sampled time per operation.
    #[serde(rename = "sample", alias = "SampleTime")]
    SampleTime,
    /// Time of a single cold invocation.
    #[serde(rename = "ss", alias = "SingleShotTime")]
    SingleShotTime,
}

impl Mode {
    /// All modes, in declaration order.
    pub const ALL: [Mode; 4] = [
        Mode::Throughput,
        Mode::AverageTime,
        Mode::SampleTime,
        Mode::SingleShotTime,
    ];

    /// Whether a higher score means better performance.
    pub fn higher_is_better(self) -> bool {
        match self {
            Mode::Throughput => true,
            Mode::AverageTime | Mode::SampleTime | Mode::SingleShotTime => false,
        }
    }

    /// Short JMH name, as written in result files.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Throughput => "thrpt",
            Mode::AverageTime => "avgt",
            Mode::SampleTime => "sample",
            Mode::SingleShotTime => "ss",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "thrpt" | "Throughput" => Ok(Mode::Throughput),
            "avgt" | "AverageTime" => Ok(Mode::AverageTime),
            "sample" | "SampleTime" => Ok(Mode::SampleTime),
            "ss" | "SingleShotTime" => Ok(Mode::SingleShotTime),
            other => Err(RecordError::UnknownMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_throughput_is_higher_better() {
        let higher: Vec<Mode> = Mode::ALL
            .into_iter()
            .filter(|m| m.higher_is_better())
            .collect();
        assert_eq!(higher, vec![Mode::Throughput]);
    }

    #[test]
    fn test_parse_short_and_long_names() {
        assert_eq!("thrpt".parse::<Mode>().unwrap(), Mode::Throughput);
        assert_eq!("AverageTime".parse::<Mode>().unwrap(), Mode::AverageTime);
        assert_eq!("sample".parse::<Mode>().unwrap(), Mode::SampleTime);
        assert_eq!("ss".parse::<Mode>().unwrap(), Mode::SingleShotTime);
        assert!("fast".parse::<Mode>().is_err());
    }

    #[test]
    fn test_serde_uses_short_names() {
        assert_eq!(serde_json::to_string(&Mode::AverageTime).unwrap(), "\"avgt\"");
        let mode: Mode = serde_json::from_str("\"Throughput\"").unwrap();
        assert_eq!(mode, Mode::Throughput);
    }
}
