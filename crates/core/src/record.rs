// Copyright 2025 Benchdelta Contributors
// SPDX-License-Identifier: Apache-2.0

//! A single JMH measurement and its structural validation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::RecordError;
use crate::identity::BenchmarkIdentity;
use crate::mode::Mode;

/// Informational run metadata carried through to reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Path of the JVM binary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jvm: Option<String>,
    /// JDK version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jdk_version: Option<String>,
    /// VM name, e.g. `OpenJDK 64-Bit Server VM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_name: Option<String>,
    /// VM version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_version: Option<String>,
    /// JVM arguments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub jvm_args: Vec<String>,
    /// Warmup iteration duration, e.g. `10 s`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warmup_time: Option<String>,
    /// Measurement iteration duration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_time: Option<String>,
    /// Secondary metrics as reported by JMH.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub secondary_metrics: BTreeMap<String, Value>,
}

/// One benchmark run result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Identity used for pairing.
    pub identity: BenchmarkIdentity,
    /// Primary metric score. Always finite.
    pub score: f64,
    /// Primary metric error, zero when JMH could not compute one.
    pub score_error: f64,
    /// Unit of the score, e.g. `ops/s`.
    pub score_unit: String,
    /// Confidence interval bounds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub score_confidence: Vec<f64>,
    /// Number of measurement iterations.
    pub measurement_iterations: u32,
    /// Number of forked JVMs.
    pub forks: u32,
    /// Number of warmup iterations.
    pub warmup_iterations: u32,
    /// Run metadata.
    #[serde(default)]
    pub metadata: RunMetadata,
}

impl MeasurementRecord {
    /// Create a record with default sampling metadata.
    ///
    /// Defaults to one fork and zero measurement iterations, matching what
    /// JMH output implies when those fields are missing.
    pub fn new(identity: BenchmarkIdentity, score: f64) -> Self {
        Self {
            identity,
            score,
            score_error: 0.0,
            score_unit: String::new(),
            score_confidence: Vec::new(),
            measurement_iterations: 0,
            forks: 1,
            warmup_iterations: 0,
            metadata: RunMetadata::default(),
        }
    }

    /// Set iteration and fork counts.
    pub fn with_sampling(mut self, measurement_iterations: u32, forks: u32) -> Self {
        self.measurement_iterations = measurement_iterations;
        self.forks = forks;
        self
    }

    /// Set the score unit.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.score_unit = unit.into();
        self
    }

    /// Whether the run carries any variance information.
    ///
    /// A single iteration or a single fork gives one sample per axis, so a
    /// comparison against it is numerically defined but says nothing about
    /// noise.
    pub fn has_variance_information(&self) -> bool {
        self.measurement_iterations > 1 && self.forks > 1
    }

    /// Validate one entry of a JMH result array.
    pub fn from_json(entry: &Value) -> Result<Self, RecordError> {
        let obj = entry.as_object().ok_or(RecordError::NotAnObject)?;

        let benchmark = match obj.get("benchmark") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(Value::String(_)) | None | Some(Value::Null) => {
                return Err(RecordError::MissingField("benchmark"))
            }
            Some(_) => {
                return Err(RecordError::InvalidType {
                    field: "benchmark",
                    expected: "a string",
                })
            }
        };

        let mode: Mode = match obj.get("mode") {
            Some(Value::String(s)) => s.parse()?,
            None | Some(Value::Null) => return Err(RecordError::MissingField("mode")),
            Some(_) => {
                return Err(RecordError::InvalidType {
                    field: "mode",
                    expected: "a string",
                })
            }
        };

        let metric = match obj.get("primaryMetric") {
            Some(Value::Object(m)) => m,
            None | Some(Value::Null) => {
                return Err(RecordError::MissingField("primaryMetric.score"))
            }
            Some(_) => {
                return Err(RecordError::InvalidType {
                    field: "primaryMetric",
                    expected: "an object",
                })
            }
        };

        let score = match metric.get("score") {
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) if v.is_finite() && v < 0.0 => return Err(RecordError::NegativeScore(v)),
                Some(v) if v.is_finite() => v,
                _ => return Err(RecordError::NonFiniteScore(n.to_string())),
            },
            // JMH writes "NaN" and "Infinity" as strings.
            Some(Value::String(s)) => return Err(RecordError::NonFiniteScore(s.clone())),
            None | Some(Value::Null) => {
                return Err(RecordError::MissingField("primaryMetric.score"))
            }
            Some(_) => {
                return Err(RecordError::InvalidType {
                    field: "primaryMetric.score",
                    expected: "a number",
                })
            }
        };

        let threads = optional_count(obj, "threads")?.unwrap_or(1);
        let mut identity = BenchmarkIdentity::new(benchmark, mode, threads);
        if let Some(Value::Object(params)) = obj.get("params") {
            for (key, value) in params {
                identity.params.insert(key.clone(), scalar_to_string(value));
            }
        }

        let score_error = metric
            .get("scoreError")
            .and_then(Value::as_f64)
            .filter(|e| e.is_finite())
            .unwrap_or(0.0);

        let score_confidence = metric
            .get("scoreConfidence")
            .and_then(Value::as_array)
            .map(|bounds| bounds.iter().filter_map(Value::as_f64).collect())
            .unwrap_or_default();

        let metadata = RunMetadata {
            jvm: optional_string(obj, "jvm"),
            jdk_version: optional_string(obj, "jdkVersion"),
            vm_name: optional_string(obj, "vmName"),
            vm_version: optional_string(obj, "vmVersion"),
            jvm_args: obj
                .get("jvmArgs")
                .and_then(Value::as_array)
                .map(|args| {
                    args.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            warmup_time: optional_string(obj, "warmupTime"),
            measurement_time: optional_string(obj, "measurementTime"),
            secondary_metrics: obj
                .get("secondaryMetrics")
                .and_then(Value::as_object)
                .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                .unwrap_or_default(),
        };

        Ok(Self {
            identity,
            score,
            score_error,
            score_unit: metric
                .get("scoreUnit")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            score_confidence,
            measurement_iterations: optional_count(obj, "measurementIterations")?.unwrap_or(0),
            forks: optional_count(obj, "forks")?.unwrap_or(1),
            warmup_iterations: optional_count(obj, "warmupIterations")?.unwrap_or(0),
            metadata,
        })
    }
}

fn optional_count(
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<u32>, RecordError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .map(Some)
            .ok_or(RecordError::InvalidType {
                field,
                expected: "a non-negative integer",
            }),
        Some(_) => Err(RecordError::InvalidType {
            field,
            expected: "a non-negative integer",
        }),
    }
}

fn optional_string(obj: &Map<String, Value>, field: &str) -> Option<String> {
    obj.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
