//! Summary statistics over comparison records.
//!
//! Works on any subset of records, including an empty one, which is what a
//! presentation layer hands over when a filter matches nothing.

use benchdelta_core::{ComparisonRecord, RegressionSummary, Status, SummaryStatistics};

/// Arithmetic mean of the finite values, `0.0` when there are none.
pub fn mean(values: &[f64]) -> f64 {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return 0.0;
    }
    finite.iter().sum::<f64>() / finite.len() as f64
}

/// True median of the finite values, `0.0` when there are none.
///
/// For an even count this is the average of the two middle values.
pub fn median(values: &[f64]) -> f64 {
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return 0.0;
    }
    finite.sort_by(f64::total_cmp);

    let mid = finite.len() / 2;
    if finite.len() % 2 == 0 {
        (finite[mid - 1] + finite[mid]) / 2.0
    } else {
        finite[mid]
    }
}

/// Summarize a set of comparison records.
///
/// Reliability does not exclude a record from any figure. Unbounded values
/// produced by a zero baseline are counted but left out of means and
/// medians.
pub fn summarize<'a, I>(records: I) -> SummaryStatistics
where
    I: IntoIterator<Item = &'a ComparisonRecord>,
{
    let mut stats = SummaryStatistics::default();
    let mut improvements = Vec::new();
    let mut speedups = Vec::new();
    let mut regression_improvements = Vec::new();
    let mut regression_speedups = Vec::new();

    for record in records {
        stats.total += 1;
        match record.status {
            Status::Improved => stats.improved_count += 1,
            Status::Regressed => {
                stats.regressed_count += 1;
                regression_improvements.push(record.improvement_percent);
                regression_speedups.push(record.speedup);
            }
            Status::Unchanged => stats.unchanged_count += 1,
        }
        if !record.reliable {
            stats.unreliable_count += 1;
        }
        if !record.improvement_percent.is_finite() || !record.speedup.is_finite() {
            stats.unbounded_count += 1;
        }
        improvements.push(record.improvement_percent);
        speedups.push(record.speedup);
    }

    stats.mean_improvement = mean(&improvements);
    stats.median_improvement = median(&improvements);
    stats.mean_speedup = mean(&speedups);
    stats.median_speedup = median(&speedups);
    stats.regressions = summarize_regressions(&regression_improvements, &regression_speedups);
    stats
}

fn summarize_regressions(improvements: &[f64], speedups: &[f64]) -> RegressionSummary {
    if improvements.is_empty() {
        return RegressionSummary::default();
    }
    RegressionSummary {
        count: improvements.len(),
        mean_improvement: mean(improvements),
        median_improvement: median(improvements),
        mean_speedup: mean(speedups),
        median_speedup: median(speedups),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::{compare_pair, CompareConfig};
    use benchdelta_core::{BenchmarkIdentity, MeasurementRecord, Mode};

    fn comparison(name: &str, mode: Mode, baseline: f64, treatment: f64) -> ComparisonRecord {
        let id = BenchmarkIdentity::new(name, mode, 1);
        compare_pair(
            MeasurementRecord::new(id.clone(), baseline).with_sampling(5, 2),
            MeasurementRecord::new(id, treatment).with_sampling(5, 2),
            &CompareConfig::default(),
        )
    }

    #[test]
    fn test_empty_set_is_all_zero() {
        let empty: Vec<ComparisonRecord> = Vec::new();
        let stats = summarize(&empty);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.improved_count + stats.regressed_count + stats.unchanged_count, 0);
        assert_eq!(stats.mean_improvement, 0.0);
        assert_eq!(stats.median_improvement, 0.0);
        assert_eq!(stats.mean_speedup, 0.0);
        assert_eq!(stats.median_speedup, 0.0);
        assert_eq!(stats.regressions, RegressionSummary::default());
    }

    #[test]
    fn test_median_is_true_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&[1.0, 1.0, 1.0, 100.0]), 1.0);
        assert_eq!(median(&[]), 0.0);
        // Mean would be 26.25 here.
        assert_ne!(median(&[1.0, 2.0, 2.0, 100.0]), mean(&[1.0, 2.0, 2.0, 100.0]));
    }

    #[test]
    fn test_counts_partition_by_status() {
        let records = vec![
            comparison("A", Mode::Throughput, 100.0, 150.0),
            comparison("B", Mode::AverageTime, 10.0, 5.0),
            comparison("C", Mode::Throughput, 100.0, 80.0),
            comparison("D", Mode::Throughput, 100.0, 100.5),
        ];
        let stats = summarize(&records);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.improved_count, 2);
        assert_eq!(stats.regressed_count, 1);
        assert_eq!(stats.unchanged_count, 1);
        assert_eq!(stats.unreliable_count, 0);

        // Improvements: 50, 50, -20, 0.5
        assert!((stats.mean_improvement - 20.125).abs() < 1e-9);
        assert!((stats.median_improvement - 25.25).abs() < 1e-9);
        // Speedups: 1.5, 2.0, 0.8, 1.005
        assert!((stats.median_speedup - 1.2525).abs() < 1e-9);

        assert_eq!(stats.regressions.count, 1);
        assert!((stats.regressions.mean_improvement + 20.0).abs() < 1e-9);
        assert!((stats.regressions.median_speedup - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_unreliable_records_still_count() {
        let id = BenchmarkIdentity::new("U", Mode::Throughput, 1);
        let unreliable = compare_pair(
            MeasurementRecord::new(id.clone(), 100.0).with_sampling(1, 1),
            MeasurementRecord::new(id, 200.0),
            &CompareConfig::default(),
        );
        let stats = summarize(std::iter::once(&unreliable));

        assert_eq!(stats.total, 1);
        assert_eq!(stats.unreliable_count, 1);
        assert_eq!(stats.improved_count, 1);
        assert!((stats.mean_improvement - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_unbounded_values_do_not_poison_means() {
        let records = vec![
            comparison("Z", Mode::Throughput, 0.0, 5.0),
            comparison("A", Mode::Throughput, 100.0, 110.0),
        ];
        let stats = summarize(&records);

        assert_eq!(stats.unbounded_count, 1);
        assert_eq!(stats.improved_count, 2);
        assert!(stats.mean_improvement.is_finite());
        assert!((stats.mean_improvement - 10.0).abs() < 1e-9);
    }
}
