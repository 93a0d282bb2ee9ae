//! Terminal rendering for comparison results.

use benchdelta_compare::markdown::{format_percent, format_speedup};
use benchdelta_core::{ComparisonRecord, Diagnostic, Status, SummaryStatistics};
use colored::{ColoredString, Colorize};

/// Colour a status word the way a reader scans for trouble.
pub fn status_label(record: &ComparisonRecord) -> ColoredString {
    match record.display_status() {
        Some(Status::Improved) => "improved".green(),
        Some(Status::Regressed) => "regressed".red().bold(),
        Some(Status::Unchanged) => "unchanged".normal(),
        None => "n/a".dimmed(),
    }
}

/// Plain-text lines for a summary block, without colour.
pub fn summary_lines(stats: &SummaryStatistics) -> Vec<String> {
    let mut lines = vec![
        format!("Total benchmarks:   {}", stats.total),
        format!("Improved:           {}", stats.improved_count),
        format!("Regressed:          {}", stats.regressed_count),
        format!("Unchanged:          {}", stats.unchanged_count),
        format!("Unreliable:         {}", stats.unreliable_count),
        format!("Mean improvement:   {}", format_percent(stats.mean_improvement)),
        format!("Median improvement: {}", format_percent(stats.median_improvement)),
        format!("Mean speedup:       {}", format_speedup(stats.mean_speedup)),
        format!("Median speedup:     {}", format_speedup(stats.median_speedup)),
    ];
    if stats.unbounded_count > 0 {
        lines.push(format!("Unbounded:          {}", stats.unbounded_count));
    }
    if stats.regressions.count > 0 {
        lines.push(format!(
            "Regressions:        {} (mean {}, median {})",
            stats.regressions.count,
            format_percent(stats.regressions.mean_improvement),
            format_percent(stats.regressions.median_improvement),
        ));
    }
    lines
}

/// Print a titled summary block to stdout.
pub fn print_summary(title: &str, stats: &SummaryStatistics) {
    println!("{}", title.bold());
    for line in summary_lines(stats) {
        println!("  {line}");
    }
}

/// One row of the per-benchmark listing.
pub fn comparison_line(record: &ComparisonRecord) -> String {
    format!(
        "{}: {:.4} -> {:.4} {} ({}, {})",
        record.label(),
        record.baseline.score,
        record.treatment.score,
        record.baseline.score_unit,
        format_percent(record.improvement_percent),
        format_speedup(record.speedup),
    )
}

/// Print one line per comparison.
pub fn print_comparisons<'a>(records: impl IntoIterator<Item = &'a ComparisonRecord>) {
    for record in records {
        println!("  {} [{}]", comparison_line(record), status_label(record));
    }
}

/// Print diagnostics to stderr so they stay out of piped stdout.
pub fn print_diagnostics<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>) {
    for diagnostic in diagnostics {
        eprintln!("{} {diagnostic}", "warning:".yellow().bold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchdelta_compare::{compare_pair, CompareConfig};
    use benchdelta_core::{BenchmarkIdentity, MeasurementRecord, Mode, RegressionSummary};

    #[test]
    fn test_summary_lines() {
        let stats = SummaryStatistics {
            total: 3,
            improved_count: 1,
            regressed_count: 1,
            unchanged_count: 1,
            mean_improvement: 2.5,
            mean_speedup: 1.1,
            regressions: RegressionSummary {
                count: 1,
                mean_improvement: -4.0,
                median_improvement: -4.0,
                mean_speedup: 0.96,
                median_speedup: 0.96,
            },
            ..SummaryStatistics::default()
        };

        let lines = summary_lines(&stats);
        assert_eq!(lines[0], "Total benchmarks:   3");
        assert!(lines.contains(&"Mean improvement:   +2.50%".to_string()));
        assert!(lines.iter().any(|l| l.starts_with("Regressions:        1 (mean -4.00%")));
        assert!(!lines.iter().any(|l| l.starts_with("Unbounded")));
    }

    #[test]
    fn test_comparison_line() {
        let identity = BenchmarkIdentity::new("A", Mode::Throughput, 1);
        let record = compare_pair(
            MeasurementRecord::new(identity.clone(), 100.0).with_unit("ops/s"),
            MeasurementRecord::new(identity, 150.0).with_unit("ops/s"),
            &CompareConfig::default(),
        );
        assert_eq!(
            comparison_line(&record),
            "A [thrpt, 1 threads]: 100.0000 -> 150.0000 ops/s (+50.00%, 1.500x)"
        );
    }
}
