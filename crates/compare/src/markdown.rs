//! Markdown output generation for comparison reports.

use benchdelta_core::{ComparisonRecord, SummaryStatistics};
use std::fmt::Write;

use crate::report::ComparisonReport;

/// Format a signed percentage, including unbounded values.
pub fn format_percent(value: f64) -> String {
    if value.is_finite() {
        format!("{value:+.2}%")
    } else if value.is_sign_positive() {
        "+inf%".to_string()
    } else {
        "-inf%".to_string()
    }
}

/// Format a speedup factor.
pub fn format_speedup(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.3}x")
    } else {
        "infx".to_string()
    }
}

/// Status cell for a row; unreliable rows get a placeholder instead of a verdict.
pub fn status_cell(record: &ComparisonRecord) -> String {
    match record.display_status() {
        Some(status) => status.to_string(),
        None => "n/a".to_string(),
    }
}

/// Render summary statistics as a two-column table.
pub fn summary_table(stats: &SummaryStatistics) -> String {
    let mut output = String::new();

    writeln!(output, "| Metric | Value |").unwrap();
    writeln!(output, "|--------|-------|").unwrap();
    writeln!(output, "| Total benchmarks | {} |", stats.total).unwrap();
    writeln!(output, "| Improved | {} |", stats.improved_count).unwrap();
    writeln!(output, "| Regressed | {} |", stats.regressed_count).unwrap();
    writeln!(output, "| Unchanged | {} |", stats.unchanged_count).unwrap();
    writeln!(output, "| Unreliable | {} |", stats.unreliable_count).unwrap();
    writeln!(output, "| Mean improvement | {} |", format_percent(stats.mean_improvement)).unwrap();
    writeln!(output, "| Median improvement | {} |", format_percent(stats.median_improvement)).unwrap();
    writeln!(output, "| Mean speedup | {} |", format_speedup(stats.mean_speedup)).unwrap();
    writeln!(output, "| Median speedup | {} |", format_speedup(stats.median_speedup)).unwrap();
    if stats.unbounded_count > 0 {
        writeln!(output, "| Unbounded (zero baseline) | {} |", stats.unbounded_count).unwrap();
    }

    output
}

/// Generate a Markdown summary of a comparison report.
pub fn generate_summary(report: &ComparisonReport) -> String {
    let mut output = String::new();

    writeln!(output, "# Benchmark Comparison").unwrap();
    writeln!(output).unwrap();
    writeln!(output, "Generated: {}", report.generated_at.to_rfc3339()).unwrap();
    writeln!(output).unwrap();
    writeln!(output, "Threshold: +/-{:.2}%", report.threshold_percent).unwrap();
    writeln!(output).unwrap();
    writeln!(output, "## Summary").unwrap();
    writeln!(output).unwrap();
    output.push_str(&summary_table(&report.summary));

    let regressions = &report.summary.regressions;
    if regressions.count > 0 {
        writeln!(output).unwrap();
        writeln!(output, "## Regressions").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Metric | Value |").unwrap();
        writeln!(output, "|--------|-------|").unwrap();
        writeln!(output, "| Count | {} |", regressions.count).unwrap();
        writeln!(output, "| Mean change | {} |", format_percent(regressions.mean_improvement)).unwrap();
        writeln!(output, "| Median change | {} |", format_percent(regressions.median_improvement)).unwrap();
        writeln!(output, "| Mean speedup | {} |", format_speedup(regressions.mean_speedup)).unwrap();
        writeln!(output, "| Median speedup | {} |", format_speedup(regressions.median_speedup)).unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "## Results").unwrap();
    writeln!(output).unwrap();
    writeln!(output, "| Benchmark | Baseline | Treatment | Unit | Change | Speedup | Status |").unwrap();
    writeln!(output, "|-----------|----------|-----------|------|--------|---------|--------|").unwrap();

    for record in &report.comparisons {
        writeln!(
            output,
            "| {} | {:.4} ± {:.4} | {:.4} ± {:.4} | {} | {} | {} | {} |",
            record.label(),
            record.baseline.score,
            record.baseline.score_error,
            record.treatment.score,
            record.treatment.score_error,
            record.baseline.score_unit,
            format_percent(record.improvement_percent),
            format_speedup(record.speedup),
            status_cell(record),
        )
        .unwrap();
    }

    if !report.unmatched.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "## Unmatched").unwrap();
        writeln!(output).unwrap();
        for identity in &report.unmatched.baseline_only {
            writeln!(output, "- baseline only: {identity}").unwrap();
        }
        for identity in &report.unmatched.treatment_only {
            writeln!(output, "- treatment only: {identity}").unwrap();
        }
    }

    if !report.diagnostics.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "## Diagnostics").unwrap();
        writeln!(output).unwrap();
        for diagnostic in &report.diagnostics {
            writeln!(output, "- {diagnostic}").unwrap();
        }
    }

    writeln!(output).unwrap();
    writeln!(output, "---").unwrap();
    writeln!(output, "Total benchmarks: {}", report.comparisons.len()).unwrap();

    output
}
