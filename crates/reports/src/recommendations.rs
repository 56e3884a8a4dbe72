//! Improvement hints derived from a run

use searchbench_core::benchmark::RunOutcome;
use searchbench_core::report::GateClauseKind;

/// Precision below which descriptions are flagged as the likely culprit
const LOW_PRECISION: f64 = 0.6;

/// Failed cases listed individually before the rest are summarized
const LISTED_FAILURES: usize = 3;

/// Environment-aware recommendations for the console and HTML reports
pub fn recommendations(outcome: &RunOutcome) -> Vec<String> {
    let report = &outcome.report;
    let mut hints = Vec::new();

    let failed: Vec<_> = outcome.cases.iter().filter(|c| !c.passed).collect();
    if !failed.is_empty() {
        hints.push(format!("{} test cases failed:", failed.len()));
        for case in failed.iter().take(LISTED_FAILURES) {
            hints.push(format!(
                "  '{}': {}",
                case.query,
                case.failure_reasons.join(", ")
            ));
        }
        if failed.len() > LISTED_FAILURES {
            hints.push(format!("  ... and {} more", failed.len() - LISTED_FAILURES));
        }
    }

    if report.total_cases > 0 && report.average_precision < LOW_PRECISION {
        hints.push(format!(
            "Low precision ({:.2}): improve product descriptions and keywords",
            report.average_precision
        ));
    }

    let target = report
        .gate_clauses
        .iter()
        .find(|c| c.clause == GateClauseKind::ResponseTime)
        .map(|c| c.threshold);
    if let (Some(mean), Some(target)) = (report.mean_response_time(), target) {
        if mean > target {
            hints.push(format!(
                "Slow responses ({mean:.3}s > {target:.3}s target): consider caching or index tuning"
            ));
        }
    }

    for clause in report.gate_clauses.iter().filter(|c| !c.passed) {
        let observed = clause
            .observed
            .map(|v| format!("{v:.3}"))
            .unwrap_or_else(|| "not measured".to_string());
        hints.push(format!(
            "Quality gate '{}' failed for {}: {observed} vs threshold {:.3}",
            clause.clause, report.environment, clause.threshold
        ));
    }

    if let Some(trend) = &outcome.trend {
        for regression in trend.regressions() {
            hints.push(format!(
                "Regression in {}: {:.3} -> {:.3} ({:+.1}%) against the trailing window",
                regression.metric,
                regression.baseline,
                regression.current,
                regression.relative_change * 100.0
            ));
        }
    }

    if let Some(warning) = &outcome.store_warning {
        hints.push(format!("Benchmark history was not updated: {warning}"));
    }

    if report.total_cases > 0 && failed.is_empty() && report.gate_passed {
        hints.push(format!(
            "All test cases and quality gates passed for the {} environment",
            report.environment
        ));
    }

    hints
}
