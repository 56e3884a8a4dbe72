//! Plain-text run summary for the terminal

use crate::recommendations::recommendations;
use searchbench_core::benchmark::{RunOutcome, TrendAnalysis};
use std::fmt::Write;

pub fn render_summary(outcome: &RunOutcome) -> String {
    let report = &outcome.report;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "\nEvaluation Summary ({}, {} mode)",
        report.environment,
        report.mode.as_str()
    );
    let _ = writeln!(out, "==========================================");
    let _ = writeln!(
        out,
        "Passed:            {}/{} ({:.1}%)",
        report.passed_cases,
        report.total_cases,
        report.pass_rate * 100.0
    );
    let _ = writeln!(out, "Average score:     {:.3}", report.average_score);
    let _ = writeln!(out, "Average precision: {:.3}", report.average_precision);
    if let Some(semantic) = report
        .advanced
        .as_ref()
        .and_then(|a| a.semantic_understanding)
    {
        let _ = writeln!(out, "Semantic:          {semantic:.3}");
    }
    match report.mean_response_time() {
        Some(mean) => {
            let _ = writeln!(out, "Response time:     {mean:.3}s mean");
        }
        None => {
            let _ = writeln!(out, "Response time:     not measured");
        }
    }
    if let Some(load) = &report.performance.load {
        let _ = writeln!(
            out,
            "Concurrent load:   {}/{} succeeded, {:.1}% failure rate{}",
            load.succeeded,
            load.total,
            load.failure_rate * 100.0,
            load.mean_latency
                .map(|m| format!(", {m:.3}s mean latency"))
                .unwrap_or_default()
        );
        if let Some(delta) = load.memory_delta_bytes {
            let _ = writeln!(
                out,
                "Memory delta:      {:+.1} MiB",
                delta as f64 / (1024.0 * 1024.0)
            );
        }
    }
    let _ = writeln!(
        out,
        "Overall grade:     {} (composite {:.1})",
        report.grade, report.composite_score
    );

    let verdict = if report.gate_passed { "PASSED" } else { "FAILED" };
    let _ = writeln!(out, "\nQuality gate: {verdict}");
    for clause in &report.gate_clauses {
        let observed = clause
            .observed
            .map(|v| format!("{v:.3}"))
            .unwrap_or_else(|| "n/a".to_string());
        let _ = writeln!(
            out,
            "  [{}] {:<14} observed {observed:>7}  threshold {:.3}",
            if clause.passed { "ok" } else { "!!" },
            clause.clause.as_str(),
            clause.threshold
        );
    }

    if let Some(trend) = &outcome.trend {
        match trend {
            TrendAnalysis::InsufficientData { entries, required } => {
                let _ = writeln!(
                    out,
                    "\nTrend: insufficient data ({entries} of {required} entries)"
                );
            }
            TrendAnalysis::Analyzed {
                window_days,
                directions,
                regressions,
                ..
            } => {
                let _ = writeln!(out, "\nTrend (last {window_days} days):");
                for (metric, direction) in directions {
                    let _ = writeln!(out, "  {metric}: {}", direction.as_str());
                }
                if !regressions.is_empty() {
                    let _ = writeln!(out, "  Regression detected");
                }
            }
        }
    }

    let hints = recommendations(outcome);
    if !hints.is_empty() {
        let _ = writeln!(out, "\nRecommendations for {}:", report.environment);
        for hint in hints {
            let _ = writeln!(out, "  {hint}");
        }
    }
    out
}
