//! Standalone HTML report with embedded styles

use crate::escape::escape_html;
use crate::recommendations::recommendations;
use searchbench_core::benchmark::{RunOutcome, TrendAnalysis};
use searchbench_core::report::{BreakdownEntry, Metric};

pub fn to_html(outcome: &RunOutcome) -> String {
    let report = &outcome.report;
    let title = format!("searchbench report: {} ({})", report.environment, report.mode.as_str());
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(&title)));
    html.push_str("<style>\n");
    html.push_str(CSS_STYLES);
    html.push_str("</style>\n</head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape_html(&title)));

    // Headline
    let verdict = if report.gate_passed { "passed" } else { "failed" };
    html.push_str("<div class=\"summary\">\n<table>\n<tbody>\n");
    html.push_str(&format!(
        "<tr><th>Run</th><td>{} at {}</td></tr>\n",
        report.run_id,
        report.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(commit) = &report.git_commit {
        html.push_str(&format!(
            "<tr><th>Commit</th><td><code>{}</code></td></tr>\n",
            escape_html(commit)
        ));
    }
    html.push_str(&format!(
        "<tr><th>Pass rate</th><td id=\"pass-rate\" data-value=\"{}\">{}/{} ({:.1}%)</td></tr>\n",
        report.pass_rate,
        report.passed_cases,
        report.total_cases,
        report.pass_rate * 100.0
    ));
    html.push_str(&format!(
        "<tr><th>Average score</th><td>{:.3}</td></tr>\n<tr><th>Average precision</th><td>{:.3}</td></tr>\n",
        report.average_score, report.average_precision
    ));
    html.push_str(&format!(
        "<tr><th>Grade</th><td id=\"grade\" data-value=\"{grade}\"><span class=\"badge\">{grade}</span> (composite {:.1})</td></tr>\n",
        report.composite_score,
        grade = escape_html(report.grade.as_str())
    ));
    html.push_str(&format!(
        "<tr><th>Quality gate</th><td id=\"gate-passed\" data-value=\"{}\" class=\"{verdict}\">{verdict}</td></tr>\n",
        report.gate_passed
    ));
    html.push_str("</tbody>\n</table>\n</div>\n");

    // Gate clauses
    html.push_str("<h2>Quality gate</h2>\n<table>\n<thead><tr><th>Clause</th><th>Observed</th><th>Threshold</th><th>Result</th></tr></thead>\n<tbody>\n");
    for clause in &report.gate_clauses {
        let class = if clause.passed { "passed" } else { "failed" };
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{:.3}</td><td class=\"{class}\">{class}</td></tr>\n",
            clause.clause,
            clause
                .observed
                .map(|v| format!("{v:.3}"))
                .unwrap_or_else(|| "n/a".to_string()),
            clause.threshold
        ));
    }
    html.push_str("</tbody>\n</table>\n");

    // Advanced averages
    if let Some(advanced) = &report.advanced {
        html.push_str("<h2>Advanced metrics</h2>\n<table>\n<tbody>\n");
        let rows = [
            ("Precision@5", Some(advanced.precision_at_5)),
            ("Category accuracy", Some(advanced.category_accuracy)),
            ("Keyword coverage", Some(advanced.keyword_coverage)),
            ("Recall estimate", Some(advanced.recall_estimate)),
            ("Semantic understanding", advanced.semantic_understanding),
            ("Brand accuracy", advanced.brand_accuracy),
            ("Price relevance", advanced.price_relevance),
            ("Intent alignment", advanced.intent_alignment),
        ];
        for (label, value) in rows {
            if let Some(value) = value {
                html.push_str(&format!("<tr><th>{label}</th><td>{value:.3}</td></tr>\n"));
            }
        }
        html.push_str("</tbody>\n</table>\n");
    }

    // Breakdowns
    html.push_str("<h2>Breakdown</h2>\n");
    breakdown_table(
        &mut html,
        "Difficulty",
        report
            .breakdown
            .by_difficulty
            .iter()
            .map(|(k, v)| (k.as_str(), v)),
    );
    breakdown_table(
        &mut html,
        "Query type",
        report
            .breakdown
            .by_query_type
            .iter()
            .map(|(k, v)| (k.as_str(), v)),
    );

    // Performance
    let performance = &report.performance;
    html.push_str("<h2>Performance</h2>\n<table>\n<tbody>\n");
    html.push_str(&format!(
        "<tr><th>Mean response time</th><td>{}</td></tr>\n<tr><th>p95 response time</th><td>{}</td></tr>\n",
        seconds(performance.mean_response_time),
        seconds(performance.p95_response_time)
    ));
    if let Some(load) = &performance.load {
        html.push_str(&format!(
            "<tr><th>Concurrent users</th><td>{}</td></tr>\n\
             <tr><th>Load outcomes</th><td>{} succeeded, {} failed, {} timed out, {} abandoned</td></tr>\n\
             <tr><th>Load latency (mean / p95 / max)</th><td>{} / {} / {}</td></tr>\n\
             <tr><th>Load failure rate</th><td>{:.1}%</td></tr>\n",
            load.concurrent_users,
            load.succeeded,
            load.failed,
            load.timed_out,
            load.abandoned,
            seconds(load.mean_latency),
            seconds(load.p95_latency),
            seconds(load.max_latency),
            load.failure_rate * 100.0
        ));
        if let Some(delta) = load.memory_delta_bytes {
            html.push_str(&format!(
                "<tr><th>Memory delta</th><td>{:+.1} MiB</td></tr>\n",
                delta as f64 / (1024.0 * 1024.0)
            ));
        }
    }
    html.push_str("</tbody>\n</table>\n");

    // Trend
    if let Some(trend) = &outcome.trend {
        html.push_str("<h2>Trend</h2>\n");
        match trend {
            TrendAnalysis::InsufficientData { entries, required } => {
                html.push_str(&format!(
                    "<p>Insufficient history: {entries} of {required} entries in the window.</p>\n"
                ));
            }
            TrendAnalysis::Analyzed {
                entries,
                window_days,
                directions,
                regressions,
                ..
            } => {
                html.push_str(&format!(
                    "<p>{entries} entries over the last {window_days} days.</p>\n<ul>\n"
                ));
                for (metric, direction) in directions {
                    html.push_str(&format!(
                        "<li>{}: {}</li>\n",
                        escape_html(metric),
                        direction.as_str()
                    ));
                }
                html.push_str("</ul>\n");
                if !regressions.is_empty() {
                    html.push_str("<p class=\"failed\">Regression detected.</p>\n");
                }
            }
        }
    }

    // Cases
    html.push_str("<h2>Test cases</h2>\n<table>\n<thead><tr><th>#</th><th>Query</th><th>Type</th><th>Difficulty</th><th>Score</th><th>Precision</th><th>Time</th><th>Top results</th><th>Result</th></tr></thead>\n<tbody>\n");
    for case in &outcome.cases {
        let class = if case.passed { "passed" } else { "failed" };
        let mut status = class.to_string();
        if !case.failure_reasons.is_empty() {
            status = format!("{class}: {}", case.failure_reasons.join("; "));
        }
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.3}</td><td>{:.3}</td><td>{}</td><td>{}</td><td class=\"{class}\">{}</td></tr>\n",
            case.index + 1,
            escape_html(&case.query),
            case.query_type.as_str(),
            case.difficulty.as_str(),
            case.score(),
            case.metric(Metric::Precision).unwrap_or(0.0),
            seconds(case.response_time()),
            escape_html(&case.top_results.join(", ")),
            escape_html(&status)
        ));
    }
    html.push_str("</tbody>\n</table>\n");

    // Recommendations
    let hints = recommendations(outcome);
    if !hints.is_empty() {
        html.push_str("<h2>Recommendations</h2>\n<ul class=\"recommendations\">\n");
        for hint in hints {
            html.push_str(&format!("<li>{}</li>\n", escape_html(hint.trim_start())));
        }
        html.push_str("</ul>\n");
    }

    html.push_str(&format!(
        "<footer><p>Generated by searchbench {}</p></footer>\n",
        env!("CARGO_PKG_VERSION")
    ));
    html.push_str("</body>\n</html>\n");
    html
}

fn breakdown_table<'a>(
    html: &mut String,
    label: &str,
    rows: impl Iterator<Item = (&'a str, &'a BreakdownEntry)>,
) {
    html.push_str(&format!(
        "<table>\n<thead><tr><th>{label}</th><th>Cases</th><th>Pass rate</th><th>Avg precision</th><th>Avg semantic</th></tr></thead>\n<tbody>\n"
    ));
    for (name, entry) in rows {
        html.push_str(&format!(
            "<tr><td>{name}</td><td>{}</td><td>{:.1}%</td><td>{:.3}</td><td>{}</td></tr>\n",
            entry.count,
            entry.pass_rate * 100.0,
            entry.average_precision,
            entry
                .average_semantic_understanding
                .map(|v| format!("{v:.3}"))
                .unwrap_or_else(|| "n/a".to_string())
        ));
    }
    html.push_str("</tbody>\n</table>\n");
}

fn seconds(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.3}s"))
        .unwrap_or_else(|| "n/a".to_string())
}

const CSS_STYLES: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 2rem; color: #1f2933; }
h1 { border-bottom: 2px solid #3e4c59; padding-bottom: 0.5rem; }
table { border-collapse: collapse; margin: 1rem 0; min-width: 40%; }
th, td { border: 1px solid #cbd2d9; padding: 0.4rem 0.8rem; text-align: left; vertical-align: top; }
thead th { background: #f5f7fa; }
.badge { display: inline-block; padding: 0.1rem 0.5rem; border-radius: 4px; background: #3e4c59; color: #fff; font-weight: bold; }
.passed { color: #207227; font-weight: bold; }
.failed { color: #ab091e; font-weight: bold; }
.recommendations li { margin: 0.3rem 0; }
footer { margin-top: 2rem; color: #7b8794; font-size: 0.85rem; }
"#;
