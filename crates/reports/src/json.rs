//! Machine-readable JSON report

use searchbench_core::benchmark::{RunOutcome, TrendAnalysis};
use searchbench_core::error::Result;
use searchbench_core::report::{AggregateReport, CaseResult};
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    generator: String,
    #[serde(flatten)]
    report: &'a AggregateReport,
    cases: &'a [CaseResult],
    #[serde(skip_serializing_if = "Option::is_none")]
    trend: Option<&'a TrendAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    store_warning: Option<&'a str>,
}

/// Every aggregate field at the top level, followed by the per-case results and trend
pub fn to_json(outcome: &RunOutcome) -> Result<String> {
    let document = JsonReport {
        generator: format!("searchbench {}", env!("CARGO_PKG_VERSION")),
        report: &outcome.report,
        cases: &outcome.cases,
        trend: outcome.trend.as_ref(),
        store_warning: outcome.store_warning.as_deref(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}
