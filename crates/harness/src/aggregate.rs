//! Reduction of per-case results into the run report

use crate::gate::evaluate_gate;
use crate::stats::{mean, percentile};
use chrono::Utc;
use searchbench_core::config::{Environment, EnvironmentProfile};
use searchbench_core::report::{
    AdvancedAverages, AggregateReport, Breakdown, BreakdownEntry, CaseResult, EvaluationMode,
    Grade, LoadSummary, Metric, PerformanceSummary,
};
use std::collections::BTreeMap;
use uuid::Uuid;

const PASS_RATE_WEIGHT: f64 = 0.5;
const PRECISION_WEIGHT: f64 = 0.3;
const PERFORMANCE_WEIGHT: f64 = 0.2;

/// Run-level inputs that are not derived from the case results
#[derive(Debug, Clone)]
pub struct RunContext {
    pub environment: Environment,
    pub mode: EvaluationMode,
    pub profile: EnvironmentProfile,
    pub git_commit: Option<String>,
}

/// 1.0 at or under the target, decaying linearly to 0.0 at three times the target
///
/// A run with no measured response time scores 0.
pub fn performance_factor(mean_response_time: Option<f64>, target_secs: f64) -> f64 {
    let Some(observed) = mean_response_time else {
        return 0.0;
    };
    if observed <= target_secs {
        1.0
    } else if observed >= target_secs * 3.0 {
        0.0
    } else {
        1.0 - (observed - target_secs) / (target_secs * 2.0)
    }
}

/// 0-100 blend of pass rate, precision and responsiveness
pub fn composite_score(
    pass_rate: f64,
    average_precision: f64,
    mean_response_time: Option<f64>,
    target_secs: f64,
) -> f64 {
    let blended = PASS_RATE_WEIGHT * pass_rate
        + PRECISION_WEIGHT * average_precision
        + PERFORMANCE_WEIGHT * performance_factor(mean_response_time, target_secs);
    (blended * 100.0).clamp(0.0, 100.0)
}

/// Build the aggregate report, including composite score, grade and gate verdict
pub fn aggregate(
    context: RunContext,
    cases: &[CaseResult],
    load: Option<LoadSummary>,
) -> AggregateReport {
    let total_cases = cases.len();
    let passed_cases = cases.iter().filter(|c| c.passed).count();
    let pass_rate = rate(passed_cases, total_cases);

    let scores: Vec<f64> = cases.iter().map(CaseResult::score).collect();
    let precisions: Vec<f64> = cases.iter().map(CaseResult::precision).collect();
    let average_score = mean(&scores).unwrap_or(0.0);
    let average_precision = mean(&precisions).unwrap_or(0.0);

    let response_times: Vec<f64> = cases.iter().filter_map(CaseResult::response_time).collect();
    let performance = PerformanceSummary {
        measured_cases: response_times.len(),
        mean_response_time: mean(&response_times),
        p95_response_time: percentile(&response_times, 95.0),
        load,
    };

    let target = context.profile.max_response_time_secs;
    let composite = composite_score(
        pass_rate,
        average_precision,
        performance.mean_response_time,
        target,
    );
    let verdict = evaluate_gate(
        pass_rate,
        average_precision,
        performance.mean_response_time,
        &context.profile,
    );

    AggregateReport {
        run_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        environment: context.environment,
        mode: context.mode,
        total_cases,
        passed_cases,
        failed_cases: total_cases - passed_cases,
        pass_rate,
        average_score,
        average_precision,
        advanced: context
            .mode
            .is_advanced()
            .then(|| advanced_averages(cases)),
        breakdown: breakdown(cases),
        performance,
        composite_score: composite,
        grade: Grade::from_composite(composite),
        gate_passed: verdict.passed,
        failed_gate_clauses: verdict.failed_clauses(),
        gate_clauses: verdict.clauses,
        git_commit: context.git_commit,
    }
}

fn rate(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

/// Mean of a metric over the cases that recorded it
fn metric_mean<'a>(cases: impl IntoIterator<Item = &'a CaseResult>, metric: Metric) -> Option<f64> {
    let values: Vec<f64> = cases.into_iter().filter_map(|c| c.metric(metric)).collect();
    mean(&values)
}

fn advanced_averages(cases: &[CaseResult]) -> AdvancedAverages {
    AdvancedAverages {
        precision_at_5: metric_mean(cases, Metric::PrecisionAt5).unwrap_or(0.0),
        category_accuracy: metric_mean(cases, Metric::CategoryAccuracy).unwrap_or(0.0),
        keyword_coverage: metric_mean(cases, Metric::KeywordCoverage).unwrap_or(0.0),
        recall_estimate: metric_mean(cases, Metric::RecallEstimate).unwrap_or(0.0),
        semantic_understanding: metric_mean(cases, Metric::SemanticUnderstanding),
        brand_accuracy: metric_mean(cases, Metric::BrandAccuracy),
        price_relevance: metric_mean(cases, Metric::PriceRelevance),
        intent_alignment: metric_mean(cases, Metric::IntentAlignment),
    }
}

fn breakdown_entry(cases: &[&CaseResult]) -> BreakdownEntry {
    let passed = cases.iter().filter(|c| c.passed).count();
    let precisions: Vec<f64> = cases.iter().map(|c| c.precision()).collect();
    BreakdownEntry {
        count: cases.len(),
        passed,
        pass_rate: rate(passed, cases.len()),
        average_precision: mean(&precisions).unwrap_or(0.0),
        average_semantic_understanding: metric_mean(
            cases.iter().copied(),
            Metric::SemanticUnderstanding,
        ),
    }
}

fn breakdown(cases: &[CaseResult]) -> Breakdown {
    let mut by_difficulty: BTreeMap<_, Vec<&CaseResult>> = BTreeMap::new();
    let mut by_query_type: BTreeMap<_, Vec<&CaseResult>> = BTreeMap::new();
    for case in cases {
        by_difficulty.entry(case.difficulty).or_default().push(case);
        by_query_type.entry(case.query_type).or_default().push(case);
    }

    Breakdown {
        by_difficulty: by_difficulty
            .into_iter()
            .map(|(key, group)| (key, breakdown_entry(&group)))
            .collect(),
        by_query_type: by_query_type
            .into_iter()
            .map(|(key, group)| (key, breakdown_entry(&group)))
            .collect(),
    }
}
