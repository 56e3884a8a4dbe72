//! Metric calculators for search-quality evaluation
//!
//! This crate scores the ranked results of one query against the expectations
//! of its test case and decides whether the case passed.
//!
//! Metrics implemented:
//! - **score**: mean backend relevance score
//! - **precision**: fraction of results matching an expected category or keyword
//! - **precision@5**: rank-weighted precision over the top five results
//! - **category accuracy / keyword coverage**: expectation coverage
//! - **semantic understanding**: weighted blend for intent queries
//! - **brand accuracy / price relevance**: only for cases declaring those constraints
//! - **recall estimate / intent alignment**: heuristic coverage of the information need

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod calculators;
mod intent;
mod matching;

pub use calculators::{
    brand_accuracy, category_accuracy, intent_alignment, keyword_coverage, precision,
    precision_at_5, price_relevance, recall_estimate, score, semantic_understanding,
};
pub use intent::{detect_intents, Intent};

use searchbench_core::config::EvaluationConfig;
use searchbench_core::error::Error;
use searchbench_core::report::{CaseResult, EvaluationMode, Metric};
use searchbench_core::search_models::SearchResultItem;
use searchbench_core::test_case::{QueryType, TestCase};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// Settings that shape how a case is scored
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringOptions {
    pub mode: EvaluationMode,
    pub default_precision_floor: f64,
    pub semantic_hard_bonus: f64,
}

impl ScoringOptions {
    pub fn new(mode: EvaluationMode, config: &EvaluationConfig) -> Self {
        Self {
            mode,
            default_precision_floor: config.default_precision_floor,
            semantic_hard_bonus: config.semantic_hard_bonus,
        }
    }
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self::new(EvaluationMode::Standard, &EvaluationConfig::default())
    }
}

/// Compute every applicable metric for one case and apply the pass rule
///
/// A case passes iff its score reaches `min_score_threshold` and its precision
/// reaches the case's precision floor.
pub fn score_case(
    index: usize,
    case: &TestCase,
    results: &[SearchResultItem],
    response_time: Duration,
    options: &ScoringOptions,
) -> CaseResult {
    let mut metrics = BTreeMap::new();
    let score_value = score(results);
    let precision_value = precision(case, results);

    metrics.insert(Metric::Score, score_value);
    metrics.insert(Metric::Precision, precision_value);
    metrics.insert(Metric::CategoryAccuracy, category_accuracy(case, results));
    metrics.insert(Metric::KeywordCoverage, keyword_coverage(case, results));
    metrics.insert(Metric::ResponseTime, response_time.as_secs_f64());
    if let Some(value) = brand_accuracy(case, results) {
        metrics.insert(Metric::BrandAccuracy, value);
    }
    if let Some(value) = price_relevance(case, results) {
        metrics.insert(Metric::PriceRelevance, value);
    }

    if options.mode.is_advanced() {
        metrics.insert(Metric::PrecisionAt5, precision_at_5(case, results));
        metrics.insert(Metric::RecallEstimate, recall_estimate(case, results));
        if case.query_type == QueryType::Intent {
            metrics.insert(
                Metric::SemanticUnderstanding,
                semantic_understanding(case, results, options.semantic_hard_bonus),
            );
        }
        if let Some(value) = intent_alignment(case, results) {
            metrics.insert(Metric::IntentAlignment, value);
        }
    }

    let floor = case.effective_precision_floor(options.default_precision_floor);
    let mut failure_reasons = Vec::new();
    if results.is_empty() {
        failure_reasons.push("No results returned".to_string());
    }
    if score_value < case.min_score_threshold {
        failure_reasons.push(format!(
            "score {score_value:.3} below threshold {:.3}",
            case.min_score_threshold
        ));
    }
    if precision_value < floor {
        failure_reasons.push(format!(
            "precision {precision_value:.3} below floor {floor:.3}"
        ));
    }
    let passed = score_value >= case.min_score_threshold && precision_value >= floor;

    debug!(
        "Case {index} '{}': score={score_value:.3} precision={precision_value:.3} passed={passed}",
        case.query
    );

    CaseResult {
        index,
        query: case.query.clone(),
        description: case.description.clone(),
        difficulty: case.difficulty,
        query_type: case.query_type,
        metrics,
        passed,
        results_count: results.len(),
        top_results: results
            .iter()
            .take(3)
            .map(|r| r.product.name.clone())
            .collect(),
        failure_reasons,
        error: None,
    }
}

/// Build the failed result for a case whose search call errored
///
/// Score and precision are 0; in advanced mode the always-computed advanced
/// metrics are 0 as well so averages still cover every case.
pub fn failed_case(
    index: usize,
    case: &TestCase,
    error: &Error,
    elapsed: Duration,
    options: &ScoringOptions,
) -> CaseResult {
    let mut metrics = BTreeMap::new();
    metrics.insert(Metric::Score, 0.0);
    metrics.insert(Metric::Precision, 0.0);
    metrics.insert(Metric::CategoryAccuracy, 0.0);
    metrics.insert(Metric::KeywordCoverage, 0.0);
    metrics.insert(Metric::ResponseTime, elapsed.as_secs_f64());
    if options.mode.is_advanced() {
        metrics.insert(Metric::PrecisionAt5, 0.0);
        metrics.insert(Metric::RecallEstimate, 0.0);
        if case.query_type == QueryType::Intent {
            metrics.insert(Metric::SemanticUnderstanding, 0.0);
        }
    }

    CaseResult {
        index,
        query: case.query.clone(),
        description: case.description.clone(),
        difficulty: case.difficulty,
        query_type: case.query_type,
        metrics,
        passed: false,
        results_count: 0,
        top_results: Vec::new(),
        failure_reasons: vec![format!("search failed ({}): {error}", error.category())],
        error: Some(error.to_string()),
    }
}
