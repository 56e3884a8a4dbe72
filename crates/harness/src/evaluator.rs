//! Per-case evaluation against the search service

use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use searchbench_core::report::CaseResult;
use searchbench_core::test_case::TestCase;
use searchbench_metrics::{failed_case, score_case, ScoringOptions};
use searchbench_search_client::SearchClient;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Runs each test case's query and scores the results
pub struct Evaluator {
    client: Arc<dyn SearchClient>,
    options: ScoringOptions,
    max_concurrent: usize,
}

impl Evaluator {
    pub fn new(client: Arc<dyn SearchClient>, options: ScoringOptions, max_concurrent: usize) -> Self {
        Self {
            client,
            options,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Evaluate every case; results are returned in suite order
    ///
    /// Up to `max_concurrent` searches are in flight at once. A failed search
    /// yields a failed case and never aborts the run.
    pub async fn evaluate(&self, cases: &[TestCase], progress: &ProgressBar) -> Vec<CaseResult> {
        stream::iter(cases.iter().enumerate())
            .map(|(index, case)| async move {
                let result = self.evaluate_case(index, case).await;
                progress.inc(1);
                result
            })
            .buffered(self.max_concurrent)
            .collect()
            .await
    }

    pub async fn evaluate_case(&self, index: usize, case: &TestCase) -> CaseResult {
        debug!("Evaluating case {index}: '{}'", case.query);
        let started = Instant::now();
        match self
            .client
            .search(&case.query, case.max_results, case.filters.as_ref())
            .await
        {
            Ok(results) => score_case(index, case, &results, started.elapsed(), &self.options),
            Err(e) => {
                warn!(
                    "Search failed for case {index} '{}' [{}]: {e}",
                    case.query,
                    e.category()
                );
                failed_case(index, case, &e, started.elapsed(), &self.options)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use searchbench_core::report::EvaluationMode;
    use searchbench_core::search_models::{ProductRef, SearchResultItem};
    use searchbench_core::test_case::{Difficulty, QueryType};
    use searchbench_search_client::MockSearchClient;
    use std::time::Duration;

    fn item(name: &str, category: &str) -> SearchResultItem {
        SearchResultItem::new(
            ProductRef {
                id: name.to_string(),
                name: name.to_string(),
                category: category.to_string(),
                ..Default::default()
            },
            0.9,
        )
    }

    #[tokio::test]
    async fn test_results_keep_suite_order_under_concurrency() {
        // The first case is the slowest, so it would finish last if order were not preserved
        let client = MockSearchClient::new()
            .with_response("slow", vec![item("Slow", "Books")])
            .with_delay("slow", Duration::from_millis(150))
            .with_response("medium", vec![item("Medium", "Books")])
            .with_delay("medium", Duration::from_millis(50))
            .with_response("fast", vec![item("Fast", "Books")]);
        let cases: Vec<TestCase> = ["slow", "medium", "fast"]
            .into_iter()
            .map(|q| {
                TestCase::new(q, QueryType::Direct, Difficulty::Easy, 0.5).with_categories(["Books"])
            })
            .collect();

        let evaluator = Evaluator::new(Arc::new(client), ScoringOptions::default(), 3);
        let progress = ProgressBar::hidden();
        let results = evaluator.evaluate(&cases, &progress).await;

        let queries: Vec<&str> = results.iter().map(|r| r.query.as_str()).collect();
        assert_eq!(queries, vec!["slow", "medium", "fast"]);
        assert_eq!(
            results.iter().map(|r| r.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert!(results.iter().all(|r| r.passed));
        assert_eq!(progress.position(), 3);
    }

    #[tokio::test]
    async fn test_connectivity_failure_yields_failed_case() {
        let client = MockSearchClient::new()
            .with_failure("down", "connection refused")
            .with_response("up", vec![item("Mat", "Fitness")]);
        let cases = vec![
            TestCase::new("down", QueryType::Direct, Difficulty::Easy, 0.5),
            TestCase::new("up", QueryType::Direct, Difficulty::Easy, 0.5)
                .with_categories(["Fitness"]),
        ];

        let evaluator = Evaluator::new(
            Arc::new(client),
            ScoringOptions::new(EvaluationMode::Advanced, &Default::default()),
            1,
        );
        let results = evaluator.evaluate(&cases, &ProgressBar::hidden()).await;

        assert_eq!(results.len(), 2);
        assert!(!results[0].passed);
        assert_eq!(results[0].score(), 0.0);
        assert!(results[0]
            .error
            .as_deref()
            .is_some_and(|e| e.contains("connection refused")));
        assert!(results[0].failure_reasons[0].contains("CONNECTIVITY_ERROR"));
        assert!(results[1].passed);
    }
}
