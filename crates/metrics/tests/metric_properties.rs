//! Property checks over the metric calculators

use searchbench_core::search_models::{ProductRef, SearchResultItem};
use searchbench_core::suites::{advanced_suite, standard_suite};
use searchbench_core::test_case::{Difficulty, QueryType, TestCase};
use searchbench_core::EvaluationMode;
use searchbench_metrics::{precision_at_5, score_case, ScoringOptions};
use std::time::Duration;

fn product(name: &str, category: &str) -> SearchResultItem {
    SearchResultItem::new(
        ProductRef {
            id: name.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            price: Some(42.0),
            ..Default::default()
        },
        0.75,
    )
}

/// Five results with a single relevant item at `position`
fn ranking_with_hit_at(position: usize) -> Vec<SearchResultItem> {
    (0..5)
        .map(|i| {
            if i == position {
                product("Trail Running Shoe", "Sports")
            } else {
                product("Kitchen Scale", "Home")
            }
        })
        .collect()
}

#[test]
fn test_precision_at_5_non_decreasing_as_matches_move_earlier() {
    let case = TestCase::new("running shoes", QueryType::Direct, Difficulty::Easy, 0.5)
        .with_categories(["Sports"]);

    let scores: Vec<f64> = (0..5)
        .rev()
        .map(|position| precision_at_5(&case, &ranking_with_hit_at(position)))
        .collect();

    for pair in scores.windows(2) {
        assert!(
            pair[1] >= pair[0],
            "moving the hit earlier lowered precision@5: {scores:?}"
        );
    }
}

#[test]
fn test_all_metrics_bounded_for_builtin_suites() {
    let options = ScoringOptions {
        mode: EvaluationMode::Advanced,
        ..ScoringOptions::default()
    };
    let results = vec![
        product("Wireless Headphones", "Electronics"),
        product("Organic Green Tea", "Food & Beverage"),
        product("Office Chair", "Furniture"),
        product("Fitness Tracker", "Sports"),
    ];

    for (index, case) in standard_suite()
        .iter()
        .chain(advanced_suite().iter())
        .enumerate()
    {
        let result = score_case(index, case, &results, Duration::from_millis(5), &options);
        for (metric, value) in &result.metrics {
            if metric.as_str() == "response_time" {
                continue;
            }
            assert!(
                (0.0..=1.0).contains(value),
                "{metric} out of range for '{}': {value}",
                case.query
            );
        }
    }
}
