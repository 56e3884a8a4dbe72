//! Metric calculators
//!
//! Every calculator is a pure function of a test case and the ranked results
//! returned for its query. All values lie in [0, 1].

use crate::intent::{alignment, detect_intents};
use crate::matching::{category_matches, graded_relevance, is_relevant};
use searchbench_core::search_models::SearchResultItem;
use searchbench_core::test_case::{Difficulty, TestCase};

/// Rank weights for precision@5, highest first
const PRECISION_AT_5_WEIGHTS: [f64; 5] = [1.0, 0.8, 0.6, 0.4, 0.2];

/// Mean backend relevance score of the returned items
pub fn score(results: &[SearchResultItem]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    results.iter().map(|r| r.relevance_score).sum::<f64>() / results.len() as f64
}

/// Fraction of returned items matching an expected category or keyword
///
/// A case with neither expected categories nor keywords scores 1.0; such a
/// case makes no relevance claim.
pub fn precision(case: &TestCase, results: &[SearchResultItem]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    if case.expected_categories.is_empty() && case.expected_keywords.is_empty() {
        return 1.0;
    }
    let relevant = results.iter().filter(|r| is_relevant(case, r)).count();
    relevant as f64 / results.len() as f64
}

/// Rank-weighted precision over the top five results
///
/// Weights are normalized by the total weight of the ranks actually present,
/// so a short result list is not penalized for its length.
pub fn precision_at_5(case: &TestCase, results: &[SearchResultItem]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    if case.expected_categories.is_empty() && case.expected_keywords.is_empty() {
        return 1.0;
    }

    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    for (item, weight) in results.iter().zip(PRECISION_AT_5_WEIGHTS) {
        total_weight += weight;
        if is_relevant(case, item) {
            weighted += weight;
        }
    }
    weighted / total_weight
}

/// Fraction of the top five results whose category is expected
pub fn category_accuracy(case: &TestCase, results: &[SearchResultItem]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    if case.expected_categories.is_empty() {
        return 1.0;
    }
    let top = &results[..results.len().min(5)];
    let hits = top
        .iter()
        .filter(|r| category_matches(&r.product, &case.expected_categories))
        .count();
    hits as f64 / top.len() as f64
}

/// Fraction of expected keywords found in at least one result's name or description
pub fn keyword_coverage(case: &TestCase, results: &[SearchResultItem]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    if case.expected_keywords.is_empty() {
        return 1.0;
    }
    let texts: Vec<String> = results
        .iter()
        .map(|r| r.product.name_and_description())
        .collect();
    let covered = case
        .expected_keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| texts.iter().any(|t| t.contains(k.as_str())))
        .count();
    covered as f64 / case.expected_keywords.len() as f64
}

/// Weighted blend of category accuracy and keyword coverage for intent queries
///
/// Hard cases whose precision@5 beats their declared baseline earn `hard_bonus`.
pub fn semantic_understanding(
    case: &TestCase,
    results: &[SearchResultItem],
    hard_bonus: f64,
) -> f64 {
    let advanced = case.advanced_or_default();
    let (w_c, w_k) = (advanced.category_weight, advanced.keyword_weight);
    let total = w_c + w_k;
    if total <= 0.0 {
        return 0.0;
    }

    let blend = (w_c * category_accuracy(case, results) + w_k * keyword_coverage(case, results))
        / total;
    let bonus = if case.difficulty == Difficulty::Hard
        && precision_at_5(case, results) > advanced.precision_baseline
    {
        hard_bonus
    } else {
        0.0
    };
    (blend + bonus).clamp(0.0, 1.0)
}

/// Fraction of the top three results from an expected brand
///
/// `None` when the case declares no brand constraint.
pub fn brand_accuracy(case: &TestCase, results: &[SearchResultItem]) -> Option<f64> {
    let brands = case.expected_brands.as_ref().filter(|b| !b.is_empty())?;
    let top = &results[..results.len().min(3)];
    if top.is_empty() {
        return Some(0.0);
    }
    let expected: Vec<String> = brands.iter().map(|b| b.trim().to_lowercase()).collect();
    let hits = top
        .iter()
        .filter(|r| {
            r.product.brand.as_ref().is_some_and(|brand| {
                let brand = brand.to_lowercase();
                expected.iter().any(|e| !e.is_empty() && brand.contains(e.as_str()))
            })
        })
        .count();
    Some(hits as f64 / top.len() as f64)
}

/// Price fit of the top five results
///
/// Full credit within 20% of the declared range, half credit up to 1.5x the
/// maximum. `None` when the case declares no price constraint.
pub fn price_relevance(case: &TestCase, results: &[SearchResultItem]) -> Option<f64> {
    let range = case.price_range.as_ref()?;
    let top = &results[..results.len().min(5)];
    if top.is_empty() {
        return Some(0.0);
    }
    let (low, high) = (range.min * 0.8, range.max * 1.2);
    let credit: f64 = top
        .iter()
        .map(|r| match r.product.price {
            Some(price) if price >= low && price <= high => 1.0,
            Some(price) if price <= range.max * 1.5 => 0.5,
            _ => 0.0,
        })
        .sum();
    Some(credit / top.len() as f64)
}

/// Share of the catalog's estimated relevant items that the results cover
pub fn recall_estimate(case: &TestCase, results: &[SearchResultItem]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let relevant = results
        .iter()
        .filter(|r| graded_relevance(case, r) > 0.5)
        .count();
    let estimated_total = case.difficulty.estimated_relevant_total();
    (relevant as f64 / estimated_total as f64).min(1.0)
}

/// Mean alignment of the top three results with the intents detected in the query
///
/// `None` when the query carries no intent signal.
pub fn intent_alignment(case: &TestCase, results: &[SearchResultItem]) -> Option<f64> {
    let intents = detect_intents(&case.query);
    if intents.is_empty() {
        return None;
    }
    let total: f64 = intents.iter().map(|i| alignment(*i, results)).sum();
    Some(total / intents.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use searchbench_core::search_models::ProductRef;
    use searchbench_core::test_case::{AdvancedExpectations, QueryType};

    fn item(name: &str, category: &str, score: f64) -> SearchResultItem {
        SearchResultItem::new(
            ProductRef {
                id: name.to_string(),
                name: name.to_string(),
                category: category.to_string(),
                ..Default::default()
            },
            score,
        )
    }

    fn priced(name: &str, brand: &str, price: f64) -> SearchResultItem {
        SearchResultItem::new(
            ProductRef {
                id: name.to_string(),
                name: name.to_string(),
                brand: Some(brand.to_string()),
                price: Some(price),
                ..Default::default()
            },
            0.5,
        )
    }

    fn headphones_case() -> TestCase {
        TestCase::new("wireless headphones", QueryType::Direct, Difficulty::Easy, 0.6)
            .with_categories(["Electronics"])
            .with_keywords(["wireless", "headphone"])
    }

    #[test]
    fn test_score_is_mean_relevance() {
        let results = vec![item("a", "X", 0.9), item("b", "X", 0.5)];
        assert!((score(&results) - 0.7).abs() < 1e-9);
        assert_eq!(score(&[]), 0.0);
    }

    #[test]
    fn test_precision_category_or_keyword() {
        let case = headphones_case();
        let results = vec![
            item("Studio Monitor", "Electronics", 0.9),
            item("Wireless Earbuds", "Audio", 0.8),
            item("Desk Lamp", "Home", 0.7),
            item("Yoga Mat", "Sports", 0.6),
        ];
        assert_eq!(precision(&case, &results), 0.5);
        assert_eq!(precision(&case, &[]), 0.0);

        let open = TestCase::new("anything", QueryType::Direct, Difficulty::Easy, 0.1);
        assert_eq!(precision(&open, &results), 1.0);
    }

    #[test]
    fn test_precision_at_5_prefers_early_matches() {
        let case = headphones_case();
        let hit = || item("Wireless Headphones", "Electronics", 0.9);
        let miss = || item("Garden Hose", "Home", 0.9);

        let early = vec![hit(), miss(), miss(), miss(), miss()];
        let late = vec![miss(), miss(), miss(), miss(), hit()];
        assert!((precision_at_5(&case, &early) - 1.0 / 3.0).abs() < 1e-9);
        assert!((precision_at_5(&case, &late) - 0.2 / 3.0).abs() < 1e-9);

        // Only the ranks present count towards the normalizer
        let short = vec![hit(), miss()];
        assert!((precision_at_5(&case, &short) - 1.0 / 1.8).abs() < 1e-9);

        // Results beyond rank five are ignored
        let mut long = vec![miss(); 5];
        long.push(hit());
        assert_eq!(precision_at_5(&case, &long), 0.0);
    }

    #[test]
    fn test_category_accuracy_top_five() {
        let case = headphones_case();
        let mut results = vec![
            item("a", "Electronics", 0.5),
            item("b", "electronics", 0.5),
            item("c", "Home", 0.5),
            item("d", "Home", 0.5),
            item("e", "Home", 0.5),
        ];
        results.push(item("f", "Electronics", 0.5));
        assert!((category_accuracy(&case, &results) - 0.4).abs() < 1e-9);
        assert_eq!(category_accuracy(&case, &results[..2]), 1.0);
        assert_eq!(category_accuracy(&case, &[]), 0.0);
    }

    #[test]
    fn test_keyword_coverage_over_all_results() {
        let case = headphones_case();
        let results = vec![
            item("Wireless Speaker", "Electronics", 0.5),
            item("Lamp", "Home", 0.5),
        ];
        assert_eq!(keyword_coverage(&case, &results), 0.5);
        assert_eq!(keyword_coverage(&case, &[]), 0.0);

        let no_keywords = TestCase::new("q", QueryType::Direct, Difficulty::Easy, 0.1);
        assert_eq!(keyword_coverage(&no_keywords, &results), 1.0);
    }

    #[test]
    fn test_semantic_understanding_blend_and_bonus() {
        let case = TestCase::new(
            "gift for someone who loves cooking",
            QueryType::Intent,
            Difficulty::Hard,
            0.4,
        )
        .with_categories(["Home & Garden"])
        .with_keywords(["cooking", "chef"])
        .with_advanced(AdvancedExpectations {
            category_weight: 0.6,
            keyword_weight: 0.4,
            precision_baseline: 0.5,
        });
        let results = vec![
            item("Cooking Pan", "Home & Garden", 0.9),
            item("Chef Apron", "Clothing", 0.8),
        ];
        // category 0.5, keywords 1.0, p@5 = 1.0 beats the 0.5 baseline
        let expected = (0.6 * 0.5 + 0.4 * 1.0) + 0.1;
        assert!((semantic_understanding(&case, &results, 0.1) - expected).abs() < 1e-9);

        let mut medium = case.clone();
        medium.difficulty = Difficulty::Medium;
        assert!((semantic_understanding(&medium, &results, 0.1) - 0.7).abs() < 1e-9);

        let all_hits = vec![item("Cooking Chef Set", "Home & Garden", 0.9)];
        assert_eq!(semantic_understanding(&case, &all_hits, 0.1), 1.0);
    }

    #[test]
    fn test_brand_accuracy_only_when_declared() {
        let case = headphones_case();
        let results = vec![priced("a", "SoundWave Pro", 10.0), priced("b", "Other", 10.0)];
        assert_eq!(brand_accuracy(&case, &results), None);

        let case = headphones_case().with_brands(["soundwave"]);
        assert_eq!(brand_accuracy(&case, &results), Some(0.5));
        assert_eq!(brand_accuracy(&case, &[]), Some(0.0));
    }

    #[test]
    fn test_price_relevance_credit_bands() {
        let case = headphones_case().with_price_range(100.0, 200.0);
        let results = vec![
            priced("in range", "x", 150.0),
            priced("within 20%", "x", 230.0),
            priced("half credit", "x", 290.0),
            priced("too expensive", "x", 400.0),
        ];
        assert_eq!(price_relevance(&case, &results), Some(2.5 / 4.0));
        assert_eq!(price_relevance(&headphones_case(), &results), None);
    }

    #[test]
    fn test_recall_estimate_by_difficulty() {
        let case = headphones_case();
        let results: Vec<_> = (0..4)
            .map(|i| item(&format!("Wireless Headphone {i}"), "Electronics", 0.9))
            .collect();
        // easy cases expect 20 relevant items
        assert!((recall_estimate(&case, &results) - 0.2).abs() < 1e-9);

        let mut hard = case.clone();
        hard.difficulty = Difficulty::Hard;
        assert!((recall_estimate(&hard, &results) - 0.8).abs() < 1e-9);

        let mut many = results.clone();
        many.extend(results.clone());
        assert_eq!(recall_estimate(&hard, &many), 1.0);
    }

    #[test]
    fn test_intent_alignment_absent_without_signal() {
        let case = headphones_case();
        assert_eq!(intent_alignment(&case, &[]), None);

        let gift = TestCase::new("gift for a gardener", QueryType::Intent, Difficulty::Medium, 0.3);
        let results = vec![
            item("Perfect Gift Basket", "Food", 0.5),
            item("Shovel", "Garden", 0.5),
        ];
        assert_eq!(intent_alignment(&gift, &results), Some(0.5));
    }
}
