//! Case-insensitive matching of results against expectations

use searchbench_core::search_models::{ProductRef, SearchResultItem};
use searchbench_core::test_case::TestCase;

/// Whether the item's category is one of the expected categories
pub(crate) fn category_matches(product: &ProductRef, expected: &[String]) -> bool {
    let category = product.category.trim().to_lowercase();
    !category.is_empty()
        && expected
            .iter()
            .any(|e| e.trim().to_lowercase() == category)
}

/// Whether the item's text contains any expected keyword as a substring
pub(crate) fn keyword_matches(text: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .any(|k| !k.is_empty() && text.contains(&k))
}

/// The binary relevance criterion shared by precision and precision@5
pub(crate) fn is_relevant(case: &TestCase, item: &SearchResultItem) -> bool {
    category_matches(&item.product, &case.expected_categories)
        || keyword_matches(&item.product.search_text(), &case.expected_keywords)
}

/// Graded relevance of one item: mean of category hit, keyword fraction and price fit
///
/// Falls back to the backend score when the case carries no expectations at all.
pub(crate) fn graded_relevance(case: &TestCase, item: &SearchResultItem) -> f64 {
    let mut components = Vec::with_capacity(3);

    if !case.expected_categories.is_empty() {
        components.push(if category_matches(&item.product, &case.expected_categories) {
            1.0
        } else {
            0.0
        });
    }

    if !case.expected_keywords.is_empty() {
        let text = item.product.name_and_description();
        let hits = case
            .expected_keywords
            .iter()
            .filter(|k| text.contains(&k.trim().to_lowercase()))
            .count();
        components.push(hits as f64 / case.expected_keywords.len() as f64);
    }

    if let Some(range) = &case.price_range {
        let score = match item.product.price {
            Some(price) if price >= range.min && price <= range.max => 1.0,
            Some(price) if price <= range.max * 1.2 => 0.7,
            _ => 0.0,
        };
        components.push(score);
    }

    if components.is_empty() {
        return item.relevance_score;
    }
    components.iter().sum::<f64>() / components.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use searchbench_core::test_case::{Difficulty, QueryType};

    fn item(category: &str, name: &str, price: f64) -> SearchResultItem {
        SearchResultItem::new(
            ProductRef {
                id: name.to_string(),
                name: name.to_string(),
                category: category.to_string(),
                price: Some(price),
                ..Default::default()
            },
            0.4,
        )
    }

    #[test]
    fn test_category_match_ignores_case() {
        let expected = vec!["Home & Garden".to_string()];
        assert!(category_matches(
            &item("home & garden", "x", 1.0).product,
            &expected
        ));
        assert!(!category_matches(&item("Garden", "x", 1.0).product, &expected));
        assert!(!category_matches(&item("", "x", 1.0).product, &expected));
    }

    #[test]
    fn test_category_match_ignores_non_ascii_case() {
        let expected = vec!["Électronique".to_string()];
        assert!(category_matches(
            &item("ÉLECTRONIQUE", "x", 1.0).product,
            &expected
        ));
        assert!(category_matches(
            &item("électronique", "x", 1.0).product,
            &expected
        ));
    }

    #[test]
    fn test_graded_relevance_components() {
        let case = TestCase::new("chair", QueryType::Budget, Difficulty::Medium, 0.5)
            .with_categories(["Furniture"])
            .with_keywords(["chair", "ergonomic"])
            .with_price_range(100.0, 300.0);

        // category hit, 1 of 2 keywords, price in range
        let relevance = graded_relevance(&case, &item("Furniture", "Office Chair", 150.0));
        assert!((relevance - (1.0 + 0.5 + 1.0) / 3.0).abs() < 1e-9);

        // price within 20% over the max
        let relevance = graded_relevance(&case, &item("Furniture", "Office Chair", 350.0));
        assert!((relevance - (1.0 + 0.5 + 0.7) / 3.0).abs() < 1e-9);

        let bare = TestCase::new("anything", QueryType::Direct, Difficulty::Easy, 0.1);
        assert_eq!(graded_relevance(&bare, &item("X", "y", 1.0)), 0.4);
    }
}
