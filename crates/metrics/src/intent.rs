//! Intent signals detected in free-text queries

use searchbench_core::search_models::SearchResultItem;

/// Shopping intent a query can express
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Gift,
    Budget,
    Premium,
    Eco,
    Fitness,
    Work,
}

impl Intent {
    pub const ALL: [Intent; 6] = [
        Intent::Gift,
        Intent::Budget,
        Intent::Premium,
        Intent::Eco,
        Intent::Fitness,
        Intent::Work,
    ];

    /// Words in a query that signal this intent
    fn query_signals(&self) -> &'static [&'static str] {
        match self {
            Self::Gift => &["gift", "present"],
            Self::Budget => &["budget", "cheap", "affordable", "under"],
            Self::Premium => &["premium", "high-end", "luxury", "best"],
            Self::Eco => &["eco", "sustainable", "organic", "green"],
            Self::Fitness => &["fitness", "workout", "exercise", "gym"],
            Self::Work => &["work", "office", "professional", "business"],
        }
    }

    /// Words in a product's text that satisfy this intent
    fn product_signals(&self) -> &'static [&'static str] {
        match self {
            Self::Gift => &["gift", "perfect", "ideal", "love"],
            Self::Budget => &["budget", "affordable", "value"],
            Self::Premium => &["premium", "luxury", "professional"],
            Self::Eco => &["eco", "organic", "sustainable", "natural"],
            Self::Fitness => &["fitness", "sport", "exercise", "health"],
            Self::Work => &["office", "work", "professional", "business"],
        }
    }

    fn satisfied_by(&self, item: &SearchResultItem) -> bool {
        let product = &item.product;
        let price = product.price;
        match self {
            Self::Budget if price.is_some_and(|p| p < 50.0) => return true,
            Self::Premium if price.is_some_and(|p| p > 200.0) => return true,
            _ => {}
        }
        let text = format!(
            "{} {} {}",
            product.name, product.description, product.category
        )
        .to_lowercase();
        self.product_signals().iter().any(|w| text.contains(w))
    }
}

/// Intents whose signal words appear in the query
pub fn detect_intents(query: &str) -> Vec<Intent> {
    let query = query.to_lowercase();
    let words: Vec<&str> = query
        .split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .filter(|w| !w.is_empty())
        .collect();

    Intent::ALL
        .into_iter()
        .filter(|intent| {
            intent.query_signals().iter().any(|signal| {
                words
                    .iter()
                    .any(|w| w == signal || w.starts_with(&format!("{signal}-")))
            })
        })
        .collect()
}

/// Fraction of the top three results satisfying one intent
pub(crate) fn alignment(intent: Intent, results: &[SearchResultItem]) -> f64 {
    let top = &results[..results.len().min(3)];
    if top.is_empty() {
        return 0.0;
    }
    let hits = top.iter().filter(|item| intent.satisfied_by(item)).count();
    hits as f64 / top.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use searchbench_core::search_models::ProductRef;

    #[test]
    fn test_detect_intents() {
        assert_eq!(
            detect_intents("thoughtful gift for someone who loves cooking"),
            vec![Intent::Gift]
        );
        assert_eq!(
            detect_intents("eco-friendly products for the home office"),
            vec![Intent::Eco, Intent::Work]
        );
        assert_eq!(
            detect_intents("premium office chair under 300 dollars"),
            vec![Intent::Budget, Intent::Premium, Intent::Work]
        );
        assert!(detect_intents("mobile phone").is_empty());
        // "for" alone is not a gift signal; "greenhouse" does not contain the word "green"
        assert!(detect_intents("greenhouse for tomatoes").is_empty());
    }

    #[test]
    fn test_alignment_uses_price_for_budget() {
        let cheap = SearchResultItem::new(
            ProductRef {
                id: "1".to_string(),
                name: "Plain mug".to_string(),
                price: Some(12.0),
                ..Default::default()
            },
            0.5,
        );
        let pricey = SearchResultItem::new(
            ProductRef {
                id: "2".to_string(),
                name: "Espresso machine".to_string(),
                price: Some(450.0),
                ..Default::default()
            },
            0.5,
        );
        let results = vec![cheap, pricey];
        assert_eq!(alignment(Intent::Budget, &results), 0.5);
        assert_eq!(alignment(Intent::Premium, &results), 0.5);
        assert_eq!(alignment(Intent::Gift, &[]), 0.0);
    }
}
