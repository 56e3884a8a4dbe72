//! Scripted search client for tests and dry runs

use crate::error::SearchClientError;
use crate::SearchClient;
use async_trait::async_trait;
use searchbench_core::error::Result;
use searchbench_core::search_models::{ProductRef, SearchFilters, SearchResultItem};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Scripted behavior for one query
#[derive(Debug, Clone, Default)]
pub struct MockResponse {
    pub items: Vec<SearchResultItem>,
    pub delay: Duration,
    pub failure: Option<String>,
}

/// Mock search client returning scripted responses per query
///
/// Queries without a script fall back to the catalog (when one is set), ranking
/// products by how many query words appear in their text.
#[derive(Debug, Default)]
pub struct MockSearchClient {
    responses: HashMap<String, MockResponse>,
    catalog: Vec<ProductRef>,
    default_delay: Duration,
    calls: AtomicUsize,
}

impl MockSearchClient {
    /// Create an empty mock that answers every query with no results
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock backed by a small built-in product catalog
    pub fn with_demo_catalog() -> Self {
        Self::new().with_catalog(demo_catalog())
    }

    pub fn with_catalog(mut self, catalog: Vec<ProductRef>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_response(mut self, query: impl Into<String>, items: Vec<SearchResultItem>) -> Self {
        self.responses.entry(query.into()).or_default().items = items;
        self
    }

    pub fn with_delay(mut self, query: impl Into<String>, delay: Duration) -> Self {
        self.responses.entry(query.into()).or_default().delay = delay;
        self
    }

    pub fn with_failure(mut self, query: impl Into<String>, message: impl Into<String>) -> Self {
        self.responses.entry(query.into()).or_default().failure = Some(message.into());
        self
    }

    /// Delay applied to queries without their own script
    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    /// Number of search calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn search_catalog(
        &self,
        query: &str,
        limit: usize,
        filters: Option<&SearchFilters>,
    ) -> Vec<SearchResultItem> {
        let words: Vec<String> = query
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() > 2)
            .map(str::to_lowercase)
            .collect();
        if words.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<SearchResultItem> = self
            .catalog
            .iter()
            .filter(|product| matches_filters(product, filters))
            .filter_map(|product| {
                let text = product.search_text();
                let hits = words.iter().filter(|w| text.contains(w.as_str())).count();
                (hits > 0).then(|| {
                    SearchResultItem::new(product.clone(), hits as f64 / words.len() as f64)
                })
            })
            .collect();

        scored.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
        scored.truncate(limit);
        scored
    }
}

fn matches_filters(product: &ProductRef, filters: Option<&SearchFilters>) -> bool {
    let Some(filters) = filters else {
        return true;
    };
    if let Some(category) = &filters.category {
        if !product.category.eq_ignore_ascii_case(category) {
            return false;
        }
    }
    let price = product.price.unwrap_or(0.0);
    if filters.min_price.is_some_and(|min| price < min) {
        return false;
    }
    if filters.max_price.is_some_and(|max| price > max) {
        return false;
    }
    if let Some(min_rating) = filters.min_rating {
        if product.rating.unwrap_or(0.0) < min_rating {
            return false;
        }
    }
    true
}

#[async_trait]
impl SearchClient for MockSearchClient {
    async fn search(
        &self,
        query: &str,
        limit: usize,
        filters: Option<&SearchFilters>,
    ) -> Result<Vec<SearchResultItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.responses.get(query) {
            Some(script) => {
                if !script.delay.is_zero() {
                    tokio::time::sleep(script.delay).await;
                }
                if let Some(message) = &script.failure {
                    return Err(SearchClientError::Transport(message.clone()).into());
                }
                Ok(script.items.iter().take(limit).cloned().collect())
            }
            None => {
                if !self.default_delay.is_zero() {
                    tokio::time::sleep(self.default_delay).await;
                }
                Ok(self.search_catalog(query, limit, filters))
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

fn product(
    id: &str,
    name: &str,
    description: &str,
    category: &str,
    brand: &str,
    price: f64,
    keywords: &[&str],
) -> ProductRef {
    ProductRef {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        brand: Some(brand.to_string()),
        price: Some(price),
        rating: Some(4.5),
    }
}

fn demo_catalog() -> Vec<ProductRef> {
    vec![
        product(
            "1",
            "Wireless Bluetooth Headphones",
            "Over-ear audio with noise cancelling",
            "Electronics",
            "SoundWave",
            129.0,
            &["headphone", "wireless", "bluetooth", "audio"],
        ),
        product(
            "2",
            "Sport Earbuds",
            "Sweat-proof wireless earbuds for running",
            "Electronics",
            "SoundWave",
            59.0,
            &["running", "sport", "wireless"],
        ),
        product(
            "3",
            "Fitness Tracker Watch",
            "Heart rate and workout tracking",
            "Sports",
            "FitPro",
            89.0,
            &["fitness", "tracker", "watch", "exercise", "gym"],
        ),
        product(
            "4",
            "Ergonomic Office Chair",
            "Comfortable desk chair for long hours",
            "Furniture",
            "SitWell",
            249.0,
            &["chair", "office", "ergonomic", "desk"],
        ),
        product(
            "5",
            "Standing Desk",
            "Adjustable desk for a home office setup",
            "Furniture",
            "SitWell",
            399.0,
            &["desk", "office", "work"],
        ),
        product(
            "6",
            "Bamboo Cooking Utensils",
            "Sustainable eco-friendly kitchen set",
            "Home & Garden",
            "GreenLeaf",
            24.0,
            &["eco", "sustainable", "kitchen", "cooking"],
        ),
        product(
            "7",
            "Organic Matcha Powder",
            "Japanese green tea, ceremonial grade",
            "Food & Beverage",
            "Kyoto Leaf",
            32.0,
            &["tea", "green", "matcha", "japanese", "organic"],
        ),
        product(
            "8",
            "Budget Smartphone",
            "Affordable mobile phone with great battery",
            "Electronics",
            "Nova",
            99.0,
            &["phone", "mobile", "smartphone", "cell", "tech"],
        ),
        product(
            "9",
            "Folding Yoga Mat",
            "Compact exercise mat for small apartments",
            "Sports",
            "FitPro",
            35.0,
            &["fitness", "compact", "exercise", "small", "apartment"],
        ),
        product(
            "10",
            "Chef Knife Gift Set",
            "Culinary knives for anyone who loves cooking",
            "Home & Garden",
            "Edge",
            79.0,
            &["chef", "culinary", "cooking", "kitchen", "gift"],
        ),
    ]
}
