//! Request and response models for the external search service
//!
//! These types form the contract between the harness and the search backend
//! and are shared by the search client, the metric calculators and the tests.

use serde::{Deserialize, Serialize};

/// Optional filters passed through to the search service
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.min_rating.is_none()
    }

    /// Query-string pairs in the order the search route documents them
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(min_price) = self.min_price {
            pairs.push(("min_price", min_price.to_string()));
        }
        if let Some(max_price) = self.max_price {
            pairs.push(("max_price", max_price.to_string()));
        }
        if let Some(min_rating) = self.min_rating {
            pairs.push(("min_rating", min_rating.to_string()));
        }
        pairs
    }
}

/// Denormalized product fields the metric calculators inspect
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProductRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl ProductRef {
    /// Lowercased searchable text: name, description and keywords
    pub fn search_text(&self) -> String {
        let mut text = String::with_capacity(
            self.name.len() + self.description.len() + self.keywords.len() * 8,
        );
        text.push_str(&self.name);
        text.push(' ');
        text.push_str(&self.description);
        for keyword in &self.keywords {
            text.push(' ');
            text.push_str(keyword);
        }
        text.to_lowercase()
    }

    /// Lowercased name and description only
    pub fn name_and_description(&self) -> String {
        format!("{} {}", self.name, self.description).to_lowercase()
    }
}

/// One ranked hit returned by the search service
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SearchResultItem {
    pub product: ProductRef,
    /// Backend-supplied relevance in [0, 1]
    pub relevance_score: f64,
}

impl SearchResultItem {
    pub fn new(product: ProductRef, relevance_score: f64) -> Self {
        Self {
            product,
            relevance_score,
        }
    }
}

/// Body of `POST /api/search`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub limit: usize,
}

/// Product as it appears on the wire
///
/// The id may be numeric or textual depending on the catalog, and every field
/// other than the name is optional.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WireProduct {
    pub id: serde_json::Value,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub stock: Option<i64>,
}

impl From<WireProduct> for ProductRef {
    fn from(wire: WireProduct) -> Self {
        let id = match wire.id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        Self {
            id,
            name: wire.name,
            description: wire.description.unwrap_or_default(),
            category: wire.category.unwrap_or_default(),
            keywords: wire.keywords.unwrap_or_default(),
            brand: wire.brand,
            price: wire.price,
            rating: wire.rating,
        }
    }
}

/// One hit on the wire; `score` is kept loose so malformed values can be reported
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WireSearchResult {
    pub product: WireProduct,
    #[serde(default)]
    pub score: Option<serde_json::Value>,
}

/// Response of `POST /api/search`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub query: Option<String>,
    pub results: Vec<WireSearchResult>,
    #[serde(default)]
    pub total: Option<usize>,
    #[serde(default)]
    pub processing_time: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_filters_query_pairs() {
        let filters = SearchFilters {
            category: Some("Electronics".to_string()),
            max_price: Some(100.0),
            ..Default::default()
        };
        assert!(!filters.is_empty());
        assert_eq!(
            filters.query_pairs(),
            vec![
                ("category", "Electronics".to_string()),
                ("max_price", "100".to_string()),
            ]
        );
        assert!(SearchFilters::default().is_empty());
    }

    #[test]
    fn test_wire_product_numeric_id() {
        let json = r#"{
            "query": "headphones",
            "results": [
                {"product": {"id": 42, "name": "Studio Headphones", "price": 99.5,
                             "category": "Electronics", "brand": "Sonic"}, "score": 0.91}
            ],
            "total": 1,
            "processing_time": 0.012
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let wire = response.results.into_iter().next().unwrap();
        assert_eq!(wire.score.and_then(|s| s.as_f64()), Some(0.91));

        let product = ProductRef::from(wire.product);
        assert_eq!(product.id, "42");
        assert_eq!(product.category, "Electronics");
        assert_eq!(product.description, "");
        assert_eq!(product.brand.as_deref(), Some("Sonic"));
    }

    #[test]
    fn test_search_text_includes_keywords() {
        let product = ProductRef {
            id: "p1".to_string(),
            name: "Yoga Mat".to_string(),
            description: "Non-slip".to_string(),
            keywords: vec!["Fitness".to_string()],
            ..Default::default()
        };
        let text = product.search_text();
        assert!(text.contains("yoga mat"));
        assert!(text.contains("fitness"));
        assert!(!product.name_and_description().contains("fitness"));
    }
}
