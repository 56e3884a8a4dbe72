//! JSON-over-HTTP search client

use crate::error::SearchClientError;
use crate::SearchClient;
use async_trait::async_trait;
use reqwest::Client;
use searchbench_core::config::SearchServiceConfig;
use searchbench_core::error::Result;
use searchbench_core::search_models::{
    ProductRef, SearchFilters, SearchRequest, SearchResponse, SearchResultItem,
};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Client for the search service's `POST {base_url}{search_path}` route
pub struct HttpSearchClient {
    client: Client,
    search_url: String,
    api_key: Option<String>,
}

impl HttpSearchClient {
    /// Create a new HTTP search client
    ///
    /// # Arguments
    /// * `config` - Search service configuration (URL, timeout, optional bearer token)
    pub fn new(config: &SearchServiceConfig) -> Result<Self> {
        Self::with_timeout(config, config.timeout())
    }

    /// Create a client with an explicit per-request timeout
    pub fn with_timeout(config: &SearchServiceConfig, timeout: Duration) -> Result<Self> {
        let search_url = config.search_url();
        info!("Initializing HTTP search client");
        info!("  Endpoint: {search_url}");
        info!("  Timeout: {}ms", timeout.as_millis());

        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            SearchClientError::ConfigError(format!("Failed to create HTTP client: {e}"))
        })?;

        Ok(Self {
            client,
            search_url,
            api_key: config
                .api_key
                .clone()
                .or_else(|| std::env::var("SEARCHBENCH_API_KEY").ok()),
        })
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    async fn send(
        &self,
        query: &str,
        limit: usize,
        filters: Option<&SearchFilters>,
    ) -> std::result::Result<SearchResponse, SearchClientError> {
        let body = SearchRequest {
            query: query.to_string(),
            limit,
        };

        let mut request = self.client.post(&self.search_url).json(&body);
        if let Some(filters) = filters.filter(|f| !f.is_empty()) {
            request = request.query(&filters.query_pairs());
        }
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|e| {
            let err = SearchClientError::from(e);
            warn!("Search for '{query}' failed: {err}");
            err
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            warn!("Search for '{query}' returned error {status}: {error_text}");
            return Err(SearchClientError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let text = response.text().await.map_err(SearchClientError::from)?;
        serde_json::from_str(&text).map_err(|e| {
            SearchClientError::Decode(format!("Failed to parse search response for '{query}': {e}"))
        })
    }
}

/// Convert a wire response into ranked items, repairing malformed scores
///
/// Items with a missing or non-numeric score are kept with score 0; scores
/// outside [0, 1] are clamped. Both cases are logged as metric computation errors.
pub(crate) fn convert_response(
    query: &str,
    response: SearchResponse,
    limit: usize,
) -> Vec<SearchResultItem> {
    if response.results.len() > limit {
        debug!(
            "Search for '{query}' returned {} results, truncating to {limit}",
            response.results.len()
        );
    }

    response
        .results
        .into_iter()
        .take(limit)
        .map(|wire| {
            let product = ProductRef::from(wire.product);
            let raw = wire
                .score
                .as_ref()
                .and_then(serde_json::Value::as_f64)
                .filter(|score| score.is_finite());
            let relevance_score = match raw {
                Some(score) if (0.0..=1.0).contains(&score) => score,
                Some(score) => {
                    warn!(
                        "METRIC_COMPUTATION_ERROR: score {score} for product '{}' outside [0, 1], clamping",
                        product.id
                    );
                    score.clamp(0.0, 1.0)
                }
                None => {
                    warn!(
                        "METRIC_COMPUTATION_ERROR: missing or invalid score for product '{}', using 0",
                        product.id
                    );
                    0.0
                }
            };
            SearchResultItem::new(product, relevance_score)
        })
        .collect()
}

#[async_trait]
impl SearchClient for HttpSearchClient {
    async fn search(
        &self,
        query: &str,
        limit: usize,
        filters: Option<&SearchFilters>,
    ) -> Result<Vec<SearchResultItem>> {
        let response = self.send(query, limit, filters).await?;
        let items = convert_response(query, response, limit);
        debug!("Search for '{query}' returned {} items", items.len());
        Ok(items)
    }

    fn name(&self) -> &str {
        "http"
    }
}
