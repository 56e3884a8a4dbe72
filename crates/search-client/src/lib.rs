//! Search client adapters for the external search service
//!
//! This crate provides the single query interface the harness uses to talk to
//! the search backend, plus a scripted mock for tests and dry runs.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use async_trait::async_trait;
use searchbench_core::config::SearchServiceConfig;
use searchbench_core::error::{Error, Result};
use searchbench_core::search_models::{SearchFilters, SearchResultItem};
use std::sync::Arc;
use tracing::info;

pub mod error;
mod http;
mod mock;

pub use error::SearchClientError;
pub use http::HttpSearchClient;
pub use mock::{MockResponse, MockSearchClient};

/// Trait for search service clients
///
/// Implementations issue one query and return the ranked hits, at most `limit`
/// of them. Transport failures and timeouts surface as connectivity errors; the
/// caller decides whether they fail a test case or a load sample.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Run a query against the search service
    ///
    /// # Arguments
    /// * `query` - Free-text query
    /// * `limit` - Maximum number of results requested
    /// * `filters` - Optional filters passed through to the service
    async fn search(
        &self,
        query: &str,
        limit: usize,
        filters: Option<&SearchFilters>,
    ) -> Result<Vec<SearchResultItem>>;

    /// Short provider name for logs
    fn name(&self) -> &str;
}

/// Create a new search client based on configuration
///
/// # Arguments
/// * `config` - Search service configuration including provider type
pub fn create_search_client(config: &SearchServiceConfig) -> Result<Arc<dyn SearchClient>> {
    match config.provider.as_str() {
        "http" => {
            info!("Creating HTTP search client");
            Ok(Arc::new(HttpSearchClient::new(config)?))
        }
        "mock" => {
            info!("Creating mock search client with demo catalog");
            Ok(Arc::new(MockSearchClient::with_demo_catalog()))
        }
        other => Err(Error::config(format!(
            "Unknown search provider: '{other}'. Valid providers: http, mock"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_rejects_unknown_provider() {
        let config = SearchServiceConfig {
            provider: "grpc".to_string(),
            ..Default::default()
        };
        let err = create_search_client(&config).err().unwrap();
        assert!(err.to_string().contains("Unknown search provider"));
    }

    #[test]
    fn test_factory_builds_mock() {
        let config = SearchServiceConfig {
            provider: "mock".to_string(),
            ..Default::default()
        };
        let client = create_search_client(&config).unwrap();
        assert_eq!(client.name(), "mock");
    }
}
