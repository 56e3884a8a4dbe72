//! Integration tests for the HTTP search client against a local fake search service

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use searchbench_core::config::SearchServiceConfig;
use searchbench_core::search_models::{SearchFilters, SearchRequest};
use searchbench_core::ErrorCategory;
use searchbench_search_client::{HttpSearchClient, SearchClient};
use std::collections::HashMap;
use std::time::Duration;

async fn search_handler(
    Query(params): Query<HashMap<String, String>>,
    Json(request): Json<SearchRequest>,
) -> Json<serde_json::Value> {
    let results: Vec<serde_json::Value> = (0..12)
        .map(|i| {
            let name = format!("{} #{i}", request.query);
            let category = params
                .get("category")
                .cloned()
                .unwrap_or_else(|| "Electronics".to_string());
            let price = 25.0 + i as f64;
            // Item 1 omits its score to exercise the repair path
            let score = if i == 1 {
                serde_json::Value::Null
            } else {
                serde_json::json!(0.9 - i as f64 * 0.05)
            };
            serde_json::json!({
                "product": {
                    "id": i,
                    "name": name,
                    "description": "test product",
                    "category": category,
                    "price": price,
                    "brand": "Acme",
                    "rating": 4.0,
                    "stock": 3
                },
                "score": score
            })
        })
        .collect();

    Json(serde_json::json!({
        "query": request.query,
        "results": results,
        "total": 12,
        "processing_time": 0.004,
        "limit_seen": request.limit,
    }))
}

async fn failing_handler() -> (StatusCode, &'static str) {
    (StatusCode::SERVICE_UNAVAILABLE, "index rebuilding")
}

async fn slow_handler() -> Json<serde_json::Value> {
    tokio::time::sleep(Duration::from_millis(500)).await;
    Json(serde_json::json!({"results": []}))
}

async fn garbage_handler() -> &'static str {
    "<html>not json</html>"
}

/// Starts the fake service on an ephemeral port and returns its base URL
async fn spawn_fake_service() -> Result<String, Box<dyn std::error::Error>> {
    let app = Router::new()
        .route("/api/search", post(search_handler))
        .route("/broken/search", post(failing_handler))
        .route("/slow/search", post(slow_handler))
        .route("/garbage/search", post(garbage_handler));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

fn config_for(base_url: &str, search_path: &str, timeout_ms: u64) -> SearchServiceConfig {
    SearchServiceConfig {
        provider: "http".to_string(),
        base_url: base_url.to_string(),
        search_path: search_path.to_string(),
        timeout_ms,
        api_key: None,
    }
}

#[tokio::test]
async fn test_search_returns_ranked_items_truncated_to_limit(
) -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_fake_service().await?;
    let client = HttpSearchClient::new(&config_for(&base_url, "/api/search", 2_000))?;

    let items = client.search("desk lamp", 5, None).await?;

    assert_eq!(items.len(), 5);
    assert_eq!(items[0].product.id, "0");
    assert_eq!(items[0].product.name, "desk lamp #0");
    assert_eq!(items[0].product.brand.as_deref(), Some("Acme"));
    assert_eq!(items[1].relevance_score, 0.0);
    assert!(items
        .iter()
        .all(|item| (0.0..=1.0).contains(&item.relevance_score)));
    Ok(())
}

#[tokio::test]
async fn test_filters_sent_as_query_parameters() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_fake_service().await?;
    let client = HttpSearchClient::new(&config_for(&base_url, "api/search", 2_000))?;

    let filters = SearchFilters {
        category: Some("Sports".to_string()),
        min_rating: Some(4.0),
        ..Default::default()
    };
    let items = client.search("yoga mat", 3, Some(&filters)).await?;

    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|item| item.product.category == "Sports"));
    Ok(())
}

#[tokio::test]
async fn test_error_status_is_connectivity_error() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_fake_service().await?;
    let client = HttpSearchClient::new(&config_for(&base_url, "/broken/search", 2_000))?;

    let err = client
        .search("anything", 5, None)
        .await
        .err()
        .ok_or("expected an error")?;
    assert_eq!(err.category(), ErrorCategory::Connectivity);
    assert!(err.to_string().contains("503"));
    assert!(err.to_string().contains("index rebuilding"));
    Ok(())
}

#[tokio::test]
async fn test_timeout_is_connectivity_error() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_fake_service().await?;
    let client = HttpSearchClient::new(&config_for(&base_url, "/slow/search", 100))?;

    let err = client
        .search("anything", 5, None)
        .await
        .err()
        .ok_or("expected a timeout")?;
    assert!(err.is_connectivity());
    Ok(())
}

#[tokio::test]
async fn test_unreachable_service_is_connectivity_error() -> Result<(), Box<dyn std::error::Error>>
{
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let client = HttpSearchClient::new(&config_for(
        &format!("http://{addr}"),
        "/api/search",
        1_000,
    ))?;
    let err = client
        .search("anything", 5, None)
        .await
        .err()
        .ok_or("expected a connection error")?;
    assert_eq!(err.category(), ErrorCategory::Connectivity);
    Ok(())
}

#[tokio::test]
async fn test_undecodable_body_is_metric_computation_error(
) -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_fake_service().await?;
    let client = HttpSearchClient::new(&config_for(&base_url, "/garbage/search", 2_000))?;

    let err = client
        .search("anything", 5, None)
        .await
        .err()
        .ok_or("expected a decode error")?;
    assert_eq!(err.category(), ErrorCategory::MetricComputation);
    Ok(())
}
