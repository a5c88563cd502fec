use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use pokedex_search::{
    config::Config,
    sources::{CatalogClient, CatalogOperation, InMemoryCatalog},
    web::{AppState, WebServer},
};

fn app_with(catalog: Arc<InMemoryCatalog>, config: &Config) -> Router {
    let client: Arc<dyn CatalogClient> = catalog;
    WebServer::create_router(AppState::new(config, client))
}

fn app(catalog: Arc<InMemoryCatalog>) -> Router {
    app_with(catalog, &Config::default())
}

// Helper function to send requests to the app
async fn send_request(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json: Value = if body_bytes.is_empty() {
        json!({})
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(json!({}))
    };

    (status, json)
}

fn result_ids(body: &Value) -> Vec<i64> {
    body["data"]["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = app(Arc::new(InMemoryCatalog::sample()));

    let (status, body) = send_request(&app, Method::GET, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
    assert!(body.get("timestamp").is_some());
}

#[tokio::test]
async fn test_root_redirects_to_search() {
    let app = app(Arc::new(InMemoryCatalog::sample()));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/api/v1/pokedex");
}

#[tokio::test]
async fn test_default_listing() {
    let app = app(Arc::new(InMemoryCatalog::sample()));

    let (status, body) = send_request(&app, Method::GET, "/api/v1/pokedex?pageSize=4").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalCount"], 12);
    assert_eq!(body["data"]["page"], 1);
    assert_eq!(body["data"]["pageSize"], 4);
    assert_eq!(result_ids(&body), vec![1, 2, 3, 4]);
    assert_eq!(body["data"]["allCategories"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_category_search_with_term() {
    let app = app(Arc::new(InMemoryCatalog::sample()));

    let (status, body) = send_request(
        &app,
        Method::GET,
        "/api/v1/pokedex?selectedType=grass&searchName=ivy",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result_ids(&body), vec![2]);
    assert_eq!(body["data"]["selectedType"], "grass");
    assert_eq!(body["data"]["searchName"], "ivy");
    assert_eq!(body["data"]["results"][0]["name"], "ivysaur");
    assert_eq!(body["data"]["results"][0]["types"], json!(["grass", "poison"]));
}

#[tokio::test]
async fn test_exact_name_ignores_paging_parameters() {
    let app = app(Arc::new(InMemoryCatalog::sample()));

    let (status, body) = send_request(
        &app,
        Method::GET,
        "/api/v1/pokedex?searchName=pikachu&page=7&pageSize=50",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result_ids(&body), vec![25]);
    assert_eq!(body["data"]["page"], 1);
    assert_eq!(body["data"]["pageSize"], 1);
    assert_eq!(body["data"]["totalCount"], 1);
}

#[tokio::test]
async fn test_out_of_range_page_is_clamped() {
    let app = app(Arc::new(InMemoryCatalog::sample()));

    let (status, body) = send_request(
        &app,
        Method::GET,
        "/api/v1/pokedex?selectedType=fire&page=40&pageSize=2",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["page"], 2);
    assert_eq!(body["data"]["totalCount"], 3);
    assert_eq!(result_ids(&body), vec![6]);
}

#[tokio::test]
async fn test_malformed_paging_falls_back_to_defaults() {
    let app = app(Arc::new(InMemoryCatalog::sample()));

    let (status, body) = send_request(
        &app,
        Method::GET,
        "/api/v1/pokedex?page=abc&pageSize=-5&searchName=",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["page"], 1);
    assert_eq!(body["data"]["pageSize"], 1);
    assert_eq!(result_ids(&body), vec![1]);
}

#[tokio::test]
async fn test_repeated_requests_hit_the_cache() {
    let catalog = Arc::new(InMemoryCatalog::sample());
    let app = app(catalog.clone());

    for _ in 0..3 {
        let (status, _) =
            send_request(&app, Method::GET, "/api/v1/pokedex?searchName=saur").await;
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(catalog.calls(CatalogOperation::CategoryLabels), 1);
    assert_eq!(catalog.calls(CatalogOperation::AllNames), 1);
    assert_eq!(catalog.calls(CatalogOperation::LiteByName), 3);
}

#[tokio::test]
async fn test_repeated_listing_is_served_without_upstream_calls() {
    let catalog = Arc::new(InMemoryCatalog::sample());
    let app = app(catalog.clone());

    send_request(&app, Method::GET, "/api/v1/pokedex?page=2&pageSize=3").await;
    let calls = catalog.total_calls();
    let (status, body) = send_request(&app, Method::GET, "/api/v1/pokedex?page=2&pageSize=3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result_ids(&body), vec![4, 5, 6]);
    assert_eq!(catalog.total_calls(), calls);
}

#[tokio::test]
async fn test_oversized_page_size_is_clamped() {
    let app = app(Arc::new(InMemoryCatalog::sample()));

    let (status, body) =
        send_request(&app, Method::GET, "/api/v1/pokedex?pageSize=99999999999").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pageSize"], 200);
    assert_eq!(result_ids(&body).len(), 12);
}

#[tokio::test]
async fn test_dot_search_term_is_an_empty_result() {
    let app = app(Arc::new(InMemoryCatalog::sample()));

    for uri in ["/api/v1/pokedex?searchName=..", "/api/v1/pokedex?searchName=."] {
        let (status, body) = send_request(&app, Method::GET, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["totalCount"], 0);
    }
}

#[tokio::test]
async fn test_catalog_failure_returns_bad_gateway() {
    let catalog = Arc::new(InMemoryCatalog::sample());
    let app = app(catalog.clone());
    catalog.fail(CatalogOperation::EntriesByCategory);

    let (status, body) =
        send_request(&app, Method::GET, "/api/v1/pokedex?selectedType=water").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("Catalog request failed"));
}

#[tokio::test]
async fn test_slow_catalog_times_out() {
    let catalog = Arc::new(InMemoryCatalog::sample().with_latency(Duration::from_millis(200)));
    let mut config = Config::default();
    config.web.request_timeout = Duration::from_millis(20);
    let app = app_with(catalog, &config);

    let (status, body) = send_request(&app, Method::GET, "/api/v1/pokedex").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("timeout"));
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = app(Arc::new(InMemoryCatalog::sample()));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let request_id = response.headers()["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(request_id).is_ok());
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = app(Arc::new(InMemoryCatalog::sample()));

    let (status, body) = send_request(&app, Method::GET, "/api/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/pokedex"].is_object());
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = app(Arc::new(InMemoryCatalog::sample()));

    let (status, _) = send_request(&app, Method::GET, "/api/v1/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
