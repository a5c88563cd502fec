//! Web layer module
//!
//! HTTP interface for the Pokédex search service. Handlers are thin and
//! delegate to [`PokedexQueryService`]; every JSON response uses the
//! [`ApiResponse`] envelope.
//!
//! # Routes
//!
//! - `GET /`: redirects to the search endpoint
//! - `GET /api/v1/pokedex`: paginated search
//! - `GET /health`: liveness and cache statistics
//! - `GET /api/openapi.json`: OpenAPI document

use anyhow::Result;
use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::config::{Config, WebConfig};
use crate::services::{CatalogCache, PokedexQueryService};
use crate::sources::{CachingCatalogClient, CatalogClient};

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod responses;

pub use responses::{ApiResponse, handle_error, handle_result};

/// Path of the search endpoint
pub const POKEDEX_PATH: &str = "/api/v1/pokedex";

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub query_service: Arc<PokedexQueryService>,
    pub cache: Arc<CatalogCache>,
    /// Upper bound for a single search, upstream calls included
    pub request_timeout: Duration,
}

impl AppState {
    /// Wire the caches and query service around `client`
    pub fn new(config: &Config, client: Arc<dyn CatalogClient>) -> Self {
        let client: Arc<dyn CatalogClient> =
            Arc::new(CachingCatalogClient::new(client, &config.cache));
        let cache = Arc::new(CatalogCache::new(config.cache.clone()));
        let query_service = Arc::new(PokedexQueryService::new(
            client,
            cache.clone(),
            config.query.clone(),
            config.catalog.category_pool_max,
        ));

        Self {
            query_service,
            cache,
            request_timeout: config.web.request_timeout,
        }
    }
}

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(config: &WebConfig, state: AppState) -> Result<Self> {
        let app = Self::create_router(state);
        let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

        Ok(Self { app, addr })
    }

    /// Create the router with all routes and middleware
    pub fn create_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(handlers::index::index))
            .route("/health", get(handlers::health::health_check))
            .route(POKEDEX_PATH, get(handlers::pokedex::search_pokedex))
            .route("/api/openapi.json", get(openapi::serve_openapi_spec))
            // Middleware (applied in reverse order)
            .layer(axum::middleware::from_fn(
                middleware::request_logging_middleware,
            ))
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    /// Serve until Ctrl-C or SIGTERM, then drain in-flight requests
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        info!("Listening on http://{}", self.addr);

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Web server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down gracefully"),
        _ = terminate => info!("Received SIGTERM, shutting down gracefully"),
    }
}
