//! Health check HTTP handlers

use axum::{extract::State, response::IntoResponse};

use crate::web::{
    AppState,
    responses::{ApiResponse, HealthResponse, ok},
};

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = ApiResponse<HealthResponse>),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    ok(HealthResponse::healthy(state.cache.entry_count().await))
}
