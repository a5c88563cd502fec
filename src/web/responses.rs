//! HTTP response types and utilities
//!
//! Every JSON endpoint answers with the same [`ApiResponse`] envelope, and
//! [`handle_error`] is the single place where application errors become
//! HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::errors::{AppError, AppResult};

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Whether the operation was successful
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Response timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(message: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Service liveness report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Live entries in the catalog cache
    pub cache_entries: u64,
}

impl HealthResponse {
    pub fn healthy(cache_entries: u64) -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            cache_entries,
        }
    }
}

/// Convert an AppResult into an HTTP response
pub fn handle_result<T>(result: AppResult<T>) -> Response
where
    T: Serialize,
{
    match result {
        Ok(data) => ok(data).into_response(),
        Err(error) => handle_error(error).into_response(),
    }
}

/// Map an AppError to its HTTP status and error envelope
pub fn handle_error(error: AppError) -> impl IntoResponse {
    let (status, message) = match &error {
        AppError::Catalog(catalog_error) => (
            StatusCode::BAD_GATEWAY,
            format!("Catalog request failed: {catalog_error}"),
        ),
        AppError::Configuration { message } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Configuration error: {message}"),
        ),
        AppError::Internal { message } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal error: {message}"),
        ),
    };

    error!(status = status.as_u16(), "Request failed: {}", error);

    (status, Json(ApiResponse::<()>::error(message)))
}

pub fn ok<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::OK, Json(ApiResponse::success(data)))
}
