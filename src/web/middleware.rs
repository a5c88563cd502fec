//! HTTP middleware

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue, Method, Uri},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{Instrument, info, info_span, warn};

/// Header carrying the per-request correlation id
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Request logging middleware
///
/// Logs every request with its status and duration inside a span tagged
/// with a fresh request id, and echoes that id back as `x-request-id`.
pub async fn request_logging_middleware(
    method: Method,
    uri: Uri,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();
    let span = info_span!("http_request", %method, %uri, request_id = %request_id);

    let mut response = next.run(request).instrument(span.clone()).await;

    let status = response.status().as_u16();
    let duration_ms = start.elapsed().as_millis();

    span.in_scope(|| {
        if status >= 400 {
            warn!(status, duration_ms, "HTTP request completed with error");
        } else {
            info!(status, duration_ms, "HTTP request completed");
        }
    });

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER.clone(), value);
    }

    response
}
