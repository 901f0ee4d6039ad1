//! Liveness check and the catch-all routes

use axum::http::{Method, StatusCode, Uri};
use mathtermind_core::{AppError, ErrorCode};

use crate::api::error::HandlerError;

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = String, content_type = "text/plain")),
    tag = "system"
)]
pub async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

/// Any path no route matched
pub async fn fallback(uri: Uri) -> HandlerError {
    AppError::not_found("route", uri.path()).into()
}

/// A known path requested with a method it does not serve
///
/// Rendered through the error envelope; the status is pinned to 405 since
/// no error code maps to it.
pub async fn method_not_allowed(method: Method, uri: Uri) -> (StatusCode, HandlerError) {
    let err = AppError::new(ErrorCode::Validation, "Method not allowed")
        .with_detail("method", method.as_str())
        .with_detail("path", uri.path());
    (StatusCode::METHOD_NOT_ALLOWED, err.into())
}
