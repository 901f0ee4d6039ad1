//! HTTP rendering of handler failures
//!
//! Handlers return [`ApiResult`]. Any error type converts into
//! [`HandlerError`] through `?`; an [`AppError`] keeps its code, anything
//! else is reported as `INTERNAL_ERROR` with the original message attached.

use std::error::Error as StdError;

use axum::{
    http::{HeaderValue, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use mathtermind_api::{ErrorCode, ErrorResponse};
use mathtermind_core::{AppError, BoxError};
use serde_json::{Map, Value};
use tracing::error;

/// Result type for request handlers
pub type ApiResult<T> = Result<T, HandlerError>;

/// Failure returned by a request handler
#[derive(Debug)]
pub struct HandlerError(BoxError);

impl<E> From<E> for HandlerError
where
    E: StdError + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        Self(Box::new(err))
    }
}

/// Display string of a rendered failure, left on the response for the
/// error boundary to log
#[derive(Debug, Clone)]
pub struct ErrorReport(pub String);

const FALLBACK_BODY: &str =
    r#"{"error":{"code":"INTERNAL_ERROR","message":"Internal server error"}}"#;

/// HTTP status for an error code
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Internal
        | ErrorCode::Db
        | ErrorCode::DbConnection
        | ErrorCode::DbQuery
        | ErrorCode::DbMigration
        | ErrorCode::Auth
        | ErrorCode::AuthLogin
        | ErrorCode::AuthPermissionDenied
        | ErrorCode::AuthToken
        | ErrorCode::BusinessLogic
        | ErrorCode::InvalidState
        | ErrorCode::NotImplemented
        | ErrorCode::ExternalService => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Status and envelope for any error
pub fn render(err: BoxError) -> (StatusCode, ErrorResponse) {
    match err.downcast::<AppError>() {
        Ok(app) => {
            let status = status_for(app.code());
            let (code, message, details) = app.into_parts();
            (status, ErrorResponse::new(code, message, details))
        }
        Err(other) => {
            let mut details = Map::new();
            details.insert("original_error".to_string(), Value::String(other.to_string()));
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(ErrorCode::Internal, "Internal server error", details),
            )
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let report = self.0.to_string();
        let (status, body) = render(self.0);

        // The body is encoded before the response exists; the status never changes.
        let bytes = match serde_json::to_vec(&body) {
            Ok(bytes) => bytes,
            Err(err) => {
                error!(error = %err, "failed to encode error response");
                FALLBACK_BODY.as_bytes().to_vec()
            }
        };

        let content_type = HeaderValue::from_static("application/json");
        let mut response = (status, [(CONTENT_TYPE, content_type)], bytes).into_response();
        response.extensions_mut().insert(ErrorReport(report));
        response
    }
}
