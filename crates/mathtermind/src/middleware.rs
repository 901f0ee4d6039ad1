//! Request-scoped context and the error boundary
//!
//! [`error_boundary`] wraps the whole router. For every request it:
//! - builds a [`RequestContext`] (reusing an inbound `X-Request-ID` or
//!   generating one) and stores it in the request extensions,
//! - contains panics from downstream and renders them as `INTERNAL_ERROR`,
//! - logs each failed request exactly once at error level,
//! - sets `X-Request-ID` on the response.

use std::convert::Infallible;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use axum::{
    extract::{FromRequestParts, Request},
    http::{HeaderMap, HeaderName, HeaderValue, Method, Uri, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use futures::FutureExt;
use mathtermind_core::AppError;
use tracing::{error, info};

use crate::api::error::{ErrorReport, HandlerError};

/// Response header carrying the request identifier
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

const MAX_REQUEST_ID_LEN: usize = 128;

/// Opaque per-request correlation token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    /// 8 random bytes, standard base64
    pub fn generate() -> Self {
        let bytes: [u8; 8] = rand::random();
        Self(STANDARD.encode(bytes))
    }

    /// Identifier supplied by the client, if usable
    fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(REQUEST_ID_HEADER)?.to_str().ok()?.trim();
        let usable = !value.is_empty()
            && value.len() <= MAX_REQUEST_ID_LEN
            && value.bytes().all(|b| b.is_ascii_graphic());
        usable.then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable facts about the request being served
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: RequestId,
    method: Method,
    path: String,
}

impl RequestContext {
    fn new(method: &Method, uri: &Uri, headers: &HeaderMap) -> Self {
        Self {
            request_id: RequestId::from_headers(headers).unwrap_or_else(RequestId::generate),
            method: method.clone(),
            path: uri.path().to_string(),
        }
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_else(|| RequestContext::new(&parts.method, &parts.uri, &parts.headers)))
    }
}

/// Outermost middleware: request-ID, panic containment and error logging
pub async fn error_boundary(mut request: Request, next: Next) -> Response {
    let context = RequestContext::new(request.method(), request.uri(), request.headers());
    request.extensions_mut().insert(context.clone());
    let started = Instant::now();

    let mut response = match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(mut response) => {
            if let Some(ErrorReport(report)) = response.extensions_mut().remove::<ErrorReport>() {
                log_failure(&context, &report);
            }
            response
        }
        Err(payload) => {
            let err = AppError::from_panic(payload);
            log_failure(&context, &err.to_string());
            let mut response = HandlerError::from(err).into_response();
            response.extensions_mut().remove::<ErrorReport>();
            response
        }
    };

    if let Ok(value) = HeaderValue::from_str(context.request_id().as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    info!(
        request_id = %context.request_id(),
        method = %context.method(),
        path = context.path(),
        status = response.status().as_u16(),
        duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "request completed"
    );

    response
}

fn log_failure(context: &RequestContext, report: &str) {
    error!(
        request_id = %context.request_id(),
        method = %context.method(),
        path = context.path(),
        error = report,
        "request error"
    );
}
