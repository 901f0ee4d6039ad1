//! Application error carrier
//!
//! [`AppError`] is created where a failure is detected, optionally enriched
//! with details on the way up, and rendered exactly once at the HTTP
//! boundary. The code is fixed at construction time.

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

pub use mathtermind_api::ErrorCode;

/// Boxed error usable as a cause
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Structured application error
#[derive(Debug)]
pub struct AppError {
    code: ErrorCode,
    message: String,
    details: Map<String, Value>,
    cause: Option<BoxError>,
}

/// Panic payload that was not itself an error
#[derive(Error, Debug)]
#[error("panic: {0}")]
pub struct PanicMessage(pub String);

impl AppError {
    /// Create an error with empty details and no cause
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Map::new(),
            cause: None,
        }
    }

    /// Create an error that keeps `cause` for diagnostics
    pub fn wrap(cause: impl Into<BoxError>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(code, message).with_cause(cause)
    }

    /// Merge entries into the details map; later keys overwrite earlier ones
    #[must_use]
    pub fn with_details<K, V>(mut self, details: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in details {
            self.details.insert(key.into(), value.into());
        }
        self
    }

    /// Insert a single detail entry
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Attach the underlying error
    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Error category
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Structured details; empty when none were added
    #[must_use]
    pub fn details(&self) -> &Map<String, Value> {
        &self.details
    }

    /// Underlying error, if any
    #[must_use]
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Split into the parts that go on the wire
    #[must_use]
    pub fn into_parts(self) -> (ErrorCode, String, Map<String, Value>) {
        (self.code, self.message, self.details)
    }

    /// Convert a caught panic payload into an internal error
    ///
    /// Error payloads (`AppError`, `BoxError`, `io::Error`,
    /// `serde_json::Error`) become the cause; string payloads are kept as a
    /// [`PanicMessage`] so they reach the logs but never the client.
    #[must_use]
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let err = Self::new(ErrorCode::Internal, "Internal server error");

        let payload = match payload.downcast::<AppError>() {
            Ok(app) => return err.with_cause(*app),
            Err(other) => other,
        };
        let payload = match payload.downcast::<BoxError>() {
            Ok(boxed) => return err.with_cause(*boxed),
            Err(other) => other,
        };
        let payload = match payload.downcast::<std::io::Error>() {
            Ok(io) => return err.with_cause(*io),
            Err(other) => other,
        };
        let payload = match payload.downcast::<serde_json::Error>() {
            Ok(json) => return err.with_cause(*json),
            Err(other) => other,
        };
        if let Some(message) = payload.downcast_ref::<&'static str>() {
            return err.with_cause(PanicMessage((*message).to_string()));
        }
        match payload.downcast::<String>() {
            Ok(message) => err.with_cause(PanicMessage(*message)),
            Err(_) => err.with_cause(PanicMessage("non-string panic payload".to_string())),
        }
    }

    /// Resource lookup failed
    pub fn not_found(resource: impl Into<String>, id: impl Into<Value>) -> Self {
        let resource: String = resource.into();
        Self::new(ErrorCode::NotFound, "Resource not found")
            .with_detail("resource", resource)
            .with_detail("id", id)
    }

    /// Caller is not authenticated
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::Unauthorized,
            or_default(message, "You are not authorized to perform this action"),
        )
    }

    /// Caller lacks permission
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::Forbidden,
            or_default(message, "You don't have permission to access this resource"),
        )
    }

    /// Input failed validation
    pub fn validation(message: impl Into<String>, details: Map<String, Value>) -> Self {
        let mut err = Self::new(ErrorCode::Validation, message);
        err.details = details;
        err
    }

    /// Unexpected failure with its cause
    pub fn internal(message: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self::wrap(
            cause,
            ErrorCode::Internal,
            or_default(message, "An internal error occurred"),
        )
    }

    /// Database failure
    pub fn database(cause: impl Into<BoxError>) -> Self {
        Self::wrap(cause, ErrorCode::Db, "Database error")
    }

    /// Malformed request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, or_default(message, "Invalid request"))
    }
}

fn or_default(message: impl Into<String>, default: &str) -> String {
    let message = message.into();
    if message.is_empty() {
        default.to_string()
    } else {
        message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}: {} ({cause})", self.code, self.message),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

impl StdError for AppError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

/// Code of `err` if it is an [`AppError`], `None` otherwise
#[must_use]
pub fn code_of(err: &(dyn StdError + 'static)) -> Option<ErrorCode> {
    err.downcast_ref::<AppError>().map(AppError::code)
}

/// Whether `err` is an [`AppError`] carrying `code`
#[must_use]
pub fn is_code(err: &(dyn StdError + 'static), code: ErrorCode) -> bool {
    code_of(err) == Some(code)
}
