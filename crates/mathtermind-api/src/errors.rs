//! Error envelope returned by every failing JSON endpoint

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Machine-readable error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ErrorCode {
    /// Unexpected server-side failure
    #[serde(rename = "INTERNAL_ERROR")]
    Internal,
    /// Request input failed validation
    #[serde(rename = "VALIDATION_ERROR")]
    Validation,
    /// Requested resource does not exist
    #[serde(rename = "NOT_FOUND")]
    NotFound,
    /// Caller is authenticated but not allowed
    #[serde(rename = "FORBIDDEN")]
    Forbidden,
    /// Caller is not authenticated
    #[serde(rename = "UNAUTHORIZED")]
    Unauthorized,

    /// Generic database failure
    #[serde(rename = "DB_ERROR")]
    Db,
    /// Could not reach the database
    #[serde(rename = "DB_CONNECTION_ERROR")]
    DbConnection,
    /// A query failed
    #[serde(rename = "DB_QUERY_ERROR")]
    DbQuery,
    /// A schema migration failed
    #[serde(rename = "DB_MIGRATION_ERROR")]
    DbMigration,

    /// Generic authentication failure
    #[serde(rename = "AUTH_ERROR")]
    Auth,
    /// Login rejected
    #[serde(rename = "AUTH_LOGIN_ERROR")]
    AuthLogin,
    /// Permission check failed
    #[serde(rename = "AUTH_PERMISSION_DENIED")]
    AuthPermissionDenied,
    /// Token missing, expired or malformed
    #[serde(rename = "AUTH_TOKEN_ERROR")]
    AuthToken,

    /// A business rule was violated
    #[serde(rename = "BUSINESS_LOGIC_ERROR")]
    BusinessLogic,
    /// Operation not allowed in the current state
    #[serde(rename = "INVALID_STATE")]
    InvalidState,
    /// Feature not implemented yet
    #[serde(rename = "NOT_IMPLEMENTED")]
    NotImplemented,

    /// An upstream service failed
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalService,
}

impl ErrorCode {
    /// Every known code, in declaration order
    pub const ALL: [ErrorCode; 17] = [
        ErrorCode::Internal,
        ErrorCode::Validation,
        ErrorCode::NotFound,
        ErrorCode::Forbidden,
        ErrorCode::Unauthorized,
        ErrorCode::Db,
        ErrorCode::DbConnection,
        ErrorCode::DbQuery,
        ErrorCode::DbMigration,
        ErrorCode::Auth,
        ErrorCode::AuthLogin,
        ErrorCode::AuthPermissionDenied,
        ErrorCode::AuthToken,
        ErrorCode::BusinessLogic,
        ErrorCode::InvalidState,
        ErrorCode::NotImplemented,
        ErrorCode::ExternalService,
    ];

    /// Wire representation of the code
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Internal => "INTERNAL_ERROR",
            ErrorCode::Validation => "VALIDATION_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Db => "DB_ERROR",
            ErrorCode::DbConnection => "DB_CONNECTION_ERROR",
            ErrorCode::DbQuery => "DB_QUERY_ERROR",
            ErrorCode::DbMigration => "DB_MIGRATION_ERROR",
            ErrorCode::Auth => "AUTH_ERROR",
            ErrorCode::AuthLogin => "AUTH_LOGIN_ERROR",
            ErrorCode::AuthPermissionDenied => "AUTH_PERMISSION_DENIED",
            ErrorCode::AuthToken => "AUTH_TOKEN_ERROR",
            ErrorCode::BusinessLogic => "BUSINESS_LOGIC_ERROR",
            ErrorCode::InvalidState => "INVALID_STATE",
            ErrorCode::NotImplemented => "NOT_IMPLEMENTED",
            ErrorCode::ExternalService => "EXTERNAL_SERVICE_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error response: `{ "error": { ... } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// The error payload
    pub error: ErrorBody,
}

/// Error payload inside [`ErrorResponse`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Error category
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Structured details, omitted when empty
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    #[schema(value_type = Object)]
    pub details: Map<String, Value>,
}

impl ErrorResponse {
    /// Build an envelope from its parts
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Map<String, Value>) -> Self {
        Self {
            error: ErrorBody {
                code,
                message: message.into(),
                details,
            },
        }
    }
}
