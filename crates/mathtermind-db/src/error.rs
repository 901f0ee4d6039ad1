//! Database error types

use thiserror::Error;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// No connection string was configured
    #[error("database URL is empty")]
    MissingUrl,

    /// SQLx error (connection, query, decoding)
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for database operations
pub type Result<T> = std::result::Result<T, DatabaseError>;
