//! PostgreSQL persistence layer for Mathtermind
//!
//! Provides the connection pool, embedded schema migrations and the
//! [`CourseRepository`] used by the HTTP handlers.
//!
//! # Example
//!
//! ```no_run
//! use mathtermind_db::{CourseRepository, Database, Page, PgCourseRepository};
//!
//! # async fn example() -> mathtermind_db::Result<()> {
//! let db = Database::connect("postgres://localhost/mathtermind", 10).await?;
//! db.migrate().await?;
//!
//! let courses = PgCourseRepository::new(db.pool().clone());
//! let first_page = courses.list_courses(Page { limit: 20, offset: 0 }).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod repository;
mod rows;

pub use error::{DatabaseError, Result};
pub use repository::{CourseRepository, Page, PgCourseRepository};

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

/// Database connection wrapper
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Default pool size for database connections
    pub const DEFAULT_POOL_SIZE: u32 = 10;

    /// How long a request waits for a free connection
    const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Connect to PostgreSQL
    ///
    /// # Errors
    /// Returns `DatabaseError::MissingUrl` for an empty URL, or the
    /// connection error reported by the driver
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        if url.trim().is_empty() {
            return Err(DatabaseError::MissingUrl);
        }

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Self::ACQUIRE_TIMEOUT)
            .connect(url)
            .await?;

        info!(max_connections, "connected to database");
        Ok(Self { pool })
    }

    /// Run the embedded migrations
    ///
    /// # Errors
    /// Returns `DatabaseError::Migration` if a migration fails to apply
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("database migrations applied");
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
