//! Database operations for the storefront `PostgreSQL`.
//!
//! # Tables
//!
//! - `products` - catalog entries with retail/wholesale prices
//! - `orders` / `order_items` - immutable checkout results
//! - `comments` - shopper comments awaiting moderation
//!
//! Cart and bookmark state never touches `PostgreSQL`; it lives in Redis
//! (see [`crate::cart`]).
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p pawmart-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod comments;
pub mod orders;
pub mod products;

pub use comments::CommentRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A row violates an invariant the schema cannot express.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Unique constraint violation (e.g. duplicate slug).
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
