//! Session-scoped shopping cart.
//!
//! Cart state lives in one Redis sorted set per session
//! (`cart:{session_key}`), mapping product ids to quantities. Additions go
//! through Redis's atomic increment, so concurrent adds for the same
//! session never lose updates; everything else about the cart is derived
//! on read by [`aggregator::CartAggregator`], which prices the raw entries
//! into a [`aggregator::CartSnapshot`].
//!
//! Carts expire with the session: every add refreshes a TTL on the set,
//! and abandoned carts are reaped by Redis alone.

pub mod aggregator;
pub mod store;

pub use aggregator::{CartAggregator, CartSnapshot};
pub use store::{CartStore, RedisCartStore};

use async_trait::async_trait;
use thiserror::Error;

use pawmart_core::ProductId;

use crate::db::RepositoryError;
use crate::models::Product;

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// A zero quantity reached the store boundary. Callers remove entries
    /// instead of setting them to zero.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// The Redis call failed. Propagated as-is, never masked as an empty
    /// cart.
    #[error("cart cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Resolving cart entries to products failed.
    #[error("product lookup failed: {0}")]
    Lookup(#[from] RepositoryError),
}

/// Batch product resolution capability the aggregator depends on.
///
/// One call per snapshot: the aggregator always resolves every id in the
/// cart at once.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    /// Resolve ids to products. Ids that no longer exist are simply absent
    /// from the result.
    async fn by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError>;
}
