//! Application state shared across handlers.

use std::sync::Arc;

use redis::aio::ConnectionManager;
use sqlx::PgPool;

use crate::bookmarks::BookmarkStore;
use crate::cart::{CartAggregator, RedisCartStore};
use crate::checkout::Checkout;
use crate::config::StorefrontConfig;
use crate::db::{OrderRepository, ProductRepository};
use crate::payments::{PaymentError, PaymentLinkClient};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    cart: RedisCartStore,
    bookmarks: BookmarkStore,
    payments: PaymentLinkClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `pool` - `PostgreSQL` connection pool
    /// * `redis` - Established Redis connection manager
    ///
    /// # Errors
    ///
    /// Returns an error if the configured payment URLs are invalid.
    pub fn new(
        config: StorefrontConfig,
        pool: PgPool,
        redis: ConnectionManager,
    ) -> Result<Self, PaymentError> {
        let cart = RedisCartStore::new(redis.clone(), config.cart_ttl);
        let bookmarks = BookmarkStore::new(redis);
        let payments = PaymentLinkClient::new(&config.payment)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                cart,
                bookmarks,
                payments,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the Redis-backed cart store.
    #[must_use]
    pub fn cart(&self) -> &RedisCartStore {
        &self.inner.cart
    }

    /// Get a reference to the Redis-backed bookmark store.
    #[must_use]
    pub fn bookmarks(&self) -> &BookmarkStore {
        &self.inner.bookmarks
    }

    /// Get a reference to the payment-link client.
    #[must_use]
    pub fn payments(&self) -> &PaymentLinkClient {
        &self.inner.payments
    }

    /// Build a cart aggregator wired to this state's store and catalog.
    #[must_use]
    pub fn aggregator(&self) -> CartAggregator<RedisCartStore, ProductRepository<'_>> {
        CartAggregator::new(self.cart().clone(), ProductRepository::new(self.pool()))
    }

    /// Build a checkout wired to this state's collaborators.
    #[must_use]
    pub fn checkout(
        &self,
    ) -> Checkout<RedisCartStore, ProductRepository<'_>, OrderRepository<'_>, PaymentLinkClient>
    {
        Checkout::new(
            self.aggregator(),
            OrderRepository::new(self.pool()),
            self.payments().clone(),
        )
    }
}
