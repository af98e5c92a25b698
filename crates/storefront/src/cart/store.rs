//! Durable per-session cart storage over a Redis sorted set.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use pawmart_core::{ProductId, SessionKey};

use super::CartError;

/// Durable mapping from product id to quantity, partitioned by session.
///
/// Implementations must make `add` a single atomic increment against the
/// backing store: two concurrent adds for the same session and product
/// both land, never last-writer-wins.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Increment the stored quantity for a product by `qty`, creating the
    /// entry if absent.
    async fn add(&self, session: &SessionKey, product: ProductId, qty: u32)
    -> Result<(), CartError>;

    /// Delete exactly one product's entry. No effect on others; a no-op
    /// for unknown sessions.
    async fn remove(&self, session: &SessionKey, product: ProductId) -> Result<(), CartError>;

    /// Delete the session's whole cart. A no-op for unknown sessions.
    async fn clear(&self, session: &SessionKey) -> Result<(), CartError>;

    /// Point-in-time read of all entries. Unknown sessions read as empty.
    async fn entries(&self, session: &SessionKey) -> Result<Vec<(ProductId, u32)>, CartError>;
}

/// Redis-backed [`CartStore`].
///
/// One sorted set per session, product ids as members, quantities as
/// scores. ZINCRBY gives the additive, lost-update-free semantics; a TTL
/// refreshed on every add lets abandoned carts age out with the session.
#[derive(Clone)]
pub struct RedisCartStore {
    conn: ConnectionManager,
    ttl_secs: i64,
}

impl RedisCartStore {
    /// Create a store over an established connection manager.
    #[must_use]
    pub fn new(conn: ConnectionManager, ttl: std::time::Duration) -> Self {
        Self {
            conn,
            ttl_secs: i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX),
        }
    }

    fn key(session: &SessionKey) -> String {
        format!("cart:{session}")
    }
}

#[async_trait]
impl CartStore for RedisCartStore {
    async fn add(
        &self,
        session: &SessionKey,
        product: ProductId,
        qty: u32,
    ) -> Result<(), CartError> {
        if qty == 0 {
            return Err(CartError::ZeroQuantity);
        }

        let key = Self::key(session);
        let mut conn = self.conn.clone();

        let total: i64 = conn.zincr(&key, product.as_i32(), i64::from(qty)).await?;
        // Sliding expiry: any activity keeps the cart alive for one more
        // session window.
        let _: () = conn.expire(&key, self.ttl_secs).await?;

        tracing::debug!(%session, %product, qty, total, "cart entry incremented");
        Ok(())
    }

    async fn remove(&self, session: &SessionKey, product: ProductId) -> Result<(), CartError> {
        let mut conn = self.conn.clone();
        let _: i64 = conn.zrem(Self::key(session), product.as_i32()).await?;
        Ok(())
    }

    async fn clear(&self, session: &SessionKey) -> Result<(), CartError> {
        let mut conn = self.conn.clone();
        let _: i64 = conn.del(Self::key(session)).await?;
        Ok(())
    }

    async fn entries(&self, session: &SessionKey) -> Result<Vec<(ProductId, u32)>, CartError> {
        let mut conn = self.conn.clone();
        let raw: Vec<(i32, i64)> = conn.zrange_withscores(Self::key(session), 0, -1).await?;

        Ok(raw
            .into_iter()
            .map(|(id, score)| (ProductId::new(id), u32::try_from(score).unwrap_or(0)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_namespaced_by_session() {
        let session = SessionKey::from("b1946ac9");
        assert_eq!(RedisCartStore::key(&session), "cart:b1946ac9");
    }
}
