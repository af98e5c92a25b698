//! Session-scoped bookmarks over a Redis set.
//!
//! One set per session (`bookmark:{session_key}`) holding product slugs.
//! Bookmarking is a toggle: the same request adds a slug on the first call
//! and removes it on the next.

use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use thiserror::Error;

use pawmart_core::SessionKey;

/// Errors from bookmark operations.
#[derive(Debug, Error)]
pub enum BookmarkError {
    #[error("bookmark cache error: {0}")]
    Cache(#[from] redis::RedisError),
}

/// What a toggle call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookmarkAction {
    Added,
    Removed,
}

/// Redis-backed per-session bookmark set.
#[derive(Clone)]
pub struct BookmarkStore {
    conn: ConnectionManager,
}

impl BookmarkStore {
    /// Create a store over an established connection manager.
    #[must_use]
    pub const fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    fn key(session: &SessionKey) -> String {
        format!("bookmark:{session}")
    }

    /// Toggle a slug's membership in the session's bookmark set.
    ///
    /// # Errors
    ///
    /// Returns [`BookmarkError`] if a Redis call fails.
    pub async fn toggle(
        &self,
        session: &SessionKey,
        slug: &str,
    ) -> Result<BookmarkAction, BookmarkError> {
        let key = Self::key(session);
        let mut conn = self.conn.clone();

        let bookmarked: bool = conn.sismember(&key, slug).await?;
        if bookmarked {
            let _: i64 = conn.srem(&key, slug).await?;
            Ok(BookmarkAction::Removed)
        } else {
            let _: i64 = conn.sadd(&key, slug).await?;
            Ok(BookmarkAction::Added)
        }
    }

    /// All bookmarked slugs for the session. Unknown sessions read as
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns [`BookmarkError`] if a Redis call fails.
    pub async fn slugs(&self, session: &SessionKey) -> Result<Vec<String>, BookmarkError> {
        let mut conn = self.conn.clone();
        let slugs: Vec<String> = conn.smembers(Self::key(session)).await?;
        Ok(slugs)
    }
}
