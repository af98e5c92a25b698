//! Comment repository.
//!
//! Comments are attached to products and pass through moderation before
//! they appear anywhere public.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use pawmart_core::{CommentId, CommentStatus, ProductId};

use super::RepositoryError;
use crate::models::comment::{Comment, ModerationVerdict};

const COMMENT_COLUMNS: &str = "id, product_id, body, status, created_at";

/// Repository for product comments.
pub struct CommentRepository<'a> {
    pool: &'a PgPool,
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: CommentId,
    product_id: ProductId,
    body: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CommentRow> for Comment {
    type Error = RepositoryError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        let status = CommentStatus::from_str(&row.status)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        Ok(Self {
            id: row.id,
            product_id: row.product_id,
            body: row.body,
            status,
            created_at: row.created_at,
        })
    }
}

impl<'a> CommentRepository<'a> {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Attach a new pending comment to a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including
    /// when the product does not exist; callers check first).
    pub async fn add(&self, product_id: ProductId, body: &str) -> Result<Comment, RepositoryError> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "INSERT INTO comments (product_id, body) VALUES ($1, $2) RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(product_id)
        .bind(body)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Approved comments for one product, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn approved_for(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Comment>, RepositoryError> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments \
             WHERE product_id = $1 AND status = 'approved' ORDER BY created_at"
        ))
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Comment::try_from).collect()
    }

    /// All comments still waiting for moderation, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_pending(&self) -> Result<Vec<Comment>, RepositoryError> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE status = 'pending' ORDER BY created_at"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Comment::try_from).collect()
    }

    /// Apply a moderation verdict.
    ///
    /// Returns the updated comment, or `None` if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn moderate(
        &self,
        id: CommentId,
        verdict: ModerationVerdict,
    ) -> Result<Option<Comment>, RepositoryError> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "UPDATE comments SET status = $1 WHERE id = $2 RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(verdict.resulting_status().as_str())
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Comment::try_from).transpose()
    }
}
