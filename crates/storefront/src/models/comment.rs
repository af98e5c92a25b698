//! Product comments and their moderation verdicts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pawmart_core::{CommentId, CommentStatus, ProductId};

/// A shopper comment on a product.
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub product_id: ProductId,
    pub body: String,
    pub status: CommentStatus,
    pub created_at: DateTime<Utc>,
}

/// Moderator decision on a pending comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationVerdict {
    Approve,
    Reject,
}

impl ModerationVerdict {
    /// The status a comment ends up in after this verdict.
    #[must_use]
    pub const fn resulting_status(self) -> CommentStatus {
        match self {
            Self::Approve => CommentStatus::Approved,
            Self::Reject => CommentStatus::Rejected,
        }
    }
}
