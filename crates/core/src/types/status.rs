//! Status enums for orders and comments.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A status string from the database did not match any known variant.
#[derive(Debug, Error)]
#[error("invalid {kind} status: {value}")]
pub struct InvalidStatus {
    kind: &'static str,
    value: String,
}

/// Order payment status.
///
/// Orders are created `Unpaid` and move to `Paid` when the payment
/// provider confirms the checkout. `Failed` records a rejected payment;
/// the order itself stays immutable either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Unpaid,
    Paid,
    Failed,
}

impl OrderStatus {
    /// Stable string form, as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(Self::Unpaid),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            _ => Err(InvalidStatus {
                kind: "order",
                value: s.to_string(),
            }),
        }
    }
}

/// Comment moderation status.
///
/// New comments start `Pending`; only `Approved` comments are shown on
/// product pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CommentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl CommentStatus {
    /// Stable string form, as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CommentStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(InvalidStatus {
                kind: "comment",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_order_status_roundtrip() {
        for status in [OrderStatus::Unpaid, OrderStatus::Paid, OrderStatus::Failed] {
            assert_eq!(OrderStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_order_status_rejects_unknown() {
        let err = OrderStatus::from_str("shipped").unwrap_err();
        assert!(err.to_string().contains("shipped"));
    }

    #[test]
    fn test_comment_status_roundtrip() {
        for status in [
            CommentStatus::Pending,
            CommentStatus::Approved,
            CommentStatus::Rejected,
        ] {
            assert_eq!(CommentStatus::from_str(status.as_str()).unwrap(), status);
        }
    }
}
