//! Order model and the priced line items shared with the cart snapshot.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use pawmart_core::{OrderId, OrderStatus};

/// One priced line of a cart snapshot or order.
///
/// `unit_price` already reflects the quantity tier, and `line_total` is
/// always `quantity * unit_price`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub title: String,
    pub slug: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
}

/// Who the order ships to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub zip_code: i32,
}

/// Recipient data rejected before any store mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecipientError {
    #[error("{0} must not be blank")]
    Blank(&'static str),
    #[error("zip code must be positive")]
    ZipCode,
}

impl Recipient {
    /// Validate the recipient fields.
    ///
    /// # Errors
    ///
    /// Returns [`RecipientError`] for blank names/city or a non-positive
    /// zip code.
    pub fn validate(&self) -> Result<(), RecipientError> {
        for (field, value) in [
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("city", &self.city),
        ] {
            if value.trim().is_empty() {
                return Err(RecipientError::Blank(field));
            }
        }
        if self.zip_code <= 0 {
            return Err(RecipientError::ZipCode);
        }
        Ok(())
    }
}

/// An order as persisted. Immutable once created, except for the payment
/// status which the provider callback updates.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<LineItem>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub recipient: Recipient,
    pub total_price: Decimal,
}

/// An order about to be persisted (no id yet).
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub items: Vec<LineItem>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub recipient: Recipient,
    pub total_price: Decimal,
}
