//! Retail/wholesale price pair and the quantity-tiered unit price rule.
//!
//! Every product carries two prices. Which one applies to a cart line
//! depends only on the line's total quantity: orders of
//! [`WHOLESALE_MIN_QTY`] units or more of a product are charged the
//! wholesale price for the whole line, smaller orders the retail price.
//! The threshold is hard - there is no proration across the boundary, and
//! crossing it re-prices every unit in the line, not just the increment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Minimum line quantity at which the wholesale price applies.
pub const WHOLESALE_MIN_QTY: u32 = 10;

/// A product's retail/wholesale price pair.
///
/// Amounts are in the store currency's standard unit (e.g. dollars, not
/// cents), using decimal arithmetic throughout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Price per unit for small orders.
    pub retail: Decimal,
    /// Price per unit once a line reaches [`WHOLESALE_MIN_QTY`] units.
    pub wholesale: Decimal,
}

impl Price {
    /// Create a new price pair.
    #[must_use]
    pub const fn new(retail: Decimal, wholesale: Decimal) -> Self {
        Self { retail, wholesale }
    }

    /// Unit price for a line of `qty` units.
    ///
    /// Pure and total: defined for every `qty`, including 0 (which callers
    /// are expected to avoid by removing the entry instead).
    #[must_use]
    pub const fn unit_price(&self, qty: u32) -> Decimal {
        if qty < WHOLESALE_MIN_QTY {
            self.retail
        } else {
            self.wholesale
        }
    }

    /// Total for a line of `qty` units at the tiered unit price.
    #[must_use]
    pub fn line_total(&self, qty: u32) -> Decimal {
        Decimal::from(qty) * self.unit_price(qty)
    }
}
