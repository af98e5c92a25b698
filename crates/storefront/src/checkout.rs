//! Order assembly: cart snapshot to committed order to payment link.
//!
//! One checkout attempt walks a fixed sequence - snapshot, clear, persist,
//! issue link - with no retries and no compensating actions. Each step is
//! a hard sequence point; failures propagate from wherever they happen.

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tracing::instrument;

use pawmart_core::{OrderId, OrderStatus, SessionKey};

use crate::cart::{CartAggregator, CartError, CartStore, ProductLookup};
use crate::db::RepositoryError;
use crate::models::order::{NewOrder, Recipient, RecipientError};
use crate::payments::{PaymentError, PaymentLink};

/// Errors from a checkout attempt.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Recipient rejected before anything was touched.
    #[error("invalid recipient: {0}")]
    Recipient(#[from] RecipientError),

    /// Reading or clearing the cart failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The order insert failed after the cart was already cleared. The
    /// cart contents are gone and there is no order to show for them;
    /// nothing restores the cart automatically.
    #[error("order not persisted after cart clear: {0}")]
    OrderNotPersisted(#[source] RepositoryError),

    /// The order is persisted but the provider would not issue a link.
    #[error(transparent)]
    Payment(#[from] PaymentError),
}

/// Result of a checkout attempt that did not fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The session's cart was empty; nothing was created or cleared.
    EmptyCart,
    /// The order is persisted and the payment page is ready.
    Placed {
        order_id: OrderId,
        payment_url: String,
    },
}

/// Capability to persist an assembled order.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist the order, returning its generated id.
    async fn create(&self, order: &NewOrder) -> Result<OrderId, RepositoryError>;
}

/// Orchestrates one checkout attempt per call.
pub struct Checkout<S, P, O, L> {
    cart: CartAggregator<S, P>,
    orders: O,
    payments: L,
}

impl<S, P, O, L> Checkout<S, P, O, L>
where
    S: CartStore,
    P: ProductLookup,
    O: OrderStore,
    L: PaymentLink,
{
    /// Create a checkout over a cart aggregator and its collaborators.
    pub const fn new(cart: CartAggregator<S, P>, orders: O, payments: L) -> Self {
        Self {
            cart,
            orders,
            payments,
        }
    }

    /// Convert the session's cart into an order and hand off to payment.
    ///
    /// An empty cart short-circuits to [`CheckoutOutcome::EmptyCart`]
    /// without touching the order store or the payment provider.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError`] for an invalid recipient, a failed cart
    /// or store call, or a provider refusal. See the variants for which
    /// side effects have already happened at each point.
    #[instrument(skip(self, recipient))]
    pub async fn place_order(
        &self,
        session: &SessionKey,
        recipient: Recipient,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        recipient.validate()?;

        let Some(snapshot) = self.cart.snapshot(session).await? else {
            return Ok(CheckoutOutcome::EmptyCart);
        };

        let order = NewOrder {
            items: snapshot.items,
            status: OrderStatus::Unpaid,
            created_at: Utc::now(),
            recipient,
            total_price: snapshot.grand_total,
        };

        // The cart is cleared before the order is persisted, mirroring the
        // storefront's long-standing behavior. A crash in the window
        // between the two loses the cart with no order to show for it;
        // CheckoutError::OrderNotPersisted marks the same window when the
        // insert itself fails.
        self.cart.store().clear(session).await?;

        let order_id = self
            .orders
            .create(&order)
            .await
            .map_err(CheckoutError::OrderNotPersisted)?;

        let payment_url = self.payments.issue_link(order_id, &order).await?;

        tracing::info!(%order_id, total = %order.total_price, "order placed");
        Ok(CheckoutOutcome::Placed {
            order_id,
            payment_url,
        })
    }
}
