//! Payment-link collaborator.
//!
//! The provider hosts the actual checkout page. We POST the order's id,
//! amount and description to its checkout endpoint and hand the resulting
//! page URL back to the shopper. Gateway signing is the provider SDK's
//! business, not ours; this client sends the public key only.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use pawmart_core::OrderId;

use crate::config::PaymentConfig;
use crate::models::order::NewOrder;

/// Errors from the payment provider.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned a non-success status.
    #[error("payment api error: status {status}")]
    Api { status: u16 },

    /// Configured endpoint or result URL does not parse.
    #[error("invalid payment url: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Capability to exchange a persisted order for a hosted payment URL.
#[async_trait]
pub trait PaymentLink: Send + Sync {
    /// Request a payment link for the given persisted order.
    async fn issue_link(&self, order_id: OrderId, order: &NewOrder) -> Result<String, PaymentError>;
}

/// HTTP client for the payment provider's checkout endpoint.
#[derive(Clone)]
pub struct PaymentLinkClient {
    inner: Arc<PaymentLinkClientInner>,
}

struct PaymentLinkClientInner {
    client: reqwest::Client,
    checkout_url: Url,
    result_url: Url,
    public_key: String,
    currency: String,
}

impl PaymentLinkClient {
    /// Create a new payment-link client.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::Endpoint`] if a configured URL is invalid.
    pub fn new(config: &PaymentConfig) -> Result<Self, PaymentError> {
        Ok(Self {
            inner: Arc::new(PaymentLinkClientInner {
                client: reqwest::Client::new(),
                checkout_url: Url::parse(&config.checkout_url)?,
                result_url: Url::parse(&config.result_url)?,
                public_key: config.public_key.clone(),
                currency: config.currency.clone(),
            }),
        })
    }
}

#[async_trait]
impl PaymentLink for PaymentLinkClient {
    async fn issue_link(
        &self,
        order_id: OrderId,
        order: &NewOrder,
    ) -> Result<String, PaymentError> {
        let description = format!(
            "Order by {} {}",
            order.recipient.first_name, order.recipient.last_name
        );
        let params = [
            ("public_key", self.inner.public_key.clone()),
            ("action", "pay".to_string()),
            ("order_id", order_id.to_string()),
            ("amount", order.total_price.to_string()),
            ("currency", self.inner.currency.clone()),
            ("description", description),
            ("result_url", self.inner.result_url.to_string()),
        ];

        let response = self
            .inner
            .client
            .post(self.inner.checkout_url.clone())
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PaymentError::Api {
                status: status.as_u16(),
            });
        }

        // The provider answers with a redirect chain ending at the hosted
        // checkout page; that final URL is the link the shopper follows.
        Ok(response.url().to_string())
    }
}
