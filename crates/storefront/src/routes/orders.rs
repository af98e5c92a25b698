//! Order route handlers: checkout, history, and the payment callback.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use pawmart_core::{OrderId, OrderStatus};

use crate::checkout::CheckoutOutcome;
use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::models::{Order, Recipient};
use crate::session::Session;
use crate::state::AppState;

/// Request body for placing an order.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub zip_code: i32,
}

impl From<CreateOrderRequest> for Recipient {
    fn from(request: CreateOrderRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            city: request.city,
            zip_code: request.zip_code,
        }
    }
}

/// Checkout response: the payment link, or an explicit empty-cart message.
#[derive(Serialize)]
#[serde(untagged)]
pub enum CheckoutResponse {
    Empty { message: &'static str },
    Placed { order_id: OrderId, link: String },
}

/// Payment provider verdict delivered to the callback.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentVerdict {
    Success,
    Failure,
}

/// Request body of the payment provider callback.
#[derive(Debug, Deserialize)]
pub struct ConfirmPaymentRequest {
    pub status: PaymentVerdict,
}

/// Convert the caller's cart into an order and return the payment link.
#[instrument(skip(state, request))]
pub async fn create(
    State(state): State<AppState>,
    Session(session): Session,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Json<CheckoutResponse>> {
    let outcome = state
        .checkout()
        .place_order(&session, request.into())
        .await?;

    Ok(Json(match outcome {
        CheckoutOutcome::EmptyCart => CheckoutResponse::Empty {
            message: "cart is empty",
        },
        CheckoutOutcome::Placed {
            order_id,
            payment_url,
        } => CheckoutResponse::Placed {
            order_id,
            link: payment_url,
        },
    }))
}

/// Order history, newest first.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool()).list().await?;
    Ok(Json(orders))
}

/// One order with its line items.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Order>> {
    OrderRepository::new(state.pool())
        .get(OrderId::new(id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))
}

/// Landing page the payment provider redirects the shopper back to.
pub async fn success() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "thank you for your purchase" }))
}

/// Payment provider callback: records the payment verdict on the order.
#[instrument(skip(state))]
pub async fn confirm(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<ConfirmPaymentRequest>,
) -> Result<StatusCode> {
    let status = match request.status {
        PaymentVerdict::Success => OrderStatus::Paid,
        PaymentVerdict::Failure => OrderStatus::Failed,
    };

    if OrderRepository::new(state.pool())
        .set_status(OrderId::new(id), status)
        .await?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("order {id}")))
    }
}
