//! Cart route handlers.
//!
//! All cart state lives in Redis keyed by the caller's session; these
//! handlers resolve slugs to product ids and delegate to the cart store
//! and aggregator.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::cart::{CartSnapshot, CartStore};
use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::session::Session;
use crate::state::AppState;

/// Request body for adding a product to the cart.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub qty: u32,
}

/// Cart read response: either the priced snapshot or an explicit
/// empty-cart message (distinct from a snapshot that totals zero).
#[derive(Serialize)]
#[serde(untagged)]
pub enum CartResponse {
    Empty { message: &'static str },
    Snapshot(CartSnapshot),
}

/// Priced snapshot of the caller's cart.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Session(session): Session,
) -> Result<Json<CartResponse>> {
    let snapshot = state.aggregator().snapshot(&session).await?;

    Ok(Json(snapshot.map_or(
        CartResponse::Empty {
            message: "cart is empty",
        },
        CartResponse::Snapshot,
    )))
}

/// Add `qty` units of a product to the cart. Repeated adds accumulate.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Session(session): Session,
    Path(slug): Path<String>,
    Json(request): Json<AddToCartRequest>,
) -> Result<StatusCode> {
    let product = ProductRepository::new(state.pool())
        .by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    state.cart().add(&session, product.id, request.qty).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove one product from the cart, leaving the rest alone.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Session(session): Session,
    Path(slug): Path<String>,
) -> Result<StatusCode> {
    let product = ProductRepository::new(state.pool())
        .by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    state.cart().remove(&session, product.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Clear the caller's whole cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>, Session(session): Session) -> Result<StatusCode> {
    state.cart().clear(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}
