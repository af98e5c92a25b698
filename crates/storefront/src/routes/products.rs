//! Product route handlers.
//!
//! Thin pass-through over [`ProductRepository`]; all interesting behavior
//! lives in the repository and models.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::instrument;

use crate::db::{CommentRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::models::{Comment, NewProduct, Product, ProductFilter, ProductPatch};
use crate::state::AppState;

/// Product detail payload: the product plus its approved comments.
#[derive(Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub comments: Vec<Comment>,
}

/// List products matching the query filters.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list(&filter).await?;
    Ok(Json(products))
}

/// Create a product. The slug is derived from the title.
#[instrument(skip(state, new))]
pub async fn create(
    State(state): State<AppState>,
    Json(new): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = ProductRepository::new(state.pool()).create(&new).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Product detail with its approved comments.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductDetail>> {
    let product = ProductRepository::new(state.pool())
        .by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    let comments = CommentRepository::new(state.pool())
        .approved_for(product.id)
        .await?;

    Ok(Json(ProductDetail { product, comments }))
}

/// Apply a partial update to a product.
#[instrument(skip(state, patch))]
pub async fn update(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>> {
    ProductRepository::new(state.pool())
        .update(&slug, &patch)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))
}

/// Delete a product.
#[instrument(skip(state))]
pub async fn destroy(State(state): State<AppState>, Path(slug): Path<String>) -> Result<StatusCode> {
    if ProductRepository::new(state.pool()).delete(&slug).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("product {slug}")))
    }
}
