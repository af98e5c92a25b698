//! Bookmark route handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use tracing::instrument;

use crate::bookmarks::BookmarkAction;
use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::Product;
use crate::session::Session;
use crate::state::AppState;

/// Toggle response.
#[derive(Serialize)]
pub struct ToggleResponse {
    pub action: BookmarkAction,
}

/// Toggle a product in the caller's bookmark set.
#[instrument(skip(state))]
pub async fn toggle(
    State(state): State<AppState>,
    Session(session): Session,
    Path(slug): Path<String>,
) -> Result<Json<ToggleResponse>> {
    // Only existing products can be bookmarked; the set stores slugs, so
    // check before touching it.
    let product = ProductRepository::new(state.pool())
        .by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    let action = state.bookmarks().toggle(&session, &product.slug).await?;
    Ok(Json(ToggleResponse { action }))
}

/// The caller's bookmarked products.
///
/// Slugs whose product has since been deleted drop out silently.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Session(session): Session,
) -> Result<Json<Vec<Product>>> {
    let slugs = state.bookmarks().slugs(&session).await?;
    let products = ProductRepository::new(state.pool()).by_slugs(&slugs).await?;
    Ok(Json(products))
}
