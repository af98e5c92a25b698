//! Comment route handlers: submission and moderation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::instrument;

use pawmart_core::CommentId;

use crate::db::{CommentRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::models::{Comment, ModerationVerdict};
use crate::session::Session;
use crate::state::AppState;

/// Request body for leaving a comment.
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub body: String,
}

/// Request body for moderating a comment.
#[derive(Debug, Deserialize)]
pub struct ModerateRequest {
    pub verdict: ModerationVerdict,
}

/// Leave a comment on a product. It stays hidden until approved.
#[instrument(skip(state, request))]
pub async fn create(
    State(state): State<AppState>,
    Session(_session): Session,
    Path(slug): Path<String>,
    Json(request): Json<CommentRequest>,
) -> Result<(StatusCode, Json<Comment>)> {
    let body = request.body.trim();
    if body.is_empty() {
        return Err(AppError::BadRequest(
            "comment body must not be blank".to_string(),
        ));
    }

    let product = ProductRepository::new(state.pool())
        .by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    let comment = CommentRepository::new(state.pool())
        .add(product.id, body)
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// All comments waiting for moderation.
#[instrument(skip(state))]
pub async fn pending(State(state): State<AppState>) -> Result<Json<Vec<Comment>>> {
    let comments = CommentRepository::new(state.pool()).list_pending().await?;
    Ok(Json(comments))
}

/// Approve or reject a pending comment.
#[instrument(skip(state))]
pub async fn moderate(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<ModerateRequest>,
) -> Result<Json<Comment>> {
    CommentRepository::new(state.pool())
        .moderate(CommentId::new(id), request.verdict)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("comment {id}")))
}
