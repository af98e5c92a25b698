//! Session key extraction.
//!
//! The surrounding web layer issues an opaque `session_key` cookie with
//! the same lifetime as the cart TTL; this extractor only reads it.
//! Requests without the cookie are rejected: every session-scoped
//! operation needs a partition key to work against.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use pawmart_core::SessionKey;

use crate::error::AppError;

/// Extractor for the caller's [`SessionKey`].
#[derive(Debug, Clone)]
pub struct Session(pub SessionKey);

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(session_key_from_cookies)
            .map(|key| Self(SessionKey::from(key)))
            .ok_or_else(|| AppError::BadRequest("missing session_key cookie".to_string()))
    }
}

/// Pull the `session_key` value out of a `Cookie` header.
fn session_key_from_cookies(header: &str) -> Option<&str> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix("session_key="))
        .filter(|value| !value.is_empty())
}
