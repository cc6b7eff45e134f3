//! Request extractors.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use buildtrack_shared::types::UserId;
use serde_json::{Value, json};

/// Header naming the acting user.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The acting user, taken from the optional `X-User-Id` header.
///
/// The value is recorded as creator or updater only. Nothing is authorised
/// against it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Actor(pub Option<UserId>);

impl Actor {
    /// Returns the user id, if one was supplied.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        self.0
    }
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(USER_ID_HEADER) else {
            return Ok(Self(None));
        };

        value
            .to_str()
            .ok()
            .and_then(|raw| raw.trim().parse::<UserId>().ok())
            .map(|id| Self(Some(id)))
            .ok_or_else(|| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "VALIDATION_ERROR",
                        "message": "X-User-Id must be a UUID",
                        "field": "X-User-Id",
                    })),
                )
            })
    }
}
