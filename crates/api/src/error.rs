//! JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use buildtrack_shared::AppError;
use serde_json::json;
use tracing::error;

/// Renders any error convertible into [`AppError`] as a JSON response.
///
/// Server-side failures are logged and their detail is not echoed back.
pub fn error_response(err: impl Into<AppError>) -> Response {
    let err = err.into();
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = if status.is_server_error() {
        error!(error = %err, "Request failed");
        "An error occurred".to_string()
    } else {
        err.message().to_string()
    };

    let body = match err.field() {
        Some(field) => json!({
            "error": err.error_code(),
            "message": message,
            "field": field,
        }),
        None => json!({
            "error": err.error_code(),
            "message": message,
        }),
    };

    (status, Json(body)).into_response()
}
