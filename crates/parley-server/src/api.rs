//! Shared API plumbing: the error-to-response mapping, the health
//! handler, and the JSON fallbacks for unknown routes and panics.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use parley_types::DEFAULT_SESSION_ID;
use serde_json::{json, Value};
use thiserror::Error;

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

/// Health check handler.
///
/// Returns `200 OK` with server status and version. Used by load
/// balancers, monitoring, and CI to verify the server is running.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Fallback handler for unmatched routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

/// Converts a handler panic into the blanket JSON 500 instead of a
/// dropped connection.
pub fn handle_panic(_err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    tracing::error!("request handler panicked");
    ApiError::InternalServerError("Internal server error".to_string()).into_response()
}

/// Resolves the session id for requests where the field is optional.
pub fn session_id_or_default(session_id: Option<String>) -> String {
    session_id.unwrap_or_else(|| DEFAULT_SESSION_ID.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_session_id_fills_the_gap() {
        assert_eq!(session_id_or_default(None), "default");
        assert_eq!(session_id_or_default(Some("caller-7".into())), "caller-7");
    }
}
