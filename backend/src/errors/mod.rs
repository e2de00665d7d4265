//! Global application error types and handlers.
//!
//! Every handler returns `Result<_, ApiError>`; the `IntoResponse` impl maps
//! each variant to an HTTP status and a JSON `{"error": "..."}` body so no
//! failure escapes as an unformatted 500 page.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// No session cookie, or nothing in the jar verified. 401.
    #[error("{0}")]
    Unauthenticated(String),

    /// A verified session pointed at a record that no longer exists, or a
    /// mutation targeted an unknown member. 404.
    #[error("User not found")]
    UserNotFound,

    /// Role-hierarchy rule violation. 403.
    #[error("{0}")]
    Forbidden(String),

    /// Self-action restriction (own role/status/account). 400.
    #[error("{0}")]
    SelfAction(String),

    /// Malformed input: bad role/status value, unknown plan code, bad id. 400.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Duplicate resource, e.g. registering an email twice. 409.
    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::UserNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ApiError::SelfAction(msg) | ApiError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::Database(_) | ApiError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
