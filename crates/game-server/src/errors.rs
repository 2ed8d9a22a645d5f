//! Game server error types.
//!
//! [`GameServerError`] is what HTTP handlers return; it maps to a status code
//! and a `{"error":{"code","message"}}` body via `IntoResponse`.
//! [`SessionError`] is what the store and registry return; handlers convert
//! it with `?`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Game server error type.
///
/// Maps to HTTP status codes:
/// - BadRequest: 400 Bad Request
/// - NotFound: 404 Not Found
/// - Conflict: 409 Conflict
/// - Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum GameServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl GameServerError {
    /// Returns the HTTP status code for this error (for metrics recording).
    pub fn status_code(&self) -> u16 {
        match self {
            GameServerError::BadRequest(_) => 400,
            GameServerError::NotFound(_) => 404,
            GameServerError::Conflict(_) => 409,
            GameServerError::Internal(_) => 500,
        }
    }
}

/// Failures from the game store and session registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("game not found")]
    NotFound,

    #[error("game is full")]
    Full,

    #[error("could not allocate a game identifier")]
    IdAllocation,
}

impl From<SessionError> for GameServerError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound => GameServerError::NotFound("Game not found".to_string()),
            SessionError::Full => GameServerError::Conflict("Game is full".to_string()),
            SessionError::IdAllocation => GameServerError::Internal(err.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for GameServerError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            GameServerError::BadRequest(reason) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", reason.clone())
            }
            GameServerError::NotFound(resource) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", resource.clone())
            }
            GameServerError::Conflict(reason) => (StatusCode::CONFLICT, "CONFLICT", reason.clone()),
            GameServerError::Internal(detail) => {
                // Log actual error server-side, return generic message to client
                tracing::error!(target: "gs.errors", error = %detail, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(error_response)).into_response()
    }
}
