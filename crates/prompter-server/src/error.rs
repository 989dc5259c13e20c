//! Error types for the HTTP layer.
//!
//! [`ApiError`] unifies every per-request failure into a single enum that
//! converts into a plain-text Axum response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use prompter_core::BrokerError;

/// Errors that can occur while handling one request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request named a prompt id that does not exist.
    #[error("unknown id: {0}")]
    NotFound(String),

    /// The request body could not be parsed.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// An unexpected fault while handling the request.
    #[error("internal error: {0}")]
    Internal(String),

    /// The broker is shutting down.
    #[error("broker shutting down")]
    Unavailable,
}

impl From<BrokerError> for ApiError {
    fn from(err: BrokerError) -> Self {
        match err {
            BrokerError::NotFound(id) => Self::NotFound(id),
            BrokerError::Closed => Self::Unavailable,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, String::from("Unknown id")),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, format!("Bad Request: {msg}")),
            Self::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Server error: {msg}"),
            ),
            Self::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                String::from("Broker shutting down"),
            ),
        };

        (status, message).into_response()
    }
}
