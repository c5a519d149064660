use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use crate::envelope::Envelope;

/// Every handler failure maps onto one of these; the transport layer renders
/// them as a failure envelope with the matching status code.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input. Always 400.
    #[error("{0}")]
    Validation(String),
    /// Uniqueness violation caught by an explicit pre-check. 400.
    #[error("{0}")]
    Conflict(String),
    /// Unknown email and wrong password share this message on purpose.
    #[error("Invalid email or password")]
    InvalidCredentials,
    /// Referenced entity absent. 404.
    #[error("{0}")]
    NotFound(String),
    /// Persistence-store failure. 500, detail logged but never returned.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    /// Anything else unexpected (e.g. password hashing). 500.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(m) | ApiError::Conflict(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::InvalidCredentials => {
                (StatusCode::BAD_REQUEST, "Invalid email or password".into())
            }
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::Database(e) => {
                error!(error = %e, "database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
            ApiError::Internal(e) => {
                error!(error = %e, "unexpected error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
        };
        (status, Json(Envelope::<()>::failure(message))).into_response()
    }
}
