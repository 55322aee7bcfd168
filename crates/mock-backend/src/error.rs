//! Error types for the mock backend.
//!
//! [`ServiceError`] unifies all failure modes and implements
//! [`axum::response::IntoResponse`] so handlers can return
//! `Result<…, ServiceError>` directly. Bodies use the `{"detail": …}`
//! shape the production API emits.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Errors that can occur while serving API requests.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Login failed: unknown email or wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The presented access or refresh token is missing, malformed,
    /// expired or revoked.
    #[error("invalid or expired token")]
    InvalidToken,

    /// The requested record does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Registration with an email that already has an account.
    #[error("an account with this email already exists")]
    EmailTaken,

    /// The request body failed validation.
    #[error("{0}")]
    Validation(String),

    /// JSON (de)serialisation error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::InvalidCredentials | Self::InvalidToken => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            Self::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            Self::EmailTaken => (StatusCode::CONFLICT, self.to_string()),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            Self::Serialization(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        tracing::debug!(%status, error = %message, "request failed");
        (status, Json(json!({ "detail": message }))).into_response()
    }
}
