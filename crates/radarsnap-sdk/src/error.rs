//! SDK error types.
//!
//! [`ApiError`] is the single error type returned by every fallible
//! operation in the SDK. The taxonomy matters to the request pipeline:
//! only a 401 [`Status`](ApiError::Status) error on a not-yet-retried
//! request enters the refresh path; everything else propagates unchanged.

use radarsnap_models::ApiErrorBody;

use crate::store::StoreError;

/// Error type for all SDK operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No response was received (connection failure, DNS, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A response was received with a non-2xx status.
    #[error("HTTP {status}: {}", ApiErrorBody::extract_message(.body))]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body, kept verbatim for callers that need it.
        body: String,
    },

    /// A 401 was received but no refresh token is stored.
    #[error("no refresh token available")]
    NoRefreshToken,

    /// The refresh-token exchange itself failed.
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),

    /// JSON (de)serialisation error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The token/session store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// The HTTP status code, for [`Status`](Self::Status) errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this is an authentication/authorisation failure (401/403).
    pub fn is_auth_error(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// Whether this is a validation failure (422).
    pub fn is_validation_error(&self) -> bool {
        self.status() == Some(422)
    }

    /// Whether this is a server-side failure (5xx).
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(s) if s >= 500)
    }
}
