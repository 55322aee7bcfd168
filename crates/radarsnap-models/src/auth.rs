//! Authentication DTOs.
//!
//! These mirror the backend's `/api/v1/auth/*` endpoints. The important
//! contract is the credential pair: `access_token` is short-lived and sent
//! as a bearer header on every authenticated call; `refresh_token` is
//! long-lived and used exactly once per refresh cycle to mint a new pair.
//! The refresh token is never sent as a bearer credential.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated user profile, as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable user identifier.
    pub id: String,
    /// Login email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Whether the email address has been verified.
    pub email_verified: bool,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last profile update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/v1/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Login email address.
    pub email: String,
    /// Plaintext password (TLS is assumed at the transport layer).
    pub password: String,
}

/// Response of `POST /api/v1/auth/login` and `POST /api/v1/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Short-lived bearer token.
    pub access_token: String,
    /// Long-lived token used only against the refresh endpoint.
    pub refresh_token: String,
    /// Profile of the authenticated user.
    pub user: User,
}

/// Body of `POST /api/v1/auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Login email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

/// Body of `POST /api/v1/auth/refresh`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    /// The stored refresh token.
    pub refresh_token: String,
}

/// Response of `POST /api/v1/auth/refresh`.
///
/// `refresh_token` is optional: providers that do not rotate refresh
/// tokens omit it, and the client keeps using the stored one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenResponse {
    /// Newly minted access token.
    pub access_token: String,
    /// Rotated refresh token, if the provider rotates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Body of `POST /api/v1/auth/logout`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutRequest {
    /// Refresh token to revoke server-side.
    pub refresh_token: String,
}

/// Body of `PUT /api/v1/auth/change-password`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    /// Current password.
    pub old_password: String,
    /// Replacement password.
    pub new_password: String,
}

/// Generic `{ "message": … }` acknowledgement body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_response_without_rotation() {
        // Non-rotating providers omit the refresh_token field entirely.
        let json = r#"{"access_token":"T2"}"#;
        let res: RefreshTokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(res.access_token, "T2");
        assert!(res.refresh_token.is_none());
    }

    #[test]
    fn refresh_response_with_rotation() {
        let json = r#"{"access_token":"T2","refresh_token":"R2"}"#;
        let res: RefreshTokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(res.refresh_token.as_deref(), Some("R2"));
    }

    #[test]
    fn refresh_response_omits_null_rotation_on_serialise() {
        let res = RefreshTokenResponse {
            access_token: "T2".into(),
            refresh_token: None,
        };
        let json = serde_json::to_string(&res).unwrap();
        assert!(!json.contains("refresh_token"));
    }

    #[test]
    fn login_response_roundtrip() {
        let json = r#"{
            "access_token": "A1",
            "refresh_token": "R1",
            "user": {
                "id": "u-1",
                "email": "dev@example.com",
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email_verified": true,
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-02T00:00:00Z"
            }
        }"#;
        let res: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(res.user.email, "dev@example.com");
        let back = serde_json::to_string(&res).unwrap();
        let again: LoginResponse = serde_json::from_str(&back).unwrap();
        assert_eq!(again.user, res.user);
    }
}
