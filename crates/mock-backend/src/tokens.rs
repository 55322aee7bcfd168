//! Token minting and verification.
//!
//! Access tokens are short-lived HS256 JWTs. Refresh tokens are opaque
//! random strings tracked server-side, so revocation is a map removal.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use serde::{Deserialize, Serialize};

use radarsnap_models::User;

use crate::error::ServiceError;

/// Claims carried by an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User id.
    pub sub: String,
    /// User email.
    pub email: String,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

/// Sign an access token for `user`.
pub fn mint_access_token(
    secret: &str,
    user: &User,
    ttl_secs: i64,
) -> Result<String, ServiceError> {
    let now = Utc::now();
    let claims = AccessClaims {
        sub: user.id.clone(),
        email: user.email.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(ttl_secs)).timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| ServiceError::InvalidToken)
}

/// Verify an access token and return its claims. Expired or malformed
/// tokens map to [`ServiceError::InvalidToken`].
pub fn verify_access_token(secret: &str, token: &str) -> Result<AccessClaims, ServiceError> {
    decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|_| ServiceError::InvalidToken)
}

/// Mint an opaque refresh token: 32 random bytes, base64url.
pub fn mint_refresh_token() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user() -> User {
        User {
            id: "u-1".into(),
            email: "dev@example.com".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email_verified: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn access_token_roundtrip() {
        let token = mint_access_token("secret", &user(), 900).unwrap();
        let claims = verify_access_token("secret", &token).unwrap();
        assert_eq!(claims.sub, "u-1");
        assert_eq!(claims.email, "dev@example.com");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = mint_access_token("secret", &user(), 900).unwrap();
        assert!(verify_access_token("other", &token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = mint_access_token("secret", &user(), -120).unwrap();
        assert!(verify_access_token("secret", &token).is_err());
    }

    #[test]
    fn refresh_tokens_are_unique() {
        assert_ne!(mint_refresh_token(), mint_refresh_token());
    }
}
