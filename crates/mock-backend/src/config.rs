//! Mock backend configuration.
//!
//! Built from environment variables at startup and injected into Axum
//! handlers via the shared state.

/// Global configuration shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to listen on (default `8000`).
    pub listen_port: u16,
    /// HS256 secret used to sign access tokens.
    pub jwt_secret: String,
    /// Access-token lifetime in seconds (default 900).
    pub access_ttl_secs: i64,
    /// Whether the refresh endpoint rotates refresh tokens.
    pub rotate_refresh_tokens: bool,
}

impl AppConfig {
    /// Build the configuration from environment variables.
    ///
    /// | Variable              | Default                | Description                          |
    /// |-----------------------|------------------------|--------------------------------------|
    /// | `MOCK_PORT`           | `8000`                 | HTTP listen port                     |
    /// | `MOCK_JWT_SECRET`     | `radarsnap-dev-secret` | HS256 signing secret                 |
    /// | `MOCK_ACCESS_TTL`     | `900`                  | Access-token lifetime (seconds)      |
    /// | `MOCK_ROTATE_REFRESH` | `false`                | Rotate refresh tokens on exchange    |
    pub fn from_env() -> Self {
        let listen_port: u16 = std::env::var("MOCK_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8000);
        let jwt_secret = std::env::var("MOCK_JWT_SECRET")
            .unwrap_or_else(|_| "radarsnap-dev-secret".to_string());
        let access_ttl_secs: i64 = std::env::var("MOCK_ACCESS_TTL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(900);
        let rotate_refresh_tokens = std::env::var("MOCK_ROTATE_REFRESH")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            listen_port,
            jwt_secret,
            access_ttl_secs,
            rotate_refresh_tokens,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_port: 8000,
            jwt_secret: "radarsnap-dev-secret".to_string(),
            access_ttl_secs: 900,
            rotate_refresh_tokens: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.listen_port, 8000);
        assert_eq!(cfg.access_ttl_secs, 900);
        assert!(!cfg.rotate_refresh_tokens);
    }
}
