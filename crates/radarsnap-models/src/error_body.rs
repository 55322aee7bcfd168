//! Error payload returned by the backend on failure responses.
//!
//! The backend is not perfectly consistent about its error shape; some
//! endpoints return `{"message": …}`, others `{"detail": …}` or
//! `{"error": …}`, and validation failures add a per-field map. This
//! module normalises all of them into one struct so callers get a usable
//! message regardless of the source.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Normalised error body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Alternate message field used by some endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Alternate message field used by some endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-readable error code, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Field → messages map on validation failures (HTTP 422).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<HashMap<String, Vec<String>>>,
}

impl ApiErrorBody {
    /// Best-effort extraction of a display message from a raw response
    /// body. Falls back to the raw text when the body is not JSON or
    /// carries no recognised field.
    pub fn extract_message(raw: &str) -> String {
        let Ok(body) = serde_json::from_str::<ApiErrorBody>(raw) else {
            return raw.trim().to_string();
        };
        if let Some(m) = body.message {
            return m;
        }
        if let Some(m) = body.detail {
            return m;
        }
        if let Some(m) = body.error {
            return m;
        }
        if let Some(errors) = body.errors {
            let mut parts: Vec<String> = errors
                .into_iter()
                .map(|(field, msgs)| format!("{field}: {}", msgs.join(", ")))
                .collect();
            parts.sort();
            if !parts.is_empty() {
                return parts.join("; ");
            }
        }
        raw.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_message_field() {
        let raw = r#"{"message":"invalid credentials"}"#;
        assert_eq!(ApiErrorBody::extract_message(raw), "invalid credentials");
    }

    #[test]
    fn extracts_detail_field() {
        let raw = r#"{"detail":"token expired"}"#;
        assert_eq!(ApiErrorBody::extract_message(raw), "token expired");
    }

    #[test]
    fn extracts_error_field() {
        let raw = r#"{"error":"forbidden"}"#;
        assert_eq!(ApiErrorBody::extract_message(raw), "forbidden");
    }

    #[test]
    fn message_takes_precedence_over_detail() {
        let raw = r#"{"message":"first","detail":"second"}"#;
        assert_eq!(ApiErrorBody::extract_message(raw), "first");
    }

    #[test]
    fn flattens_validation_errors() {
        let raw = r#"{"errors":{"email":["must be valid"],"password":["too short"]}}"#;
        let msg = ApiErrorBody::extract_message(raw);
        assert_eq!(msg, "email: must be valid; password: too short");
    }

    #[test]
    fn falls_back_to_raw_text() {
        assert_eq!(ApiErrorBody::extract_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(ApiErrorBody::extract_message("{}"), "{}");
    }
}
