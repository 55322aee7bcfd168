//! HTTP transport layer.
//!
//! [`HttpClient`] wraps a shared [`reqwest::Client`] and knows nothing
//! about authentication beyond attaching a bearer token when asked. The
//! retry and refresh logic lives above it in the request pipeline, which
//! needs to re-send a request verbatim; [`ApiRequest`] exists so a
//! request can be described once and dispatched any number of times.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Per-request timeout covering connect, send and read.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP methods the API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl Method {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A re-dispatchable description of one API request.
///
/// The body is held as a pre-serialised [`serde_json::Value`] so the same
/// request can be sent again after a token refresh without re-borrowing
/// the caller's payload.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the base URL, with a leading slash.
    pub path: String,
    /// Query string pairs.
    pub query: Vec<(String, String)>,
    /// JSON body, if any.
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// A GET request for `path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// A POST request for `path` carrying `body` as JSON.
    pub fn post<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        Ok(Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(serde_json::to_value(body)?),
        })
    }

    /// A body-less POST request for `path`.
    pub fn post_empty(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// A PUT request for `path` carrying `body` as JSON.
    pub fn put<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        Ok(Self {
            method: Method::Put,
            path: path.into(),
            query: Vec::new(),
            body: Some(serde_json::to_value(body)?),
        })
    }

    /// A DELETE request for `path`.
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Attach query string pairs.
    #[must_use]
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }
}

/// A received response: status plus the raw body text.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw body text.
    pub body: String,
}

impl HttpResponse {
    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Thin wrapper over [`reqwest::Client`] pinned to one base URL.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    /// Build a client for `base_url`.
    ///
    /// Trailing slashes on the base URL are stripped so paths can always
    /// be written with a leading slash.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Dispatch `request`, attaching `bearer` as an `Authorization` header
    /// when given.
    ///
    /// A non-2xx status is returned as [`ApiError::Status`] with the raw
    /// body preserved; transport failures surface as [`ApiError::Network`].
    pub async fn send(
        &self,
        request: &ApiRequest,
        bearer: Option<&str>,
    ) -> Result<HttpResponse, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.client.request(request.method.as_reqwest(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        if (200..300).contains(&status) {
            Ok(HttpResponse { status, body })
        } else {
            Err(ApiError::Status { status, body })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let client = HttpClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn post_serialises_body() {
        #[derive(serde::Serialize)]
        struct Payload {
            name: &'static str,
        }
        let req = ApiRequest::post("/api/v1/projects", &Payload { name: "site" }).unwrap();
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.body, Some(serde_json::json!({ "name": "site" })));
    }

    #[test]
    fn with_query_attaches_pairs() {
        let req = ApiRequest::get("/api/v1/dashboard")
            .with_query(vec![("days".to_string(), "30".to_string())]);
        assert_eq!(req.query.len(), 1);
        assert_eq!(req.query[0].1, "30");
    }

    #[test]
    fn response_json_decodes() {
        let resp = HttpResponse {
            status: 200,
            body: r#"{"message":"ok"}"#.to_string(),
        };
        let value: serde_json::Value = resp.json().unwrap();
        assert_eq!(value["message"], "ok");
    }
}
