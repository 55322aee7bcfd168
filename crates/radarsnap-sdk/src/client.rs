//! Top-level API client.

use std::env;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::analytics::AnalyticsApi;
use crate::auth::AuthApi;
use crate::error::ApiError;
use crate::http::{ApiRequest, DEFAULT_BASE_URL, HttpClient};
use crate::projects::ProjectsApi;
use crate::refresh::{AuthTerminalHook, RefreshCoordinator};
use crate::store::{KeyValueStore, SessionStore};

/// Client configuration.
pub struct ClientConfig {
    /// Base URL of the API server.
    pub base_url: String,
    /// Session store backing the client.
    pub store: SessionStore,
    /// Hook fired when the session becomes terminally unauthenticated.
    pub on_auth_terminal: Option<AuthTerminalHook>,
}

impl ClientConfig {
    /// Configuration pointing at `base_url` with an in-memory store.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            store: SessionStore::in_memory(),
            on_auth_terminal: None,
        }
    }

    /// Configuration from the environment.
    ///
    /// Reads `RADARSNAP_API_URL`, falling back to
    /// [`DEFAULT_BASE_URL`] when unset.
    pub fn from_env() -> Self {
        let base_url =
            env::var("RADARSNAP_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    /// Use a custom storage backend instead of the in-memory default.
    #[must_use]
    pub fn with_store(mut self, backend: Arc<dyn KeyValueStore>) -> Self {
        self.store = SessionStore::new(backend);
        self
    }

    /// Register a hook fired when the session ends without recovery.
    #[must_use]
    pub fn with_auth_terminal_hook(mut self, hook: AuthTerminalHook) -> Self {
        self.on_auth_terminal = Some(hook);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Authenticated client for the Radarsnap API.
///
/// All typed request helpers route through the refresh coordinator, so a
/// stale access token is renewed transparently. Endpoints that must not
/// carry credentials (login, register, the exchange itself) use the
/// public helpers instead.
pub struct ApiClient {
    http: HttpClient,
    store: SessionStore,
    coordinator: RefreshCoordinator,
}

impl ApiClient {
    /// Build a client from `config`.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http = HttpClient::new(&config.base_url)?;
        let coordinator = RefreshCoordinator::new(
            http.clone(),
            config.store.clone(),
            config.on_auth_terminal,
        );
        Ok(Self {
            http,
            store: config.store,
            coordinator,
        })
    }

    /// The session store backing this client.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    // ------------------------------------------------------------------
    // Endpoint groups
    // ------------------------------------------------------------------

    /// Authentication and account endpoints.
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    /// Project and team management endpoints.
    pub fn projects(&self) -> ProjectsApi<'_> {
        ProjectsApi::new(self)
    }

    /// Dashboard and analytics endpoints.
    pub fn analytics(&self) -> AnalyticsApi<'_> {
        AnalyticsApi::new(self)
    }

    // ------------------------------------------------------------------
    // Authenticated request helpers
    // ------------------------------------------------------------------

    /// Authenticated GET.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.dispatch(ApiRequest::get(path)).await
    }

    /// Authenticated GET with query string pairs.
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, ApiError> {
        self.dispatch(ApiRequest::get(path).with_query(query)).await
    }

    /// Authenticated POST with a JSON body.
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.dispatch(ApiRequest::post(path, body)?).await
    }

    /// Authenticated POST without a body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.dispatch(ApiRequest::post_empty(path)).await
    }

    /// Authenticated PUT with a JSON body.
    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.dispatch(ApiRequest::put(path, body)?).await
    }

    /// Authenticated DELETE. The response body, if any, is discarded.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.coordinator.execute(&ApiRequest::delete(path)).await?;
        Ok(())
    }

    async fn dispatch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.coordinator.execute(&request).await?.json()
    }

    // ------------------------------------------------------------------
    // Public (unauthenticated) request helpers
    // ------------------------------------------------------------------

    /// POST without credentials and outside the refresh pipeline. A 401
    /// here propagates directly; no refresh is attempted.
    pub async fn public_post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.http
            .send(&ApiRequest::post(path, body)?, None)
            .await?
            .json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_from_env_defaults_to_localhost() {
        // Serialise around the shared env var.
        let previous = env::var("RADARSNAP_API_URL").ok();
        env::remove_var("RADARSNAP_API_URL");
        let config = ClientConfig::from_env();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        if let Some(value) = previous {
            env::set_var("RADARSNAP_API_URL", value);
        }
    }

    #[test]
    fn client_builds_from_default_config() {
        let client = ApiClient::new(ClientConfig::default()).unwrap();
        assert!(!client.store().has_session().unwrap());
    }
}
