//! # Radarsnap SDK
//!
//! Client SDK for the **Radarsnap** web-analytics API.
//!
//! The SDK provides:
//!
//! * [`ApiClient`] — authenticated HTTP client with transparent
//!   access-token refresh on 401.
//! * [`RefreshCoordinator`] — serialises refresh-token exchanges so
//!   concurrent 401s trigger exactly one exchange.
//! * [`SessionStore`] / [`KeyValueStore`] — pluggable credential and
//!   session persistence.
//! * [`ApiError`] — unified error type for all SDK operations.
//!
//! DTOs from [`radarsnap_models`] are re-exported for convenience.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use radarsnap_sdk::{ApiClient, ClientConfig};
//!
//! # async fn run() -> Result<(), radarsnap_sdk::ApiError> {
//! let client = ApiClient::new(ClientConfig::from_env())?;
//! client.auth().login("dev@example.com", "hunter2").await?;
//!
//! let projects = client.projects().list().await?;
//! println!("{} projects", projects.count);
//! # Ok(())
//! # }
//! ```

pub mod analytics;
pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod projects;
pub mod refresh;
pub mod store;

pub use analytics::AnalyticsApi;
pub use auth::AuthApi;
pub use client::{ApiClient, ClientConfig};
pub use error::ApiError;
pub use http::{ApiRequest, HttpClient, HttpResponse, DEFAULT_BASE_URL};
pub use projects::ProjectsApi;
pub use refresh::{AuthTerminalHook, RefreshCoordinator, REFRESH_PATH};
pub use store::{KeyValueStore, MemoryStore, SessionStore, StoreError};

// Re-export DTOs from radarsnap-models for ergonomic usage.
pub use radarsnap_models as models;
