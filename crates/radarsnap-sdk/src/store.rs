//! Token and session persistence.
//!
//! The SDK never talks to a concrete storage backend directly; it goes
//! through the [`KeyValueStore`] trait so embedders can plug in whatever
//! persistence they have (the CLI uses a JSON file, tests and short-lived
//! tools use [`MemoryStore`]). [`SessionStore`] is the typed facade on
//! top: credential pair, cached user profile, current project.
//!
//! All keys are namespaced under `radarsnap.` to avoid colliding with
//! unrelated application state sharing the same backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use radarsnap_models::User;

/// Storage keys used by [`SessionStore`].
pub mod keys {
    /// Short-lived bearer token.
    pub const ACCESS_TOKEN: &str = "radarsnap.access_token";
    /// Long-lived refresh token.
    pub const REFRESH_TOKEN: &str = "radarsnap.refresh_token";
    /// Cached profile of the authenticated user (JSON).
    pub const USER: &str = "radarsnap.user";
    /// Id of the project the user last selected.
    pub const CURRENT_PROJECT: &str = "radarsnap.current_project";
}

/// Errors produced by a storage backend or by the typed facade.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying backend failed (I/O, lock poisoning, …).
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A stored value could not be decoded.
    #[error("stored value is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Minimal key-value persistence contract.
///
/// Implementations must be safe to share across tasks; all SDK access
/// is synchronous and writes are idempotent (re-setting the same value
/// is always safe).
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Fetch the value under `key`, if present.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Remove the value under `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory [`KeyValueStore`] backed by a `HashMap`.
///
/// The default backend: suitable for tests and for processes that do not
/// need credentials to survive a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.data
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Typed facade over a [`KeyValueStore`] for the session state the
/// pipeline cares about: the credential pair, the cached user profile
/// and the currently selected project.
///
/// Cloning is cheap; clones share the same backend.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    /// Wrap an existing backend.
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// A store backed by [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    // ------------------------------------------------------------------
    // Credential pair
    // ------------------------------------------------------------------

    /// The stored access token, if any.
    pub fn access_token(&self) -> Result<Option<String>, StoreError> {
        self.backend.get(keys::ACCESS_TOKEN)
    }

    /// Replace the access token.
    pub fn set_access_token(&self, token: &str) -> Result<(), StoreError> {
        self.backend.set(keys::ACCESS_TOKEN, token)
    }

    /// The stored refresh token, if any.
    pub fn refresh_token(&self) -> Result<Option<String>, StoreError> {
        self.backend.get(keys::REFRESH_TOKEN)
    }

    /// Replace the refresh token.
    pub fn set_refresh_token(&self, token: &str) -> Result<(), StoreError> {
        self.backend.set(keys::REFRESH_TOKEN, token)
    }

    // ------------------------------------------------------------------
    // Session identity
    // ------------------------------------------------------------------

    /// The cached user profile, if any.
    pub fn user(&self) -> Result<Option<User>, StoreError> {
        match self.backend.get(keys::USER)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Cache the user profile.
    pub fn set_user(&self, user: &User) -> Result<(), StoreError> {
        let raw = serde_json::to_string(user)?;
        self.backend.set(keys::USER, &raw)
    }

    /// Store a full session in one call: credential pair plus profile.
    pub fn set_session(
        &self,
        access_token: &str,
        refresh_token: &str,
        user: &User,
    ) -> Result<(), StoreError> {
        self.set_access_token(access_token)?;
        self.set_refresh_token(refresh_token)?;
        self.set_user(user)
    }

    /// Remove the credential pair and the cached profile.
    ///
    /// This is the terminal-auth cleanup: after it returns, a reader sees
    /// no trace of the session. The current-project selection is left
    /// alone so it survives a re-login.
    pub fn clear_session(&self) -> Result<(), StoreError> {
        self.backend.remove(keys::ACCESS_TOKEN)?;
        self.backend.remove(keys::REFRESH_TOKEN)?;
        self.backend.remove(keys::USER)
    }

    /// Whether both tokens of the credential pair are present.
    pub fn has_session(&self) -> Result<bool, StoreError> {
        Ok(self.access_token()?.is_some() && self.refresh_token()?.is_some())
    }

    // ------------------------------------------------------------------
    // Current project
    // ------------------------------------------------------------------

    /// Id of the last selected project, if any.
    pub fn current_project_id(&self) -> Result<Option<String>, StoreError> {
        self.backend.get(keys::CURRENT_PROJECT)
    }

    /// Remember the selected project.
    pub fn set_current_project_id(&self, id: &str) -> Result<(), StoreError> {
        self.backend.set(keys::CURRENT_PROJECT, id)
    }

    /// Forget the selected project.
    pub fn clear_current_project(&self) -> Result<(), StoreError> {
        self.backend.remove(keys::CURRENT_PROJECT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_user() -> User {
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
    fn token_roundtrip() {
        let store = SessionStore::in_memory();
        assert!(store.access_token().unwrap().is_none());

        store.set_access_token("T1").unwrap();
        store.set_refresh_token("R1").unwrap();
        assert_eq!(store.access_token().unwrap().as_deref(), Some("T1"));
        assert_eq!(store.refresh_token().unwrap().as_deref(), Some("R1"));
        assert!(store.has_session().unwrap());
    }

    #[test]
    fn set_is_idempotent() {
        let store = SessionStore::in_memory();
        store.set_access_token("T1").unwrap();
        store.set_access_token("T1").unwrap();
        assert_eq!(store.access_token().unwrap().as_deref(), Some("T1"));
    }

    #[test]
    fn clear_session_removes_tokens_and_profile_only() {
        let store = SessionStore::in_memory();
        store.set_session("T1", "R1", &test_user()).unwrap();
        store.set_current_project_id("p-1").unwrap();

        store.clear_session().unwrap();

        assert!(store.access_token().unwrap().is_none());
        assert!(store.refresh_token().unwrap().is_none());
        assert!(store.user().unwrap().is_none());
        assert!(!store.has_session().unwrap());
        // project selection survives a logout
        assert_eq!(store.current_project_id().unwrap().as_deref(), Some("p-1"));
    }

    #[test]
    fn user_profile_roundtrip() {
        let store = SessionStore::in_memory();
        let user = test_user();
        store.set_user(&user).unwrap();
        assert_eq!(store.user().unwrap().unwrap().email, user.email);
    }

    #[test]
    fn corrupt_profile_is_an_error() {
        let store = SessionStore::in_memory();
        let backend = MemoryStore::new();
        backend.set(keys::USER, "not json").unwrap();
        let store2 = SessionStore::new(Arc::new(backend));
        assert!(matches!(store2.user(), Err(StoreError::Corrupt(_))));
        drop(store);
    }

    #[test]
    fn remove_absent_key_is_ok() {
        let store = MemoryStore::new();
        store.remove("radarsnap.missing").unwrap();
    }
}
