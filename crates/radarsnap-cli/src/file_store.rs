//! File-backed session storage.
//!
//! Persists the SDK's key-value state as a single JSON object so logins
//! survive across invocations. The file lives under the user's config
//! directory and is created with owner-only permissions since it holds
//! live tokens.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use radarsnap_sdk::{KeyValueStore, StoreError};

/// Session file store, one JSON object per file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store at the default location, `<config dir>/radarsnap/session.json`.
    pub fn default_location() -> Result<Self, StoreError> {
        let base = dirs::config_dir()
            .ok_or_else(|| StoreError::Backend("no config directory available".to_string()))?;
        Ok(Self::at(base.join("radarsnap").join("session.json")))
    }

    /// Store at an explicit path.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> Result<HashMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(StoreError::Backend(e.to_string())),
        }
    }

    fn save(&self, data: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Backend(e.to_string()))?;
        }
        let raw = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, raw).map_err(|e| StoreError::Backend(e.to_string()))?;

        // Tokens inside: owner read/write only.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut data = self.load()?;
        data.insert(key.to_string(), value.to_string());
        self.save(&data)
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut data = self.load()?;
        if data.remove(key).is_some() {
            self.save(&data)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_store() -> FileStore {
        let path = std::env::temp_dir()
            .join(format!("radarsnap-test-{}", Uuid::new_v4()))
            .join("session.json");
        FileStore::at(path)
    }

    #[test]
    fn roundtrip_survives_reopen() {
        let store = temp_store();
        store.set("radarsnap.access_token", "T1").unwrap();

        let reopened = FileStore::at(store.path.clone());
        assert_eq!(
            reopened.get("radarsnap.access_token").unwrap().as_deref(),
            Some("T1")
        );
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let store = temp_store();
        assert!(store.get("radarsnap.user").unwrap().is_none());
        store.remove("radarsnap.user").unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let store = temp_store();
        store.set("radarsnap.refresh_token", "R1").unwrap();
        let mode = fs::metadata(&store.path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
