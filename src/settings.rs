//! Persisted catalog credential
//!
//! The client id lives in a small JSON key/value file in the user's config
//! directory. A build-time default is used when nothing is stored, and the
//! previously shipped default (since revoked by the provider) is purged from
//! storage on load.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;

pub const CREDENTIAL_KEY: &str = "jamendo_client_id";

pub const DEFAULT_CLIENT_ID: &str = match option_env!("JAMENDO_CLIENT_ID") {
    Some(id) => id,
    None => "841052ed",
};

/// Former default, suspended by the provider
pub const REVOKED_CLIENT_ID: &str = "a5518597";

const STORAGE_FILE: &str = "storage.json";

/// Client-local persistent key/value storage.
pub trait Storage: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// JSON object on disk, rewritten on every change.
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    pub fn open(dir: &Path) -> Result<Self> {
        let path = dir.join(STORAGE_FILE);
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };
        tracing::debug!(path = %path.display(), entries = entries.len(), "Opened storage");
        Ok(Self { path, entries })
    }

    fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent()
            && !dir.exists()
        {
            fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}

/// In-process storage, used when there is no config directory to write to.
/// Clones share the same entries.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}

pub struct SettingsStore {
    storage: Box<dyn Storage>,
    credential: String,
}

impl SettingsStore {
    pub fn load(mut storage: Box<dyn Storage>) -> Self {
        let mut stored = storage.get(CREDENTIAL_KEY);

        if stored.as_deref() == Some(REVOKED_CLIENT_ID) {
            tracing::info!("Removing revoked client id from storage");
            if let Err(e) = storage.remove(CREDENTIAL_KEY) {
                tracing::warn!(error = %e, "Could not remove revoked client id, using the default");
            }
            stored = None;
        }

        let credential = stored
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CLIENT_ID.to_string());

        Self { storage, credential }
    }

    pub fn get(&self) -> &str {
        &self.credential
    }

    /// Persist a new credential. Blank input is ignored and returns `false`.
    pub fn set(&mut self, value: &str) -> Result<bool> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(false);
        }
        self.storage.set(CREDENTIAL_KEY, value)?;
        self.credential = value.to_string();
        tracing::info!("Client id updated");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(value: Option<&str>) -> (SettingsStore, MemoryStorage) {
        let mut storage = MemoryStorage::default();
        if let Some(value) = value {
            storage.set(CREDENTIAL_KEY, value).unwrap();
        }
        let store = SettingsStore::load(Box::new(storage.clone()));
        (store, storage)
    }

    #[test]
    fn falls_back_to_default() {
        let (store, _) = store_with(None);
        assert_eq!(store.get(), DEFAULT_CLIENT_ID);
    }

    #[test]
    fn uses_persisted_credential() {
        let (store, _) = store_with(Some("feedbeef"));
        assert_eq!(store.get(), "feedbeef");
    }

    #[test]
    fn revoked_credential_is_purged_once() {
        let (store, storage) = store_with(Some(REVOKED_CLIENT_ID));
        assert_eq!(store.get(), DEFAULT_CLIENT_ID);
        assert_eq!(storage.get(CREDENTIAL_KEY), None);

        // Nothing left to migrate on the next start.
        let again = SettingsStore::load(Box::new(storage.clone()));
        assert_eq!(again.get(), DEFAULT_CLIENT_ID);
        assert_eq!(storage.get(CREDENTIAL_KEY), None);
    }

    #[test]
    fn blank_input_is_rejected() {
        let (mut store, storage) = store_with(Some("feedbeef"));
        assert!(!store.set("").unwrap());
        assert!(!store.set("   ").unwrap());
        assert_eq!(store.get(), "feedbeef");
        assert_eq!(storage.get(CREDENTIAL_KEY).as_deref(), Some("feedbeef"));
    }

    #[test]
    fn set_persists_trimmed_value() {
        let (mut store, storage) = store_with(None);
        assert!(store.set("  cafe1234 ").unwrap());
        assert_eq!(store.get(), "cafe1234");
        assert_eq!(storage.get(CREDENTIAL_KEY).as_deref(), Some("cafe1234"));
    }

    #[test]
    fn file_storage_round_trips_through_disk() {
        let dir = std::env::temp_dir().join(format!("jamendo-rs-storage-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let mut storage = FileStorage::open(&dir).unwrap();
        storage.set(CREDENTIAL_KEY, "feedbeef").unwrap();

        let reopened = FileStorage::open(&dir).unwrap();
        assert_eq!(reopened.get(CREDENTIAL_KEY).as_deref(), Some("feedbeef"));

        let mut reopened = reopened;
        reopened.remove(CREDENTIAL_KEY).unwrap();
        assert_eq!(FileStorage::open(&dir).unwrap().get(CREDENTIAL_KEY), None);

        let _ = fs::remove_dir_all(&dir);
    }

    /// Storage that can be read but not written
    struct ReadOnlyStorage(MemoryStorage);

    impl Storage for ReadOnlyStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            anyhow::bail!("read-only storage")
        }

        fn remove(&mut self, _key: &str) -> Result<()> {
            anyhow::bail!("read-only storage")
        }
    }

    #[test]
    fn unremovable_revoked_credential_still_loads_default() {
        let mut inner = MemoryStorage::default();
        inner.set(CREDENTIAL_KEY, REVOKED_CLIENT_ID).unwrap();

        let store = SettingsStore::load(Box::new(ReadOnlyStorage(inner.clone())));
        assert_eq!(store.get(), DEFAULT_CLIENT_ID);
        assert_eq!(inner.get(CREDENTIAL_KEY).as_deref(), Some(REVOKED_CLIENT_ID));
    }
}
