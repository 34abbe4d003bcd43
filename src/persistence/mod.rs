//! Best-effort local cache
//!
//! Small JSON documents keyed by name:
//! - LocalStorage on web
//! - one file per key on native (written to a temp file, then renamed)
//!
//! Nothing here is durable: callers log failures and carry on.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// Key prefix shared by every cached document
pub const KEY_PREFIX: &str = "jet_crash_";

/// Handle to the local cache
#[derive(Debug, Clone)]
pub struct LocalStore {
    #[cfg(not(target_arch = "wasm32"))]
    dir: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl LocalStore {
    /// Cache rooted at `dir` (created on first write)
    pub fn new(dir: impl Into<std::path::PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> std::path::PathBuf {
        self.dir.join(format!("{KEY_PREFIX}{key}.json"))
    }

    /// Read a document; `Ok(None)` when nothing is cached yet
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write a document
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string(value)?)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Drop a document (missing keys are fine)
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    /// Cache backed by the page's LocalStorage
    pub fn browser() -> Self {
        Self {}
    }

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StoreError::Unavailable("LocalStorage not available".into()))
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let storage = Self::storage()?;
        match storage.get_item(&format!("{KEY_PREFIX}{key}")) {
            Ok(Some(json)) => Ok(Some(serde_json::from_str(&json)?)),
            Ok(None) => Ok(None),
            Err(_) => Err(StoreError::Unavailable(format!("cannot read {key}"))),
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        let json = serde_json::to_string(value)?;
        storage
            .set_item(&format!("{KEY_PREFIX}{key}"), &json)
            .map_err(|_| StoreError::Unavailable(format!("cannot write {key}")))
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        storage
            .remove_item(&format!("{KEY_PREFIX}{key}"))
            .map_err(|_| StoreError::Unavailable(format!("cannot remove {key}")))
    }
}
