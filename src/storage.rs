//! Client-local durable storage.
//!
//! Values are opaque JSON blobs addressed by key, like the browser's
//! `localStorage`. Reads and writes are synchronous; callers go through
//! [`load_or_default`] and [`save_logged`] so a broken store degrades to
//! defaults instead of propagating.

use crate::errors::AppError;
use crate::paths::{resolve_data_dir, resolve_storage_path};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::warn;

pub trait LocalStore: Send + Sync {
  fn get(&self, key: &str) -> Result<Option<String>, AppError>;
  fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
  fn remove(&self, key: &str) -> Result<(), AppError>;
}

pub type SharedStore = Arc<dyn LocalStore>;

/// One JSON file per key inside a data directory.
pub struct JsonFileStore {
  dir: PathBuf,
}

impl JsonFileStore {
  pub fn new(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
    let dir = dir.into();
    fs::create_dir_all(&dir)
      .map_err(|e| AppError::Storage(format!("Failed to create {}: {}", dir.display(), e)))?;
    Ok(Self { dir })
  }

  /// Store rooted at the resolved data directory (`KRISHI_DATA_DIR` or `./.krishi/data`).
  pub fn open_default() -> Result<Self, AppError> {
    Self::new(resolve_data_dir())
  }
}

impl LocalStore for JsonFileStore {
  fn get(&self, key: &str) -> Result<Option<String>, AppError> {
    let path = resolve_storage_path(&self.dir, key);
    if !path.exists() {
      return Ok(None);
    }
    fs::read_to_string(&path)
      .map(Some)
      .map_err(|e| AppError::Storage(format!("Failed to read {}: {}", path.display(), e)))
  }

  fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
    let path = resolve_storage_path(&self.dir, key);
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, value)
      .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", tmp.display(), e)))?;
    fs::rename(&tmp, &path)
      .map_err(|e| AppError::Storage(format!("Failed to replace {}: {}", path.display(), e)))
  }

  fn remove(&self, key: &str) -> Result<(), AppError> {
    let path = resolve_storage_path(&self.dir, key);
    match fs::remove_file(&path) {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(AppError::Storage(format!(
        "Failed to remove {}: {}",
        path.display(),
        e
      ))),
    }
  }
}

/// Process-local store; nothing survives the session.
#[derive(Default)]
pub struct MemoryStore {
  entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl LocalStore for MemoryStore {
  fn get(&self, key: &str) -> Result<Option<String>, AppError> {
    let entries = self
      .entries
      .lock()
      .map_err(|_| AppError::Storage("memory store poisoned".to_string()))?;
    Ok(entries.get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
    let mut entries = self
      .entries
      .lock()
      .map_err(|_| AppError::Storage("memory store poisoned".to_string()))?;
    entries.insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<(), AppError> {
    let mut entries = self
      .entries
      .lock()
      .map_err(|_| AppError::Storage("memory store poisoned".to_string()))?;
    entries.remove(key);
    Ok(())
  }
}

/// Read and decode `key`. Missing, unreadable or corrupt values yield `T::default()`.
pub fn load_or_default<T>(store: &dyn LocalStore, key: &str) -> T
where
  T: DeserializeOwned + Default,
{
  match store.get(key) {
    Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
      warn!("Stored value for '{}' is corrupt, resetting: {}", key, e);
      T::default()
    }),
    Ok(None) => T::default(),
    Err(e) => {
      warn!("Could not read '{}': {}", key, e);
      T::default()
    }
  }
}

/// Encode and write `value`; failures are logged and swallowed.
pub fn save_logged<T>(store: &dyn LocalStore, key: &str, value: &T) -> bool
where
  T: Serialize + ?Sized,
{
  let raw = match serde_json::to_string(value) {
    Ok(raw) => raw,
    Err(e) => {
      warn!("Could not encode '{}': {}", key, e);
      return false;
    }
  };
  match store.set(key, &raw) {
    Ok(()) => true,
    Err(e) => {
      warn!("Could not save '{}': {}", key, e);
      false
    }
  }
}
