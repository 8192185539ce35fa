use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR_ENV: &str = "KRISHI_CONFIG_DIR";
const DATA_DIR_ENV: &str = "KRISHI_DATA_DIR";

fn env_dir(var: &str) -> Option<PathBuf> {
  let raw = std::env::var(var).ok()?;
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }
  Some(PathBuf::from(trimmed))
}

fn fallback_base() -> PathBuf {
  std::env::current_dir()
    .unwrap_or_else(|_| PathBuf::from("."))
    .join(".krishi")
}

pub(crate) fn resolve_config_dir() -> PathBuf {
  let base = env_dir(CONFIG_DIR_ENV).unwrap_or_else(fallback_base);
  let _ = fs::create_dir_all(&base);
  base
}

pub(crate) fn resolve_data_dir() -> PathBuf {
  let base = env_dir(DATA_DIR_ENV).unwrap_or_else(|| fallback_base().join("data"));
  let _ = fs::create_dir_all(&base);
  base
}

pub(crate) fn resolve_config_path(filename: &str) -> PathBuf {
  resolve_config_dir().join(filename)
}

/// Storage keys become file names; anything outside `[A-Za-z0-9_-]` is replaced
/// so a key can never escape the storage directory.
pub(crate) fn storage_file_name(key: &str) -> String {
  let safe: String = key
    .chars()
    .map(|c| {
      if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
        c
      } else {
        '_'
      }
    })
    .collect();
  format!("{}.json", safe)
}

pub(crate) fn resolve_storage_path(dir: &Path, key: &str) -> PathBuf {
  dir.join(storage_file_name(key))
}
