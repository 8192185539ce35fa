use std::time::{SystemTime, UNIX_EPOCH};

pub(crate) fn now_ms() -> u64 {
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|d| d.as_millis() as u64)
    .unwrap_or(0)
}

pub(crate) fn now_rfc3339() -> String {
  chrono::Utc::now().to_rfc3339()
}

/// Primary subtag of a language tag: `hi-IN` → `hi`, `EN_in` → `en`.
pub(crate) fn primary_subtag(tag: &str) -> String {
  tag
    .trim()
    .split(|c| c == '-' || c == '_')
    .next()
    .unwrap_or("")
    .to_ascii_lowercase()
}
