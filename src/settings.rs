use crate::constants::{
  DEFAULT_LANGUAGE,
  DEFAULT_VOICE_LANGUAGE,
  NOTIFICATION_DURATION_MS_DEFAULT,
  SPEECH_PITCH_DEFAULT,
  SPEECH_RATE_DEFAULT,
  SPEECH_VOLUME_DEFAULT,
};
use crate::errors::AppError;
use crate::paths::resolve_config_path;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;
use url::Url;

pub(crate) const SETTINGS_FILE: &str = "settings.json";
const API_BASE_ENV: &str = "KRISHI_API_BASE";
const API_BASE_DEFAULT: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub api_base_url: String,
  pub ui_language: String,
  pub voice_language: String, // BCP-47 tag for capture and synthesis, e.g. "hi-IN"
  pub request_timeout_ms: u64,
  pub connect_timeout_ms: u64,
  pub speech_rate: f32,
  pub speech_pitch: f32,
  pub speech_volume: f32,
  pub notification_duration_ms: u64,
  pub log_dir: String, // empty = stdout only
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      api_base_url: API_BASE_DEFAULT.to_string(),
      ui_language: DEFAULT_LANGUAGE.to_string(),
      voice_language: DEFAULT_VOICE_LANGUAGE.to_string(),
      request_timeout_ms: 30_000,
      connect_timeout_ms: 5_000,
      speech_rate: SPEECH_RATE_DEFAULT,
      speech_pitch: SPEECH_PITCH_DEFAULT,
      speech_volume: SPEECH_VOLUME_DEFAULT,
      notification_duration_ms: NOTIFICATION_DURATION_MS_DEFAULT,
      log_dir: "".to_string(),
    }
  }
}

impl Settings {
  /// Clamp every field into its usable range. Invalid values fall back to defaults.
  pub fn normalize(&mut self) {
    let defaults = Settings::default();
    if let Ok(base) = std::env::var(API_BASE_ENV) {
      if !base.trim().is_empty() {
        self.api_base_url = base.trim().to_string();
      }
    }
    self.api_base_url = self.api_base_url.trim().trim_end_matches('/').to_string();
    if Url::parse(&self.api_base_url).is_err() {
      warn!("Invalid api_base_url '{}', using default", self.api_base_url);
      self.api_base_url = defaults.api_base_url.clone();
    }
    if self.ui_language.trim().is_empty() {
      self.ui_language = defaults.ui_language.clone();
    }
    self.ui_language = crate::util::primary_subtag(&self.ui_language);
    if self.voice_language.trim().is_empty() {
      self.voice_language = defaults.voice_language.clone();
    }
    self.voice_language = self.voice_language.trim().to_string();
    if self.request_timeout_ms < 1_000 {
      self.request_timeout_ms = 1_000;
    }
    if self.request_timeout_ms > 120_000 {
      self.request_timeout_ms = 120_000;
    }
    if self.connect_timeout_ms < 500 {
      self.connect_timeout_ms = 500;
    }
    if self.connect_timeout_ms > self.request_timeout_ms {
      self.connect_timeout_ms = self.request_timeout_ms;
    }
    if !(0.1..=10.0).contains(&self.speech_rate) {
      self.speech_rate = defaults.speech_rate;
    }
    if !(0.0..=2.0).contains(&self.speech_pitch) {
      self.speech_pitch = defaults.speech_pitch;
    }
    if !(0.0..=1.0).contains(&self.speech_volume) {
      self.speech_volume = defaults.speech_volume;
    }
    if self.notification_duration_ms < 1_000 {
      self.notification_duration_ms = 1_000;
    }
    if self.notification_duration_ms > 60_000 {
      self.notification_duration_ms = 60_000;
    }
    self.log_dir = self.log_dir.trim().to_string();
  }

  /// Join an endpoint path onto the API base URL.
  pub fn endpoint(&self, path: &str) -> Result<String, AppError> {
    let base = Url::parse(&format!("{}/", self.api_base_url))
      .map_err(|e| AppError::Config(format!("Invalid API base URL: {}", e)))?;
    base
      .join(path.trim_start_matches('/'))
      .map(|u| u.to_string())
      .map_err(|e| AppError::Config(format!("Invalid endpoint '{}': {}", path, e)))
  }
}

pub fn load_settings_from(path: &Path) -> Settings {
  let mut settings = match fs::read_to_string(path) {
    Ok(raw) => serde_json::from_str::<Settings>(&raw).unwrap_or_else(|e| {
      warn!("Failed to parse {}: {}; using defaults", path.display(), e);
      Settings::default()
    }),
    Err(_) => Settings::default(),
  };
  settings.normalize();
  settings
}

pub fn load_settings() -> Settings {
  load_settings_from(&resolve_config_path(SETTINGS_FILE))
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<(), AppError> {
  let raw = serde_json::to_string_pretty(settings).map_err(|e| AppError::Config(e.to_string()))?;
  fs::write(path, raw).map_err(|e| AppError::Storage(e.to_string()))?;
  Ok(())
}

pub fn save_settings(settings: &Settings) -> Result<(), AppError> {
  save_settings_to(&resolve_config_path(SETTINGS_FILE), settings)
}
