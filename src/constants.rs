pub const HISTORY_LIMIT: usize = 10;
pub const REQUEST_HISTORY_WINDOW: usize = 3;
pub const SAVED_RESPONSES_LIMIT: usize = 20;
pub const FOLLOW_UP_MAX_CHARS: usize = 20;

pub const UPLOAD_MAX_BYTES: u64 = 16 * 1024 * 1024;

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_VOICE_LANGUAGE: &str = "hi-IN";
pub const REGIONAL_VOICE_LANGUAGE: &str = "en-IN";

pub const NOTIFICATION_DURATION_MS_DEFAULT: u64 = 5_000;

pub const SPEECH_RATE_DEFAULT: f32 = 0.85; // slower for comprehension
pub const SPEECH_PITCH_DEFAULT: f32 = 1.1;
pub const SPEECH_VOLUME_DEFAULT: f32 = 0.9;

pub const STORAGE_KEY_HISTORY: &str = "krishi_voice_history";
pub const STORAGE_KEY_SAVED: &str = "krishi_saved_responses";
pub const STORAGE_KEY_LANGUAGE: &str = "krishi_language";
