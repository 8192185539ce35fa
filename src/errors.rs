use serde::{Deserialize, Serialize};
use std::fmt;

/// Application-wide error types, grouped by how the page recovers from them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    /// Rejected user input (unsupported file type, oversized upload)
    Validation(String),

    /// Remote assistant/dashboard service unreachable or unsuccessful
    Network(String),

    /// Microphone or camera unavailable, denied or silent
    Capture(String),

    /// Local storage unreadable, corrupt or not writable
    Storage(String),

    /// Settings file or environment problems
    Config(String),

    /// Generic errors that don't fit other categories
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Network(msg) => write!(f, "Network Error: {}", msg),
            AppError::Capture(msg) => write!(f, "Capture Error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage Error: {}", msg),
            AppError::Config(msg) => write!(f, "Config Error: {}", msg),
            AppError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Returns a user-friendly title for the error
    pub fn title(&self) -> &str {
        match self {
            AppError::Validation(_) => "Invalid Input",
            AppError::Network(_) => "Network Problem",
            AppError::Capture(_) => "Device Access Issue",
            AppError::Storage(_) => "Storage Error",
            AppError::Config(_) => "Configuration Problem",
            AppError::Other(_) => "Error",
        }
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        match self {
            AppError::Validation(msg)
            | AppError::Network(msg)
            | AppError::Capture(msg)
            | AppError::Storage(msg)
            | AppError::Config(msg)
            | AppError::Other(msg) => msg,
        }
    }

    /// Returns whether this error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Validation(_) => true, // Pick another file
            AppError::Network(_) => true,    // Connectivity comes back
            AppError::Capture(_) => true,    // Retry after granting permission
            AppError::Storage(_) => true,    // State resets to defaults
            AppError::Config(_) => false,
            AppError::Other(_) => false,
        }
    }

    /// Returns a suggested action for the user
    pub fn suggested_action(&self) -> Option<&str> {
        match self {
            AppError::Validation(_) => Some("Choose a JPG, PNG or GIF image under 16MB"),
            AppError::Network(_) => Some("Check your internet connection"),
            AppError::Capture(_) => Some("Allow microphone or camera access and try again"),
            AppError::Storage(_) => None,
            AppError::Config(_) => Some("Check settings.json and environment variables"),
            AppError::Other(_) => None,
        }
    }
}

/// Convert from String to AppError::Other
impl From<String> for AppError {
    fn from(error: String) -> Self {
        AppError::Other(error)
    }
}

/// Convert from &str to AppError::Other
impl From<&str> for AppError {
    fn from(error: &str) -> Self {
        AppError::Other(error.to_string())
    }
}

/// Last failure of a session operation, kept for the host to surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub error: AppError,
    pub timestamp: u64,
    pub context: Option<String>,
}

impl ErrorEvent {
    pub fn new(error: AppError) -> Self {
        Self {
            error,
            timestamp: crate::util::now_ms(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}
