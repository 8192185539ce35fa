use serde::{Deserialize, Serialize};

use crate::util::now_rfc3339;

/// One completed voice round-trip. Never mutated after it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub query: String,
    pub response: String,
    pub timestamp: String, // RFC 3339, UTC
    #[serde(default)]
    pub language: String,
}

impl Exchange {
    pub fn new(query: impl Into<String>, response: impl Into<String>, language: &str) -> Self {
        Self {
            query: query.into(),
            response: response.into(),
            timestamp: now_rfc3339(),
            language: language.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Crop,
    Disease,
    Weather,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Crop, Topic::Disease, Topic::Weather];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Crop => "crop",
            Topic::Disease => "disease",
            Topic::Weather => "weather",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextEntry {
    pub exchange: Exchange,
    pub captured_at_ms: u64,
}

/// Last plant-scan outcome, forwarded so the backend can answer about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub diagnosis: String,
    #[serde(default)]
    pub treatment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceQueryRequest {
    pub query: String,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub scan_result: Option<ScanResult>,
    #[serde(default)]
    pub conversation_history: Vec<Exchange>,
}

/// A reply the user starred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedResponse {
    pub response: String,
    pub timestamp: String,
    #[serde(default)]
    pub page: String,
}

impl SavedResponse {
    pub fn new(response: impl Into<String>, page: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            timestamp: now_rfc3339(),
            page: page.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_uses_stable_field_names() {
        let exchange = Exchange {
            query: "q".to_string(),
            response: "r".to_string(),
            timestamp: "2024-01-01T00:00:00+00:00".to_string(),
            language: "hi-IN".to_string(),
        };
        let value = serde_json::to_value(&exchange).unwrap();
        assert_eq!(value["query"], "q");
        assert_eq!(value["response"], "r");
        assert_eq!(value["timestamp"], "2024-01-01T00:00:00+00:00");
        assert_eq!(value["language"], "hi-IN");
    }

    #[test]
    fn exchange_timestamp_is_rfc3339() {
        let exchange = Exchange::new("q", "r", "en-IN");
        assert!(chrono::DateTime::parse_from_rfc3339(&exchange.timestamp).is_ok());
    }

    #[test]
    fn request_omits_missing_scan_result() {
        let request = VoiceQueryRequest {
            query: "hello".to_string(),
            language: "en-IN".to_string(),
            scan_result: None,
            conversation_history: Vec::new(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("scan_result").is_none());
        assert!(value["conversation_history"].as_array().unwrap().is_empty());
    }

    #[test]
    fn stored_history_ignores_unknown_fields() {
        let raw = r#"[{"query":"a","response":"b","timestamp":"t","extra":1}]"#;
        let history: Vec<Exchange> = serde_json::from_str(raw).unwrap();
        assert_eq!(history[0].language, "");
    }
}
