// Backend collaborator client
// Blocking JSON calls against the assistant backend:
// - POST /api/voice-query
// - GET /api/dashboard-data, /api/alerts, /api/market-insights
// Callers run these on worker threads; nothing here touches presentation.

use crate::conversation::models::VoiceQueryRequest;
use crate::errors::AppError;
use crate::settings::Settings;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

// ============================================================================
// Endpoints
// ============================================================================

pub const VOICE_QUERY_PATH: &str = "/api/voice-query";
pub const DASHBOARD_PATH: &str = "/api/dashboard-data";
pub const ALERTS_PATH: &str = "/api/alerts";
pub const INSIGHTS_PATH: &str = "/api/market-insights";

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceQueryResponse {
  pub success: bool,
  #[serde(default)]
  pub response: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
  #[serde(default)]
  pub city: Option<String>,
  pub temperature: f64,
  #[serde(default)]
  pub condition: String,
  #[serde(default)]
  pub humidity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPrice {
  pub commodity: String,
  pub modal_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
  pub success: bool,
  #[serde(default)]
  pub weather: Option<Weather>,
  #[serde(default)]
  pub market_data: Vec<MarketPrice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAlert {
  #[serde(rename = "type", default)]
  pub kind: String,
  pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertsResponse {
  pub success: bool,
  #[serde(default)]
  pub alerts: Vec<PriceAlert>,
  #[serde(default)]
  pub summary: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
  pub crop: String,
  pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsResponse {
  pub success: bool,
  #[serde(default)]
  pub insights: Vec<Insight>,
}

/// Transport-level failures of a backend call
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
  /// Nothing listening at the base URL
  Unreachable(String),
  /// Request exceeded the configured timeout
  Timeout(String),
  /// Non-2xx status with body
  Server(u16, String),
  /// Other network failure
  Connection(String),
  /// Body was not the expected JSON
  Parse(String),
  /// Well-formed reply with `success: false`
  Unsuccessful,
}

impl std::fmt::Display for ApiError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ApiError::Unreachable(msg) => write!(f, "Backend unreachable: {}", msg),
      ApiError::Timeout(msg) => write!(f, "Request timed out: {}", msg),
      ApiError::Server(code, msg) => write!(f, "Server error {}: {}", code, msg),
      ApiError::Connection(msg) => write!(f, "Connection error: {}", msg),
      ApiError::Parse(msg) => write!(f, "Parse error: {}", msg),
      ApiError::Unsuccessful => write!(f, "Backend reported failure"),
    }
  }
}

impl std::error::Error for ApiError {}

impl From<ApiError> for AppError {
  fn from(err: ApiError) -> Self {
    AppError::Network(err.to_string())
  }
}

// ============================================================================
// Client
// ============================================================================

pub trait KrishiApi: Send + Sync {
  fn voice_query(&self, request: &VoiceQueryRequest) -> Result<VoiceQueryResponse, ApiError>;
  fn dashboard_data(&self) -> Result<DashboardData, ApiError>;
  fn alerts(&self) -> Result<AlertsResponse, ApiError>;
  fn market_insights(&self) -> Result<InsightsResponse, ApiError>;
}

/// ureq-backed client rooted at `Settings::api_base_url`
pub struct HttpApi {
  agent: ureq::Agent,
  voice_query_url: String,
  dashboard_url: String,
  alerts_url: String,
  insights_url: String,
}

impl HttpApi {
  pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
    let agent = ureq::AgentBuilder::new()
      .timeout_connect(Duration::from_millis(settings.connect_timeout_ms))
      .timeout(Duration::from_millis(settings.request_timeout_ms))
      .build();
    let client = Self {
      agent,
      voice_query_url: settings.endpoint(VOICE_QUERY_PATH)?,
      dashboard_url: settings.endpoint(DASHBOARD_PATH)?,
      alerts_url: settings.endpoint(ALERTS_PATH)?,
      insights_url: settings.endpoint(INSIGHTS_PATH)?,
    };
    info!("Backend client ready at {}", settings.api_base_url);
    Ok(client)
  }

  fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
    debug!("GET {}", url);
    let response = self.agent.get(url).call().map_err(map_ureq_error)?;
    response
      .into_json()
      .map_err(|e| ApiError::Parse(e.to_string()))
  }
}

fn map_ureq_error(err: ureq::Error) -> ApiError {
  match err {
    ureq::Error::Transport(t) => match t.kind() {
      ureq::ErrorKind::ConnectionFailed | ureq::ErrorKind::Dns => {
        ApiError::Unreachable(t.to_string())
      }
      ureq::ErrorKind::Io if is_timeout(&t) => ApiError::Timeout(t.to_string()),
      _ => ApiError::Connection(t.to_string()),
    },
    ureq::Error::Status(code, resp) => {
      let body = resp.into_string().unwrap_or_default();
      ApiError::Server(code, body)
    }
  }
}

/// Socket deadlines surface as `TimedOut` or, on some platforms, `WouldBlock`.
fn is_timeout(t: &ureq::Transport) -> bool {
  let mut source = std::error::Error::source(t);
  while let Some(err) = source {
    if let Some(io) = err.downcast_ref::<std::io::Error>() {
      return matches!(
        io.kind(),
        std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
      );
    }
    source = err.source();
  }
  false
}

/// `success: false` is a failure like any other.
fn require_success<T>(success: bool, value: T, what: &str) -> Result<T, ApiError> {
  if success {
    Ok(value)
  } else {
    warn!("{} returned success=false", what);
    Err(ApiError::Unsuccessful)
  }
}

impl KrishiApi for HttpApi {
  fn voice_query(&self, request: &VoiceQueryRequest) -> Result<VoiceQueryResponse, ApiError> {
    debug!(
      "POST {} ({} chars, {} history entries)",
      self.voice_query_url,
      request.query.chars().count(),
      request.conversation_history.len()
    );
    let response = self
      .agent
      .post(&self.voice_query_url)
      .send_json(request)
      .map_err(map_ureq_error)?;
    let reply: VoiceQueryResponse = response
      .into_json()
      .map_err(|e| ApiError::Parse(e.to_string()))?;
    let success = reply.success;
    require_success(success, reply, "voice-query")
  }

  fn dashboard_data(&self) -> Result<DashboardData, ApiError> {
    let data: DashboardData = self.get_json(&self.dashboard_url)?;
    let success = data.success;
    require_success(success, data, "dashboard-data")
  }

  fn alerts(&self) -> Result<AlertsResponse, ApiError> {
    let alerts: AlertsResponse = self.get_json(&self.alerts_url)?;
    let success = alerts.success;
    require_success(success, alerts, "alerts")
  }

  fn market_insights(&self) -> Result<InsightsResponse, ApiError> {
    let insights: InsightsResponse = self.get_json(&self.insights_url)?;
    let success = insights.success;
    require_success(success, insights, "market-insights")
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use std::sync::Mutex;

  /// Scripted backend: each call pops the next queued voice reply.
  #[derive(Default)]
  pub(crate) struct FakeApi {
    pub(crate) voice: Mutex<Vec<Result<VoiceQueryResponse, ApiError>>>,
    pub(crate) requests: Mutex<Vec<VoiceQueryRequest>>,
    pub(crate) dashboard: Option<Result<DashboardData, ApiError>>,
    pub(crate) alerts: Option<Result<AlertsResponse, ApiError>>,
    pub(crate) insights: Option<Result<InsightsResponse, ApiError>>,
  }

  impl FakeApi {
    pub(crate) fn answering(replies: &[&str]) -> Self {
      let voice = replies
        .iter()
        .rev()
        .map(|r| {
          Ok(VoiceQueryResponse {
            success: true,
            response: r.to_string(),
          })
        })
        .collect();
      Self {
        voice: Mutex::new(voice),
        ..Self::default()
      }
    }

    pub(crate) fn failing() -> Self {
      Self {
        voice: Mutex::new(vec![Err(ApiError::Unreachable("offline".to_string()))]),
        ..Self::default()
      }
    }
  }

  impl KrishiApi for FakeApi {
    fn voice_query(&self, request: &VoiceQueryRequest) -> Result<VoiceQueryResponse, ApiError> {
      self.requests.lock().unwrap().push(request.clone());
      self
        .voice
        .lock()
        .unwrap()
        .pop()
        .unwrap_or(Err(ApiError::Unreachable("no scripted reply".to_string())))
    }

    fn dashboard_data(&self) -> Result<DashboardData, ApiError> {
      self
        .dashboard
        .clone()
        .unwrap_or(Err(ApiError::Unreachable("offline".to_string())))
    }

    fn alerts(&self) -> Result<AlertsResponse, ApiError> {
      self
        .alerts
        .clone()
        .unwrap_or(Err(ApiError::Unreachable("offline".to_string())))
    }

    fn market_insights(&self) -> Result<InsightsResponse, ApiError> {
      self
        .insights
        .clone()
        .unwrap_or(Err(ApiError::Unreachable("offline".to_string())))
    }
  }

  #[test]
  fn voice_reply_tolerates_missing_response_field() {
    let reply: VoiceQueryResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
    assert!(!reply.success);
    assert!(reply.response.is_empty());
  }

  #[test]
  fn dashboard_payload_parses_with_unknown_fields() {
    let raw = r#"{
      "success": true,
      "weather": {"city": "Nashik", "temperature": 31.5, "condition": "Sunny", "humidity": 40, "wind": 3},
      "market_data": [{"commodity": "Onion", "modal_price": 1850, "market": "Lasalgaon"}]
    }"#;
    let data: DashboardData = serde_json::from_str(raw).unwrap();
    assert_eq!(data.weather.unwrap().city.as_deref(), Some("Nashik"));
    assert_eq!(data.market_data[0].commodity, "Onion");
  }

  #[test]
  fn alert_type_field_maps_to_kind() {
    let raw = r#"{"success": true, "alerts": [{"type": "price_spike", "message": "Onion up 20%"}]}"#;
    let alerts: AlertsResponse = serde_json::from_str(raw).unwrap();
    assert_eq!(alerts.alerts[0].kind, "price_spike");
    assert!(alerts.summary.is_none());
  }

  #[test]
  fn unsuccessful_replies_become_errors() {
    assert_eq!(require_success(false, (), "x"), Err(ApiError::Unsuccessful));
    assert_eq!(require_success(true, 5, "x"), Ok(5));
  }

  #[test]
  fn api_errors_convert_to_network_errors() {
    let err: AppError = ApiError::Server(502, "bad gateway".to_string()).into();
    assert!(matches!(err, AppError::Network(ref m) if m.contains("502")));
  }

  #[test]
  fn client_builds_endpoints_from_settings() {
    let settings = Settings {
      api_base_url: "http://10.0.0.5:8080".to_string(),
      ..Settings::default()
    };
    let client = HttpApi::from_settings(&settings).unwrap();
    assert_eq!(client.voice_query_url, "http://10.0.0.5:8080/api/voice-query");
    assert_eq!(client.insights_url, "http://10.0.0.5:8080/api/market-insights");
  }

  #[test]
  fn unreachable_backend_maps_to_transport_error() {
    let settings = Settings {
      api_base_url: "http://127.0.0.1:9".to_string(),
      connect_timeout_ms: 500,
      request_timeout_ms: 1000,
      ..Settings::default()
    };
    let client = HttpApi::from_settings(&settings).unwrap();
    let err = client.dashboard_data().unwrap_err();
    assert!(matches!(
      err,
      ApiError::Unreachable(_) | ApiError::Connection(_) | ApiError::Timeout(_)
    ));
  }

  #[test]
  fn silent_backend_maps_to_timeout() {
    // connections queue in the backlog and never get a reply
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let settings = Settings {
      api_base_url: format!("http://{}", listener.local_addr().unwrap()),
      connect_timeout_ms: 500,
      request_timeout_ms: 300,
      ..Settings::default()
    };
    let client = HttpApi::from_settings(&settings).unwrap();
    let err = client.alerts().unwrap_err();
    assert!(matches!(err, ApiError::Timeout(_)), "{:?}", err);
    drop(listener);
  }
}
