// Dashboard loader
// Fetches the main dashboard payload, then alerts, then market insights, and
// turns each section into a panel. A failed section becomes a visible
// degraded panel so nothing is left blank.

use crate::api::{AlertsResponse, ApiError, DashboardData, Insight, InsightsResponse, KrishiApi, PriceAlert};
use crate::i18n::{format_currency, format_number, TranslationStore};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardSection {
  Weather,
  Market,
  Alerts,
  Insights,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRow {
  pub commodity: String,
  pub price: String, // formatted, e.g. "₹1,850"
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "panel", rename_all = "snake_case")]
pub enum DashboardPanel {
  Weather {
    city: String,
    temperature: String,
    condition: String,
    humidity: Option<String>,
  },
  Market {
    title: String,
    prices: Vec<PriceRow>,
    empty_message: Option<String>,
  },
  Alerts {
    title: String,
    alerts: Vec<PriceAlert>,
    empty_message: Option<String>,
  },
  Insights {
    title: String,
    insights: Vec<Insight>,
    empty_message: Option<String>,
  },
  Degraded {
    section: DashboardSection,
    message: String,
  },
}

/// Raw results of the three dashboard calls.
#[derive(Debug, Clone)]
pub struct DashboardFetch {
  pub main: Result<DashboardData, ApiError>,
  pub alerts: Result<AlertsResponse, ApiError>,
  pub insights: Result<InsightsResponse, ApiError>,
}

/// Run the three calls in order.
pub fn fetch_dashboard(api: &dyn KrishiApi) -> DashboardFetch {
  let main = api.dashboard_data();
  let alerts = api.alerts();
  let insights = api.market_insights();
  info!(
    "Dashboard fetched (main ok: {}, alerts ok: {}, insights ok: {})",
    main.is_ok(),
    alerts.is_ok(),
    insights.is_ok()
  );
  DashboardFetch {
    main,
    alerts,
    insights,
  }
}

/// `fetch_dashboard` on a worker thread.
pub fn spawn_fetch(api: Arc<dyn KrishiApi>) -> Receiver<DashboardFetch> {
  let (tx, rx) = mpsc::sync_channel(1);
  thread::spawn(move || {
    let _ = tx.send(fetch_dashboard(api.as_ref()));
  });
  rx
}

fn main_failure_message(err: &ApiError, strings: &TranslationStore) -> String {
  match err {
    ApiError::Unsuccessful | ApiError::Server(..) | ApiError::Parse(_) => {
      strings.text("dashboard.load_failed")
    }
    _ => strings.text("dashboard.network_error"),
  }
}

fn non_empty(empty: bool, strings: &TranslationStore, key: &str) -> Option<String> {
  if empty {
    Some(strings.text(key))
  } else {
    None
  }
}

/// Build panels in render order: weather, market, alerts, insights.
pub fn panels(fetch: &DashboardFetch, strings: &TranslationStore) -> Vec<DashboardPanel> {
  let mut out = Vec::with_capacity(4);

  match &fetch.main {
    Ok(data) => {
      match &data.weather {
        Some(weather) => out.push(DashboardPanel::Weather {
          city: weather
            .city
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| strings.text("dashboard.your_location")),
          temperature: format!("{}°C", weather.temperature.round()),
          condition: weather.condition.clone(),
          humidity: weather.humidity.map(|h| format!("{}%", format_number(h))),
        }),
        None => out.push(DashboardPanel::Degraded {
          section: DashboardSection::Weather,
          message: strings.text("dashboard.load_failed"),
        }),
      }
      let prices: Vec<PriceRow> = data
        .market_data
        .iter()
        .map(|p| PriceRow {
          commodity: p.commodity.clone(),
          price: format_currency(p.modal_price),
        })
        .collect();
      out.push(DashboardPanel::Market {
        title: strings.text("dashboard.market_title"),
        empty_message: non_empty(prices.is_empty(), strings, "dashboard.no_market_data"),
        prices,
      });
    }
    Err(e) => {
      warn!("Dashboard data unavailable: {}", e);
      let message = main_failure_message(e, strings);
      out.push(DashboardPanel::Degraded {
        section: DashboardSection::Weather,
        message: message.clone(),
      });
      out.push(DashboardPanel::Degraded {
        section: DashboardSection::Market,
        message,
      });
    }
  }

  match &fetch.alerts {
    Ok(resp) => out.push(DashboardPanel::Alerts {
      title: strings.text("dashboard.alerts_title"),
      empty_message: non_empty(resp.alerts.is_empty(), strings, "dashboard.no_alerts"),
      alerts: resp.alerts.clone(),
    }),
    Err(e) => {
      warn!("Alerts unavailable: {}", e);
      out.push(DashboardPanel::Degraded {
        section: DashboardSection::Alerts,
        message: strings.text("dashboard.alerts_unavailable"),
      });
    }
  }

  match &fetch.insights {
    Ok(resp) => out.push(DashboardPanel::Insights {
      title: strings.text("dashboard.insights_title"),
      empty_message: non_empty(resp.insights.is_empty(), strings, "dashboard.no_insights"),
      insights: resp.insights.clone(),
    }),
    Err(e) => {
      warn!("Insights unavailable: {}", e);
      out.push(DashboardPanel::Degraded {
        section: DashboardSection::Insights,
        message: strings.text("dashboard.insights_unavailable"),
      });
    }
  }

  out
}
