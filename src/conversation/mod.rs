//! Voice conversation core.
//!
//! Owns the bounded exchange history, the per-topic context memory and the
//! ticket bookkeeping that makes the newest utterance win. The HTTP call
//! itself happens elsewhere; this module only builds requests and folds
//! outcomes back into state.

pub mod models;
pub mod topics;

use crate::api::{ApiError, VoiceQueryResponse};
use crate::constants::{
    DEFAULT_VOICE_LANGUAGE, HISTORY_LIMIT, REGIONAL_VOICE_LANGUAGE, REQUEST_HISTORY_WINDOW,
    SAVED_RESPONSES_LIMIT, STORAGE_KEY_HISTORY, STORAGE_KEY_SAVED,
};
use crate::errors::AppError;
use crate::i18n::TranslationTable;
use crate::storage::{load_or_default, save_logged, SharedStore};
use crate::util::{now_ms, primary_subtag};
use models::{ContextEntry, Exchange, SavedResponse, ScanResult, Topic, VoiceQueryRequest};
use std::collections::HashMap;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Enriching,
    AwaitingResponse,
}

/// Identifies one in-flight query. Later tickets compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingQuery {
    pub ticket: Ticket,
    pub utterance: String,
    pub request: VoiceQueryRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Backend answered; the exchange is now in history.
    Answered { query: String, response: String },
    /// Backend failed; canned advice, nothing recorded.
    Fallback { query: String, response: String },
    /// A newer query superseded this one.
    Stale,
}

impl Resolution {
    pub fn reply(&self) -> Option<&str> {
        match self {
            Resolution::Answered { response, .. } | Resolution::Fallback { response, .. } => {
                Some(response)
            }
            Resolution::Stale => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Resolution::Stale)
    }
}

pub struct ConversationManager {
    store: SharedStore,
    history: Vec<Exchange>,
    memory: HashMap<Topic, ContextEntry>,
    saved: Vec<SavedResponse>,
    state: SessionState,
    last_ticket: u64,
    /// Ticket, utterance and the language it was asked in.
    pending: Option<(Ticket, String, String)>,
    language: String,
    scan: Option<ScanResult>,
}

impl ConversationManager {
    /// Load persisted history and saved replies; anything unreadable starts empty.
    pub fn new(store: SharedStore, language: &str) -> Self {
        let mut history: Vec<Exchange> = load_or_default(store.as_ref(), STORAGE_KEY_HISTORY);
        truncate_front(&mut history, HISTORY_LIMIT);
        let mut saved: Vec<SavedResponse> = load_or_default(store.as_ref(), STORAGE_KEY_SAVED);
        truncate_front(&mut saved, SAVED_RESPONSES_LIMIT);
        info!(
            "Conversation loaded: {} exchanges, {} saved replies",
            history.len(),
            saved.len()
        );
        let language = if language.trim().is_empty() {
            DEFAULT_VOICE_LANGUAGE.to_string()
        } else {
            language.trim().to_string()
        };
        Self {
            store,
            history,
            memory: HashMap::new(),
            saved,
            state: SessionState::Idle,
            last_ticket: 0,
            pending: None,
            language,
            scan: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn history(&self) -> &[Exchange] {
        &self.history
    }

    pub fn memory(&self, topic: Topic) -> Option<&ContextEntry> {
        self.memory.get(&topic)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, tag: &str) {
        let tag = tag.trim();
        if tag.is_empty() {
            return;
        }
        info!("Voice language set to {}", tag);
        self.language = tag.to_string();
    }

    /// Flip between Hindi and Indian English.
    pub fn toggle_language(&mut self) -> &str {
        let next = if primary_subtag(&self.language) == "hi" {
            REGIONAL_VOICE_LANGUAGE
        } else {
            DEFAULT_VOICE_LANGUAGE
        };
        self.set_language(next);
        &self.language
    }

    pub fn set_scan_context(&mut self, scan: Option<ScanResult>) {
        self.scan = scan;
    }

    /// Ticket the next `begin` will hand out.
    pub fn next_ticket(&self) -> Ticket {
        Ticket(self.last_ticket + 1)
    }

    /// Start a query for `utterance`. Supersedes any query still in flight.
    pub fn begin(&mut self, utterance: &str) -> Result<PendingQuery, AppError> {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return Err(AppError::Validation("empty utterance".to_string()));
        }
        if let Some((ticket, _, _)) = &self.pending {
            debug!("Query {} superseded", ticket.value());
        }
        self.state = SessionState::Enriching;
        self.last_ticket += 1;
        let ticket = Ticket(self.last_ticket);

        let query = topics::enrich(utterance, self.history.last());
        let window_start = self.history.len().saturating_sub(REQUEST_HISTORY_WINDOW);
        let request = VoiceQueryRequest {
            query,
            language: self.language.clone(),
            scan_result: self.scan.clone(),
            conversation_history: self.history[window_start..].to_vec(),
        };

        self.pending = Some((ticket, utterance.to_string(), self.language.clone()));
        self.state = SessionState::AwaitingResponse;
        Ok(PendingQuery {
            ticket,
            utterance: utterance.to_string(),
            request,
        })
    }

    /// Fold a backend outcome into the session. Only the newest pending
    /// ticket counts; anything else is `Stale` and changes nothing.
    pub fn resolve(
        &mut self,
        ticket: Ticket,
        outcome: Result<VoiceQueryResponse, ApiError>,
        table: &TranslationTable,
    ) -> Resolution {
        let (utterance, language) = match self.pending.take() {
            Some((pending, utterance, language)) if pending == ticket => (utterance, language),
            other => {
                self.pending = other;
                debug!("Discarding stale reply for query {}", ticket.value());
                return Resolution::Stale;
            }
        };
        self.state = SessionState::Idle;

        match outcome {
            Ok(reply) if reply.success && !reply.response.trim().is_empty() => {
                self.record(&utterance, &reply.response, &language);
                Resolution::Answered {
                    query: utterance,
                    response: reply.response,
                }
            }
            Ok(_) => {
                warn!("Voice query returned no answer, using fallback");
                self.fallback(utterance, table)
            }
            Err(e) => {
                warn!("Voice query failed, using fallback: {}", e);
                self.fallback(utterance, table)
            }
        }
    }

    fn fallback(&self, utterance: String, table: &TranslationTable) -> Resolution {
        let key = topics::fallback_key(&utterance, self.memory.contains_key(&Topic::Disease));
        let response = table.lookup(key, &primary_subtag(&self.language));
        Resolution::Fallback {
            query: utterance,
            response,
        }
    }

    fn record(&mut self, utterance: &str, response: &str, language: &str) {
        let exchange = Exchange::new(utterance, response, language);
        let captured_at_ms = now_ms();
        for topic in topics::matching_topics(utterance) {
            self.memory.insert(
                topic,
                ContextEntry {
                    exchange: exchange.clone(),
                    captured_at_ms,
                },
            );
        }
        self.history.push(exchange);
        truncate_front(&mut self.history, HISTORY_LIMIT);
        save_logged(self.store.as_ref(), STORAGE_KEY_HISTORY, &self.history);
    }

    pub fn save_response(&mut self, response: &str, page: &str) -> bool {
        if response.trim().is_empty() {
            return false;
        }
        self.saved.push(SavedResponse::new(response, page));
        truncate_front(&mut self.saved, SAVED_RESPONSES_LIMIT);
        save_logged(self.store.as_ref(), STORAGE_KEY_SAVED, &self.saved)
    }

    pub fn saved_responses(&self) -> &[SavedResponse] {
        &self.saved
    }

    /// Forget the session in memory. Stored history is left alone.
    pub fn end_session(&mut self) {
        self.history.clear();
        self.memory.clear();
        self.pending = None;
        self.scan = None;
        self.state = SessionState::Idle;
        info!("Conversation session ended");
    }
}

fn truncate_front<T>(items: &mut Vec<T>, limit: usize) {
    if items.len() > limit {
        let excess = items.len() - limit;
        items.drain(..excess);
    }
}
