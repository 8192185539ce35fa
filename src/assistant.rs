// Voice assistant driver
// Runs each voice query on a worker thread and folds completions back into
// the conversation on the owner's thread. Only the newest query's reply is
// rendered and spoken.

use crate::api::{ApiError, KrishiApi, VoiceQueryResponse};
use crate::conversation::models::ScanResult;
use crate::conversation::{ConversationManager, Resolution, Ticket};
use crate::errors::AppError;
use crate::i18n::TranslationTable;
use crate::util::primary_subtag;
use crate::voice::VoiceIo;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

type Completion = (Ticket, Result<VoiceQueryResponse, ApiError>);

const FOLLOW_UP_QUESTIONS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
  pub query: String,
  pub response: String,
  pub from_fallback: bool,
}

pub struct VoiceAssistant {
  api: Arc<dyn KrishiApi>,
  conversation: ConversationManager,
  voice: VoiceIo,
  table: TranslationTable,
  tx: Sender<Completion>,
  rx: Receiver<Completion>,
  in_flight: usize,
}

impl VoiceAssistant {
  pub fn new(api: Arc<dyn KrishiApi>, conversation: ConversationManager, voice: VoiceIo) -> Self {
    let (tx, rx) = mpsc::channel();
    Self {
      api,
      conversation,
      voice,
      table: TranslationTable::builtin(),
      tx,
      rx,
      in_flight: 0,
    }
  }

  pub fn conversation(&self) -> &ConversationManager {
    &self.conversation
  }

  pub fn voice_mut(&mut self) -> &mut VoiceIo {
    &mut self.voice
  }

  pub fn is_busy(&self) -> bool {
    self.in_flight > 0
  }

  /// Voice language for capture, synthesis and the backend.
  pub fn set_language(&mut self, tag: &str) {
    self.conversation.set_language(tag);
    self.voice.set_language(tag);
  }

  pub fn toggle_language(&mut self) -> String {
    let tag = self.conversation.toggle_language().to_string();
    self.voice.set_language(&tag);
    tag
  }

  pub fn set_scan_context(&mut self, scan: Option<ScanResult>) {
    self.conversation.set_scan_context(scan);
  }

  pub fn save_response(&mut self, response: &str, page: &str) -> bool {
    self.conversation.save_response(response, page)
  }

  /// Send `utterance` to the backend. Supersedes any query in flight.
  pub fn submit(&mut self, utterance: &str) -> Result<Ticket, AppError> {
    let pending = self.conversation.begin(utterance)?;
    let api = Arc::clone(&self.api);
    let tx = self.tx.clone();
    let ticket = pending.ticket;
    let request = pending.request;
    self.in_flight += 1;
    info!("Submitting voice query {}", ticket.value());
    thread::spawn(move || {
      let outcome = api.voice_query(&request);
      let _ = tx.send((ticket, outcome));
    });
    Ok(ticket)
  }

  /// Submit one of the suggested follow-up questions in the session
  /// language. The choice rotates with the ticket.
  pub fn ask_follow_up(&mut self) -> Result<Ticket, AppError> {
    let index = self.conversation.next_ticket().value() % FOLLOW_UP_QUESTIONS;
    let language = primary_subtag(self.conversation.language());
    let question = self.table.lookup(&format!("follow_up.{}", index), &language);
    self.submit(&question)
  }

  /// Capture one utterance and submit it.
  pub fn listen_and_submit(&mut self) -> Result<Ticket, AppError> {
    let transcript = self.voice.listen()?;
    self.submit(&transcript)
  }

  /// Drain finished queries without blocking. Returns the current reply, if
  /// one arrived.
  pub fn poll(&mut self) -> Option<Reply> {
    let mut latest = None;
    while let Ok(completion) = self.rx.try_recv() {
      if let Some(reply) = self.complete(completion) {
        latest = Some(reply);
      }
    }
    latest
  }

  /// Block until the current query resolves or `timeout` elapses.
  pub fn wait(&mut self, timeout: Duration) -> Option<Reply> {
    let deadline = Instant::now() + timeout;
    loop {
      let remaining = deadline.saturating_duration_since(Instant::now());
      match self.rx.recv_timeout(remaining) {
        Ok(completion) => {
          if let Some(reply) = self.complete(completion) {
            return Some(reply);
          }
        }
        Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => return None,
      }
    }
  }

  fn complete(&mut self, (ticket, outcome): Completion) -> Option<Reply> {
    self.in_flight = self.in_flight.saturating_sub(1);
    let reply = match self.conversation.resolve(ticket, outcome, &self.table) {
      Resolution::Answered { query, response } => Reply {
        query,
        response,
        from_fallback: false,
      },
      Resolution::Fallback { query, response } => Reply {
        query,
        response,
        from_fallback: true,
      },
      Resolution::Stale => return None,
    };
    debug!("Query {} resolved (fallback: {})", ticket.value(), reply.from_fallback);
    self.voice.speak(&reply.response);
    Some(reply)
  }

  pub fn end_session(&mut self) {
    self.voice.stop();
    self.conversation.end_session();
    // replies still in flight will resolve as stale
    while self.rx.try_recv().is_ok() {}
    self.in_flight = 0;
  }
}
