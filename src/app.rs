//! Session context.
//!
//! `App` owns every component of one page session and is the only thing a
//! host talks to: it forwards platform events in, and everything visible
//! goes out through the host's [`Presenter`]. Background work (HTTP,
//! previews) completes through [`App::poll`] on the owner's thread.

use crate::api::KrishiApi;
use crate::assistant::{Reply, VoiceAssistant};
use crate::conversation::models::ScanResult;
use crate::conversation::{ConversationManager, Ticket};
use crate::dashboard::{panels, spawn_fetch, DashboardFetch};
use crate::errors::{AppError, ErrorEvent};
use crate::i18n::{TranslationStore, TranslationTable};
use crate::notify::{NotificationKind, Notifier};
use crate::page::{contextual_hints, PageRegistry, PageType};
use crate::presenter::{Effect, Presenter, TextBinding, View, VoiceStatus};
use crate::settings::Settings;
use crate::storage::SharedStore;
use crate::upload::{validate, PreviewTask, UploadCandidate, Validation};
use crate::voice::{CaptureError, SpeechRecognizer, SpeechSynthesizer, VoiceIo};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Platform collaborators handed to [`App::new`].
pub struct AppDeps {
    pub store: SharedStore,
    pub api: Arc<dyn KrishiApi>,
    pub recognizer: Box<dyn SpeechRecognizer>,
    pub synthesizer: Box<dyn SpeechSynthesizer>,
    pub presenter: Box<dyn Presenter>,
}

pub struct App {
    api: Arc<dyn KrishiApi>,
    strings: TranslationStore,
    notifier: Notifier,
    assistant: VoiceAssistant,
    presenter: Box<dyn Presenter>,
    registry: PageRegistry,
    page: PageType,
    online: bool,
    preview: Option<PreviewTask>,
    dashboard: Option<Receiver<DashboardFetch>>,
    last_reply: Option<Reply>,
    last_error: Option<ErrorEvent>,
}

impl App {
    pub fn new(settings: &Settings, deps: AppDeps) -> Self {
        let strings = TranslationStore::new(TranslationTable::builtin(), &settings.ui_language)
            .with_storage(deps.store.clone());
        let conversation = ConversationManager::new(deps.store, &settings.voice_language);
        let voice = VoiceIo::new(deps.recognizer, deps.synthesizer, settings);
        let assistant = VoiceAssistant::new(deps.api.clone(), conversation, voice);
        Self {
            api: deps.api,
            strings,
            notifier: Notifier::new(settings.notification_duration_ms),
            assistant,
            presenter: deps.presenter,
            registry: PageRegistry::standard(),
            page: PageType::Home,
            online: true,
            preview: None,
            dashboard: None,
            last_reply: None,
            last_error: None,
        }
    }

    /// Resolve the page from `path` and run its initializer.
    pub fn start(&mut self, path: &str) {
        self.page = PageType::from_path(path);
        info!("Starting page {}", self.page.as_str());
        self.animate(Effect::FadeIn {
            target: "main-content".to_string(),
        });
        self.presenter.render(&View::Page { page: self.page });
        self.render_connectivity();
        self.render_voice_status(VoiceStatus::Idle);
        let registry = std::mem::replace(&mut self.registry, PageRegistry::standard());
        registry.dispatch(self.page, self);
        self.registry = registry;
    }

    pub fn page(&self) -> PageType {
        self.page
    }

    pub fn registry_mut(&mut self) -> &mut PageRegistry {
        &mut self.registry
    }

    pub fn strings(&self) -> &TranslationStore {
        &self.strings
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn last_reply(&self) -> Option<&Reply> {
        self.last_reply.as_ref()
    }

    pub fn last_error(&self) -> Option<&ErrorEvent> {
        self.last_error.as_ref()
    }

    pub fn assistant(&self) -> &VoiceAssistant {
        &self.assistant
    }

    pub fn bind_text(&mut self, binding: TextBinding) {
        self.strings.bind(binding, self.presenter.as_mut());
    }

    /// Switch the UI language; every bound element re-renders.
    pub fn set_language(&mut self, code: &str) -> bool {
        let changed = self.strings.set_language(code, self.presenter.as_mut());
        if changed {
            self.show_hints();
        }
        changed
    }

    pub fn toggle_voice_language(&mut self) -> String {
        self.assistant.toggle_language()
    }

    pub fn set_online(&mut self, online: bool) {
        if online == self.online {
            return;
        }
        self.online = online;
        let (key, kind) = if online {
            ("net.online", NotificationKind::Success)
        } else {
            ("net.offline", NotificationKind::Warning)
        };
        self.notifier
            .show_key(key, kind, &self.strings, self.presenter.as_mut());
        self.render_connectivity();
    }

    pub(crate) fn animate(&mut self, effect: Effect) {
        self.presenter.animate(&effect);
    }

    pub(crate) fn load_dashboard(&mut self) {
        self.dashboard = Some(spawn_fetch(Arc::clone(&self.api)));
    }

    pub(crate) fn show_hints(&mut self) {
        let hints = contextual_hints(self.page)
            .iter()
            .map(|key| self.strings.text(key))
            .collect();
        self.presenter.render(&View::Hints {
            header: self.strings.text("hint.header"),
            hints,
        });
    }

    pub(crate) fn clear_upload(&mut self) {
        self.preview = None;
        self.presenter.render(&View::UploadCleared);
    }

    /// Validate a picked file and start its preview.
    pub fn select_upload(&mut self, candidate: UploadCandidate) -> Result<(), AppError> {
        match validate(candidate) {
            Validation::Rejected(reason) => {
                self.notifier.show_key(
                    reason.message_key(),
                    NotificationKind::Error,
                    &self.strings,
                    self.presenter.as_mut(),
                );
                let err: AppError = reason.into();
                self.record_error(err.clone(), "upload");
                Err(err)
            }
            Validation::Accepted(accepted) => {
                self.notifier.show_key(
                    "upload.selected",
                    NotificationKind::Success,
                    &self.strings,
                    self.presenter.as_mut(),
                );
                self.preview = Some(accepted.into_preview());
                Ok(())
            }
        }
    }

    /// Camera capture result; frames go through the same validation as files.
    pub fn camera_frame(&mut self, frame: Result<Vec<u8>, CaptureError>) -> Result<(), AppError> {
        match frame {
            Ok(bytes) => self.select_upload(UploadCandidate::from_camera_frame(bytes)),
            Err(e) => Err(self.capture_failed(e)),
        }
    }

    pub fn set_scan_context(&mut self, scan: Option<ScanResult>) {
        self.assistant.set_scan_context(scan);
    }

    /// Send a typed or transcribed question.
    pub fn ask(&mut self, utterance: &str) -> Result<Ticket, AppError> {
        let ticket = self.assistant.submit(utterance)?;
        self.render_voice_status(VoiceStatus::Processing);
        Ok(ticket)
    }

    /// Send the next suggested follow-up question.
    pub fn ask_follow_up(&mut self) -> Result<Ticket, AppError> {
        let ticket = self.assistant.ask_follow_up()?;
        self.render_voice_status(VoiceStatus::Processing);
        Ok(ticket)
    }

    /// Capture one spoken question and send it.
    pub fn listen(&mut self) -> Result<Ticket, AppError> {
        self.render_voice_status(VoiceStatus::Listening);
        self.animate(Effect::Pulse {
            target: "voice-btn".to_string(),
        });
        match self.assistant.voice_mut().listen() {
            Ok(transcript) => self.ask(&transcript),
            Err(e) => {
                self.render_voice_status(VoiceStatus::Idle);
                Err(self.capture_failed(e))
            }
        }
    }

    /// The platform's voice catalog changed.
    pub fn voices_changed(&mut self) {
        self.assistant.voice_mut().on_voices_changed();
    }

    /// Apply every finished background task. Returns the reply rendered, if any.
    pub fn poll(&mut self) -> Option<Reply> {
        self.poll_preview();
        self.poll_dashboard();
        let reply = self.assistant.poll()?;
        self.show_reply(&reply);
        Some(reply)
    }

    /// Block for the current voice reply.
    pub fn wait_reply(&mut self, timeout: Duration) -> Option<Reply> {
        let reply = self.assistant.wait(timeout)?;
        self.show_reply(&reply);
        Some(reply)
    }

    /// Block until the pending preview settles, then apply it.
    pub fn wait_preview(&mut self) {
        if let Some(task) = self.preview.take() {
            let result = task.wait();
            self.apply_preview(result);
        }
    }

    /// Block until the dashboard fetch settles, then render it.
    pub fn wait_dashboard(&mut self) {
        if let Some(rx) = self.dashboard.take() {
            if let Ok(fetch) = rx.recv() {
                self.render_dashboard(&fetch);
            }
        }
    }

    pub fn save_last_response(&mut self) -> bool {
        let Some(reply) = self.last_reply.clone() else {
            return false;
        };
        let saved = self.assistant.save_response(&reply.response, self.page.as_str());
        if saved {
            self.notifier.show_key(
                "response.saved",
                NotificationKind::Success,
                &self.strings,
                self.presenter.as_mut(),
            );
        }
        saved
    }

    /// End the session: stop speech, forget the conversation, drop pending work.
    pub fn shutdown(&mut self) {
        self.assistant.end_session();
        self.notifier.dismiss(self.presenter.as_mut());
        self.strings.clear_bindings();
        self.preview = None;
        self.dashboard = None;
        self.last_reply = None;
        info!("Session shut down");
    }

    fn poll_preview(&mut self) {
        let Some(task) = self.preview.as_mut() else {
            return;
        };
        if let Some(result) = task.try_take() {
            self.preview = None;
            self.apply_preview(result);
        }
    }

    fn apply_preview(&mut self, result: Result<crate::upload::Preview, crate::upload::PreviewError>) {
        match result {
            Ok(preview) => {
                let caption = self
                    .strings
                    .text_with("upload.ready", &[("name", preview.file_name.as_str())]);
                self.presenter.render(&View::UploadPreview { preview, caption });
            }
            Err(e) => {
                self.notifier.show_key(
                    "upload.preview_failed",
                    NotificationKind::Error,
                    &self.strings,
                    self.presenter.as_mut(),
                );
                self.record_error(e.into(), "preview");
            }
        }
    }

    fn poll_dashboard(&mut self) {
        let Some(rx) = self.dashboard.as_ref() else {
            return;
        };
        match rx.try_recv() {
            Ok(fetch) => {
                self.dashboard = None;
                self.render_dashboard(&fetch);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                warn!("Dashboard worker exited without a result");
                self.dashboard = None;
            }
        }
    }

    fn render_dashboard(&mut self, fetch: &DashboardFetch) {
        for panel in panels(fetch, &self.strings) {
            self.presenter.render(&View::Panel { panel });
        }
    }

    fn show_reply(&mut self, reply: &Reply) {
        self.presenter.render(&View::Conversation {
            query_label: self.strings.text("voice.you_asked"),
            query: reply.query.clone(),
            response_label: self.strings.text("voice.assistant_label"),
            response: reply.response.clone(),
            from_fallback: reply.from_fallback,
        });
        self.render_voice_status(VoiceStatus::Speaking);
        self.last_reply = Some(reply.clone());
    }

    fn capture_failed(&mut self, err: CaptureError) -> AppError {
        self.notifier.show_key(
            err.translation_key(),
            NotificationKind::Error,
            &self.strings,
            self.presenter.as_mut(),
        );
        let app_err: AppError = err.into();
        self.record_error(app_err.clone(), "capture");
        app_err
    }

    fn record_error(&mut self, err: AppError, context: &str) {
        warn!("{} failed: {}", context, err);
        self.last_error = Some(ErrorEvent::new(err).with_context(context));
    }

    fn render_connectivity(&mut self) {
        self.presenter.render(&View::Connectivity {
            online: self.online,
        });
    }

    fn render_voice_status(&mut self, status: VoiceStatus) {
        let key = match status {
            VoiceStatus::Listening => "voice.listening",
            VoiceStatus::Processing => "loading",
            VoiceStatus::Speaking | VoiceStatus::Idle => "voice.speak_prompt",
        };
        self.presenter.render(&View::VoiceStatus {
            status,
            label: self.strings.text(key),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::FakeApi;
    use crate::dashboard::DashboardPanel;
    use crate::notify::Notification;
    use crate::presenter::testing::RecordingPresenter;
    use crate::storage::MemoryStore;
    use crate::upload::tests::png_bytes;
    use crate::upload::Preview;
    use crate::voice::tests::{voice, FakeSynth, ScriptedRecognizer};

    struct Harness {
        app: App,
        presenter: RecordingPresenter,
        synth: FakeSynth,
    }

    fn harness(api: FakeApi, heard: Vec<Result<String, CaptureError>>) -> Harness {
        let presenter = RecordingPresenter::default();
        let synth = FakeSynth::with_voices(vec![voice("Lekha", "hi-IN")]);
        let deps = AppDeps {
            store: Arc::new(MemoryStore::new()),
            api: Arc::new(api),
            recognizer: Box::new(ScriptedRecognizer::new(heard)),
            synthesizer: Box::new(synth.clone()),
            presenter: Box::new(presenter.clone()),
        };
        Harness {
            app: App::new(&Settings::default(), deps),
            presenter,
            synth,
        }
    }

    fn last_notification(presenter: &RecordingPresenter) -> Notification {
        presenter.notifications().last().cloned().unwrap()
    }

    #[test]
    fn start_resolves_page_and_shows_hints() {
        let mut h = harness(FakeApi::default(), vec![]);
        h.app.start("/market");
        assert_eq!(h.app.page(), PageType::Market);
        let views = h.presenter.views();
        assert!(views.contains(&View::Page {
            page: PageType::Market
        }));
        assert!(views.iter().any(|v| matches!(
            v,
            View::Hints { hints, .. } if hints[0] == "What are today's prices?"
        )));
        assert!(h.presenter.effects().contains(&Effect::FadeIn {
            target: "price-card".to_string()
        }));
    }

    #[test]
    fn dashboard_page_renders_degraded_panels_offline() {
        let mut h = harness(FakeApi::default(), vec![]);
        h.app.start("/dashboard");
        h.app.wait_dashboard();
        let panels: Vec<DashboardPanel> = h
            .presenter
            .views()
            .into_iter()
            .filter_map(|v| match v {
                View::Panel { panel } => Some(panel),
                _ => None,
            })
            .collect();
        assert_eq!(panels.len(), 4);
        assert!(panels
            .iter()
            .all(|p| matches!(p, DashboardPanel::Degraded { .. })));
    }

    #[test]
    fn rejected_upload_toasts_and_records_error() {
        let mut h = harness(FakeApi::default(), vec![]);
        h.app.start("/scanner");
        let err = h
            .app
            .select_upload(UploadCandidate::new(vec![0; 4], "application/pdf", "doc.pdf"))
            .unwrap_err();
        assert_eq!(err, AppError::Validation("unsupported-type".to_string()));
        let toast = last_notification(&h.presenter);
        assert_eq!(toast.kind, NotificationKind::Error);
        assert_eq!(toast.message, h.app.strings().text("upload.unsupported_type"));
        assert_eq!(h.app.last_error().unwrap().context.as_deref(), Some("upload"));
    }

    #[test]
    fn accepted_upload_renders_preview() {
        let mut h = harness(FakeApi::default(), vec![]);
        h.app.start("/scanner");
        h.app
            .select_upload(UploadCandidate::new(png_bytes(5, 7), "image/png", "leaf.png"))
            .unwrap();
        h.app.wait_preview();
        let preview: Vec<(Preview, String)> = h
            .presenter
            .views()
            .into_iter()
            .filter_map(|v| match v {
                View::UploadPreview { preview, caption } => Some((preview, caption)),
                _ => None,
            })
            .collect();
        assert_eq!(preview.len(), 1);
        assert_eq!((preview[0].0.width, preview[0].0.height), (5, 7));
        assert_eq!(preview[0].1, "Ready to analyze: leaf.png");
    }

    #[test]
    fn camera_denial_shows_camera_message() {
        let mut h = harness(FakeApi::default(), vec![]);
        let err = h.app.camera_frame(Err(CaptureError::CameraUnavailable)).unwrap_err();
        assert!(matches!(err, AppError::Capture(_)));
        assert_eq!(
            last_notification(&h.presenter).message,
            "Camera access denied or not available"
        );
    }

    #[test]
    fn connectivity_toasts_only_on_change() {
        let mut h = harness(FakeApi::default(), vec![]);
        h.app.set_online(true);
        assert!(h.presenter.notifications().is_empty());
        h.app.set_online(false);
        h.app.set_online(false);
        h.app.set_online(true);
        let kinds: Vec<_> = h.presenter.notifications().iter().map(|n| n.kind).collect();
        assert_eq!(kinds, vec![NotificationKind::Warning, NotificationKind::Success]);
        assert!(h.app.is_online());
    }

    #[test]
    fn language_switch_rerenders_bindings() {
        let mut h = harness(FakeApi::default(), vec![]);
        h.app.bind_text(TextBinding::text("save-btn", "save"));
        assert!(h.app.set_language("hi"));
        assert!(!h.app.set_language("xx"));
        let texts: Vec<String> = h
            .presenter
            .views()
            .into_iter()
            .filter_map(|v| match v {
                View::BoundText { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(texts.first().map(String::as_str), Some("Save"));
        assert_eq!(texts.last(), Some(&h.app.strings().lookup("save", "hi")));
    }

    #[test]
    fn spoken_question_round_trip() {
        let mut h = harness(
            FakeApi::answering(&["धूप रहेगी, छिड़काव कर सकते हैं"]),
            vec![Ok("कल मौसम कैसा रहेगा".to_string())],
        );
        h.app.start("/weather");
        h.app.listen().unwrap();
        let reply = h.app.wait_reply(Duration::from_secs(5)).unwrap();
        assert!(!reply.from_fallback);
        assert!(h.presenter.views().iter().any(|v| matches!(
            v,
            View::Conversation { query, .. } if query == "कल मौसम कैसा रहेगा"
        )));
        assert_eq!(h.synth.spoken().len(), 1);
        assert!(h.presenter.effects().contains(&Effect::Pulse {
            target: "voice-btn".to_string()
        }));

        assert!(h.app.save_last_response());
        assert_eq!(last_notification(&h.presenter).kind, NotificationKind::Success);
    }

    #[test]
    fn follow_up_button_asks_about_last_answer() {
        let mut h = harness(FakeApi::answering(&["नीम का तेल डालें", "दो हफ्ते में"]), vec![]);
        h.app.ask("टमाटर के पत्तों पर धब्बे हैं क्या करूं").unwrap();
        h.app.wait_reply(Duration::from_secs(5)).unwrap();
        h.app.ask_follow_up().unwrap();
        let reply = h.app.wait_reply(Duration::from_secs(5)).unwrap();
        assert_eq!(reply.query, "कोई और तरीका है?");
        assert_eq!(reply.response, "दो हफ्ते में");
        assert_eq!(h.app.assistant().conversation().history().len(), 2);
        assert_eq!(h.synth.spoken().len(), 2);
    }

    #[test]
    fn microphone_denial_is_reported() {
        let mut h = harness(FakeApi::default(), vec![Err(CaptureError::NotAllowed)]);
        let err = h.app.listen().unwrap_err();
        assert!(matches!(err, AppError::Capture(_)));
        assert_eq!(
            last_notification(&h.presenter).message,
            h.app.strings().text("mic.not_allowed")
        );
    }

    #[test]
    fn shutdown_dismisses_toast_and_forgets_session() {
        let mut h = harness(FakeApi::answering(&["ok"]), vec![]);
        h.app.ask("which fertilizer suits sandy soil best").unwrap();
        h.app.wait_reply(Duration::from_secs(5)).unwrap();
        h.app.set_online(false);
        h.app.shutdown();
        assert!(h.app.last_reply().is_none());
        assert!(h.app.assistant().conversation().history().is_empty());
        assert_eq!(h.presenter.log.lock().unwrap().dismissed, 1);
    }
}
