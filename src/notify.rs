//! Toast notifications.

use crate::i18n::TranslationStore;
use crate::presenter::Presenter;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub duration_ms: u64,
}

/// Shows one toast at a time; a new one replaces whatever is visible.
pub struct Notifier {
    duration_ms: u64,
    current: Option<Notification>,
}

impl Notifier {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    pub fn show(
        &mut self,
        message: impl Into<String>,
        kind: NotificationKind,
        presenter: &mut dyn Presenter,
    ) {
        if self.current.is_some() {
            presenter.dismiss_notification();
        }
        let notification = Notification {
            message: message.into(),
            kind,
            duration_ms: self.duration_ms,
        };
        debug!("Toast ({:?}): {}", notification.kind, notification.message);
        presenter.notify(&notification);
        self.current = Some(notification);
    }

    /// Show the active-language text for `key`.
    pub fn show_key(
        &mut self,
        key: &str,
        kind: NotificationKind,
        strings: &TranslationStore,
        presenter: &mut dyn Presenter,
    ) {
        self.show(strings.text(key), kind, presenter);
    }

    pub fn dismiss(&mut self, presenter: &mut dyn Presenter) {
        if self.current.take().is_some() {
            presenter.dismiss_notification();
        }
    }
}
