//! Rendering adapter.
//!
//! The core never touches presentation: everything visible goes through a
//! [`Presenter`], which a host (browser bridge, webview, test recorder)
//! implements.

use crate::dashboard::DashboardPanel;
use crate::notify::Notification;
use crate::page::PageType;
use crate::upload::Preview;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingSlot {
    Text,
    Placeholder,
    Title,
}

/// A visible element whose text comes from a translation key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBinding {
    pub target: String,
    pub key: String,
    pub slot: BindingSlot,
}

impl TextBinding {
    pub fn text(target: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            key: key.into(),
            slot: BindingSlot::Text,
        }
    }

    pub fn placeholder(target: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            key: key.into(),
            slot: BindingSlot::Placeholder,
        }
    }

    pub fn title(target: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            key: key.into(),
            slot: BindingSlot::Title,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceStatus {
    Idle,
    Listening,
    Processing,
    Speaking,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    BoundText {
        binding: TextBinding,
        text: String,
    },
    Page {
        page: PageType,
    },
    Connectivity {
        online: bool,
    },
    VoiceStatus {
        status: VoiceStatus,
        label: String,
    },
    Conversation {
        query_label: String,
        query: String,
        response_label: String,
        response: String,
        from_fallback: bool,
    },
    Hints {
        header: String,
        hints: Vec<String>,
    },
    UploadPreview {
        preview: Preview,
        caption: String,
    },
    UploadCleared,
    Panel {
        panel: DashboardPanel,
    },
}

/// Cosmetic effects. Hosts are free to ignore them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    FadeIn { target: String },
    SlideUp { target: String, stagger_ms: u64 },
    Pulse { target: String },
}

pub trait Presenter {
    fn render(&mut self, view: &View);
    fn notify(&mut self, notification: &Notification);
    fn dismiss_notification(&mut self) {}
    fn animate(&mut self, _effect: &Effect) {}
}

/// Discards everything; for headless hosts.
#[derive(Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn render(&mut self, _view: &View) {}
    fn notify(&mut self, _notification: &Notification) {}
}
