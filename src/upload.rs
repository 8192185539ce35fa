// Upload validation and preview
//
// Validation is a pure classification: MIME allow-list first, then the size
// ceiling. Only an accepted upload can produce a preview, and preview
// generation runs on a worker thread behind a single-shot `PreviewTask`.

use crate::constants::UPLOAD_MAX_BYTES;
use crate::errors::AppError;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use tracing::{info, warn};

/// `image/jpg` is not a registered type but some browsers and cameras report it.
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/gif"];

const CAMERA_FILE_NAME: &str = "captured-image.jpg";
const UNKNOWN_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    pub bytes: Vec<u8>,
    pub declared_mime_type: String,
    pub size_bytes: u64,
    pub file_name: String,
}

impl UploadCandidate {
    pub fn new(bytes: Vec<u8>, declared_mime_type: impl Into<String>, file_name: impl Into<String>) -> Self {
        let size_bytes = bytes.len() as u64;
        Self {
            bytes,
            declared_mime_type: declared_mime_type.into(),
            size_bytes,
            file_name: file_name.into(),
        }
    }

    /// Read a file from disk, declaring the MIME type its extension implies.
    /// Files over the upload limit are refused before any byte is read.
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let size = fs::metadata(path)
            .map_err(|e| AppError::Storage(format!("Failed to stat {}: {}", path.display(), e)))?
            .len();
        if size > UPLOAD_MAX_BYTES {
            warn!("Refusing {} ({} bytes) before reading", path.display(), size);
            return Err(RejectReason::TooLarge.into());
        }
        let bytes = fs::read(path)
            .map_err(|e| AppError::Storage(format!("Failed to read {}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(bytes, mime_for_path(path), file_name))
    }

    /// A JPEG frame grabbed from the camera.
    pub fn from_camera_frame(bytes: Vec<u8>) -> Self {
        Self::new(bytes, "image/jpeg", CAMERA_FILE_NAME)
    }
}

fn mime_for_path(path: &Path) -> &'static str {
    match image::ImageFormat::from_path(path) {
        Ok(image::ImageFormat::Jpeg) => "image/jpeg",
        Ok(image::ImageFormat::Png) => "image/png",
        Ok(image::ImageFormat::Gif) => "image/gif",
        Ok(image::ImageFormat::WebP) => "image/webp",
        Ok(image::ImageFormat::Bmp) => "image/bmp",
        Ok(image::ImageFormat::Tiff) => "image/tiff",
        _ => UNKNOWN_MIME,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectReason {
    UnsupportedType,
    TooLarge,
}

impl RejectReason {
    pub fn tag(&self) -> &'static str {
        match self {
            RejectReason::UnsupportedType => "unsupported-type",
            RejectReason::TooLarge => "too-large",
        }
    }

    /// Translation key of the inline message shown for this rejection.
    pub fn message_key(&self) -> &'static str {
        match self {
            RejectReason::UnsupportedType => "upload.unsupported_type",
            RejectReason::TooLarge => "upload.too_large",
        }
    }
}

impl From<RejectReason> for AppError {
    fn from(reason: RejectReason) -> Self {
        AppError::Validation(reason.tag().to_string())
    }
}

#[derive(Debug)]
pub enum Validation {
    Accepted(AcceptedUpload),
    Rejected(RejectReason),
}

impl Validation {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Validation::Accepted(_))
    }
}

fn is_allowed_mime(mime: &str) -> bool {
    let mime = mime.trim();
    ALLOWED_MIME_TYPES.iter().any(|allowed| allowed.eq_ignore_ascii_case(mime))
}

/// Classify a candidate; the first failing rule wins.
pub fn validate(candidate: UploadCandidate) -> Validation {
    if !is_allowed_mime(&candidate.declared_mime_type) {
        info!(
            "Rejected upload '{}': unsupported type '{}'",
            candidate.file_name, candidate.declared_mime_type
        );
        return Validation::Rejected(RejectReason::UnsupportedType);
    }
    if candidate.size_bytes > UPLOAD_MAX_BYTES {
        info!(
            "Rejected upload '{}': {} bytes exceeds {}",
            candidate.file_name, candidate.size_bytes, UPLOAD_MAX_BYTES
        );
        return Validation::Rejected(RejectReason::TooLarge);
    }
    Validation::Accepted(AcceptedUpload { candidate })
}

/// A candidate that passed validation. The only way to get a preview.
#[derive(Debug)]
pub struct AcceptedUpload {
    candidate: UploadCandidate,
}

impl AcceptedUpload {
    pub fn file_name(&self) -> &str {
        &self.candidate.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.candidate.declared_mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.candidate.bytes
    }

    pub fn into_candidate(self) -> UploadCandidate {
        self.candidate
    }

    /// Start preview generation on a worker thread.
    pub fn into_preview(self) -> PreviewTask {
        let (tx, rx) = mpsc::sync_channel(1);
        let candidate = self.candidate;
        thread::spawn(move || {
            let result = build_preview(&candidate);
            if let Err(e) = &result {
                warn!("Preview for '{}' failed: {}", candidate.file_name, e);
            }
            let _ = tx.send(result);
        });
        PreviewTask {
            rx,
            settled: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preview {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
    pub mime_type: String,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewError {
    /// Reading the bytes failed or the worker went away
    Io(String),
    /// The bytes are not a decodable image
    Decode(String),
}

impl std::fmt::Display for PreviewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreviewError::Io(msg) => write!(f, "Preview I/O error: {}", msg),
            PreviewError::Decode(msg) => write!(f, "Preview decode error: {}", msg),
        }
    }
}

impl std::error::Error for PreviewError {}

impl From<PreviewError> for AppError {
    fn from(err: PreviewError) -> Self {
        AppError::Validation(err.to_string())
    }
}

fn build_preview(candidate: &UploadCandidate) -> Result<Preview, PreviewError> {
    let reader = image::io::Reader::new(Cursor::new(candidate.bytes.as_slice()))
        .with_guessed_format()
        .map_err(|e| PreviewError::Io(e.to_string()))?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| PreviewError::Decode(e.to_string()))?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(&candidate.bytes);
    let mime_type = candidate.declared_mime_type.trim().to_ascii_lowercase();
    Ok(Preview {
        data_url: format!("data:{};base64,{}", mime_type, encoded),
        width,
        height,
        mime_type,
        file_name: candidate.file_name.clone(),
    })
}

/// Single-shot handle: resolves exactly once to a preview or an error.
pub struct PreviewTask {
    rx: Receiver<Result<Preview, PreviewError>>,
    settled: bool,
}

impl PreviewTask {
    /// Block until the preview is ready.
    pub fn wait(mut self) -> Result<Preview, PreviewError> {
        self.settled = true;
        self.rx
            .recv()
            .map_err(|_| PreviewError::Io("preview worker exited".to_string()))?
    }

    /// Poll without blocking. Returns `None` while pending and after the
    /// result has been taken once.
    pub fn try_take(&mut self) -> Option<Result<Preview, PreviewError>> {
        if self.settled {
            return None;
        }
        match self.rx.try_recv() {
            Ok(result) => {
                self.settled = true;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.settled = true;
                Some(Err(PreviewError::Io("preview worker exited".to_string())))
            }
        }
    }
}
