// Krishi Sahayak client core
// Voice conversation, image uploads, translations and page plumbing for the
// farmer assistant. Hosts supply a presenter plus speech platform adapters.

pub mod api;
pub mod app;
pub mod assistant;
pub mod constants;
pub mod conversation;
pub mod dashboard;
pub mod errors;
pub mod i18n;
pub mod notify;
pub mod page;
mod paths;
pub mod presenter;
pub mod settings;
pub mod speech_text;
pub mod storage;
pub mod upload;
pub mod voice;
mod util;

pub use app::{App, AppDeps};
pub use errors::{AppError, ErrorEvent};
pub use presenter::{Effect, Presenter, View};
pub use settings::Settings;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE_PREFIX: &str = "krishi-assist.log";

/// Install the global subscriber. Returns the file writer guard when
/// `log_dir` is set; keep it alive for the life of the process.
pub fn init_logging(settings: &Settings) -> Option<WorkerGuard> {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = if settings.log_dir.is_empty() {
        (None, None)
    } else {
        let appender = tracing_appender::rolling::daily(&settings.log_dir, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(false)
            .with_file(true)
            .with_line_number(true);
        (Some(layer), Some(guard))
    };

    let stdout_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    // already installed (tests, embedding hosts): keep the existing one
    if tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .is_ok()
    {
        info!("Krishi Sahayak core starting up");
    }
    guard
}

/// Load `.env.local` / `.env` from the working directory and two parents.
/// Variables already set in the environment win.
pub fn load_local_env() {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let parent = cwd.parent().map(|p| p.to_path_buf());
    let grandparent = parent
        .as_ref()
        .and_then(|p| p.parent().map(|gp| gp.to_path_buf()));
    let mut candidates = vec![cwd.join(".env.local"), cwd.join(".env")];
    if let Some(parent) = parent {
        candidates.push(parent.join(".env.local"));
        candidates.push(parent.join(".env"));
    }
    if let Some(grandparent) = grandparent {
        candidates.push(grandparent.join(".env.local"));
        candidates.push(grandparent.join(".env"));
    }

    for path in candidates {
        if !path.exists() {
            continue;
        }
        if let Ok(raw) = fs::read_to_string(&path) {
            for (key, value) in parse_env(&raw) {
                if std::env::var(&key).is_err() {
                    std::env::set_var(&key, &value);
                }
            }
        }
    }
}

fn parse_env(raw: &str) -> Vec<(String, String)> {
    let mut vars = Vec::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let mut parts = line.splitn(2, '=');
        let key = parts.next().unwrap_or("").trim();
        let value = parts.next().unwrap_or("").trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);
        if key.is_empty() || value.is_empty() {
            continue;
        }
        vars.push((key.to_string(), value.to_string()));
    }
    vars
}

/// Environment, settings and logging for a host process.
pub fn bootstrap() -> (Settings, Option<WorkerGuard>) {
    load_local_env();
    let settings = settings::load_settings();
    let guard = init_logging(&settings);
    (settings, guard)
}

/// Build a session against the configured backend with file-backed storage.
pub fn open_app(
    settings: &Settings,
    presenter: Box<dyn Presenter>,
    recognizer: Box<dyn voice::SpeechRecognizer>,
    synthesizer: Box<dyn voice::SpeechSynthesizer>,
) -> Result<App, AppError> {
    let store = storage::JsonFileStore::open_default()?;
    let api = api::HttpApi::from_settings(settings)?;
    Ok(App::new(
        settings,
        AppDeps {
            store: Arc::new(store),
            api: Arc::new(api),
            recognizer,
            synthesizer,
            presenter,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_env_lines() {
        let raw = "# comment\nKRISHI_API_BASE=http://10.0.0.2:5000\nexport RUST_LOG=\"debug\"\nEMPTY=\n\nBROKEN";
        let vars = parse_env(raw);
        assert_eq!(
            vars,
            vec![
                ("KRISHI_API_BASE".to_string(), "http://10.0.0.2:5000".to_string()),
                ("RUST_LOG".to_string(), "debug".to_string()),
            ]
        );
    }

    #[test]
    fn logging_init_is_idempotent() {
        let settings = Settings::default();
        assert!(init_logging(&settings).is_none());
        assert!(init_logging(&settings).is_none());
    }

    #[test]
    fn file_logging_returns_guard() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            log_dir: dir.path().to_string_lossy().into_owned(),
            ..Settings::default()
        };
        assert!(init_logging(&settings).is_some());
    }
}
