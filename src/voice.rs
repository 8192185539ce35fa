// Voice I/O adapter
// Wraps the platform recognizer and synthesizer behind traits:
// - one transcript per listen, no overlapping listens
// - at most one utterance playing; a new one cancels the old
// - voice selection by language with a regional fallback
// - utterances parked until the voice catalog arrives

use crate::constants::REGIONAL_VOICE_LANGUAGE;
use crate::i18n::{language_name, TranslationTable};
use crate::settings::Settings;
use crate::speech_text::{normalize_for_speech, SpeechSubstitutions};
use crate::util::primary_subtag;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    NoSpeech,
    AudioCapture,
    NotAllowed,
    CameraUnavailable,
    Busy,
    Other(String),
}

impl CaptureError {
    /// Translation key of the message shown to the user.
    pub fn translation_key(&self) -> &'static str {
        match self {
            CaptureError::NoSpeech => "mic.no_speech",
            CaptureError::AudioCapture => "mic.audio_capture",
            CaptureError::NotAllowed => "mic.not_allowed",
            CaptureError::CameraUnavailable => "camera.unavailable",
            CaptureError::Busy => "mic.busy",
            CaptureError::Other(_) => "mic.generic",
        }
    }
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureError::NoSpeech => write!(f, "No speech detected"),
            CaptureError::AudioCapture => write!(f, "Audio capture failed"),
            CaptureError::NotAllowed => write!(f, "Microphone permission denied"),
            CaptureError::CameraUnavailable => write!(f, "Camera unavailable"),
            CaptureError::Busy => write!(f, "Already listening"),
            CaptureError::Other(msg) => write!(f, "Capture error: {}", msg),
        }
    }
}

impl std::error::Error for CaptureError {}

impl From<CaptureError> for crate::errors::AppError {
    fn from(err: CaptureError) -> Self {
        crate::errors::AppError::Capture(err.to_string())
    }
}

/// Produces one transcript per call, bounded by the platform's own timeout.
pub trait SpeechRecognizer: Send {
    fn recognize(&mut self, language: &str) -> Result<String, CaptureError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub name: String,
    pub lang: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
    pub voice: Option<VoiceInfo>, // None = platform default
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

pub trait SpeechSynthesizer: Send {
    fn voices(&self) -> Vec<VoiceInfo>;
    fn speak(&mut self, utterance: &Utterance);
    fn cancel(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Prosody {
    rate: f32,
    pitch: f32,
    volume: f32,
}

pub struct VoiceIo {
    recognizer: Box<dyn SpeechRecognizer>,
    synthesizer: Box<dyn SpeechSynthesizer>,
    table: TranslationTable,
    language: String,
    prosody: Prosody,
    listening: bool,
    parked: Option<String>,
}

impl VoiceIo {
    pub fn new(
        recognizer: Box<dyn SpeechRecognizer>,
        synthesizer: Box<dyn SpeechSynthesizer>,
        settings: &Settings,
    ) -> Self {
        Self {
            recognizer,
            synthesizer,
            table: TranslationTable::builtin(),
            language: settings.voice_language.clone(),
            prosody: Prosody {
                rate: settings.speech_rate,
                pitch: settings.speech_pitch,
                volume: settings.speech_volume,
            },
            listening: false,
            parked: None,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, tag: &str) {
        self.language = tag.to_string();
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Capture one transcript in the voice language.
    pub fn listen(&mut self) -> Result<String, CaptureError> {
        if self.listening {
            return Err(CaptureError::Busy);
        }
        self.listening = true;
        debug!("Listening ({})", self.language);
        let result = self.recognizer.recognize(&self.language);
        self.listening = false;
        match &result {
            Ok(transcript) if transcript.trim().is_empty() => return Err(CaptureError::NoSpeech),
            Ok(transcript) => info!("Heard {} chars", transcript.chars().count()),
            Err(e) => warn!("Speech capture failed: {}", e),
        }
        result.map(|t| t.trim().to_string())
    }

    /// Speak `text`, cancelling anything already playing. Without a voice
    /// catalog the text is parked until `on_voices_changed`.
    pub fn speak(&mut self, text: &str) {
        self.synthesizer.cancel();
        let words = SpeechSubstitutions::for_language(&self.table, &self.language);
        let spoken = normalize_for_speech(text, &words);
        if spoken.is_empty() {
            self.parked = None;
            return;
        }
        let voices = self.synthesizer.voices();
        if voices.is_empty() {
            debug!("Voice catalog empty, parking utterance");
            self.parked = Some(spoken);
            return;
        }
        self.parked = None;
        let voice = select_voice(&voices, &self.language).cloned();
        self.start(spoken, voice);
    }

    /// Voice catalog changed: play the parked utterance, once.
    pub fn on_voices_changed(&mut self) {
        let Some(spoken) = self.parked.take() else {
            return;
        };
        let voices = self.synthesizer.voices();
        let voice = select_voice(&voices, &self.language).cloned();
        if voice.is_none() {
            debug!("Still no matching voice, using platform default");
        }
        self.start(spoken, voice);
    }

    pub fn has_parked(&self) -> bool {
        self.parked.is_some()
    }

    pub fn stop(&mut self) {
        self.parked = None;
        self.synthesizer.cancel();
    }

    fn start(&mut self, text: String, voice: Option<VoiceInfo>) {
        let utterance = Utterance {
            text,
            lang: self.language.clone(),
            voice,
            rate: self.prosody.rate,
            pitch: self.prosody.pitch,
            volume: self.prosody.volume,
        };
        debug!(
            "Speaking with {}",
            utterance
                .voice
                .as_ref()
                .map(|v| v.name.as_str())
                .unwrap_or("default voice")
        );
        self.synthesizer.speak(&utterance);
    }
}

fn same_tag(a: &str, b: &str) -> bool {
    a.replace('_', "-").eq_ignore_ascii_case(&b.replace('_', "-"))
}

/// Pick a voice for `language`: exact tag, then same primary subtag or a
/// name mentioning the language, then an Indian English voice. Catalog
/// order breaks ties. `None` means the platform default.
pub fn select_voice<'a>(voices: &'a [VoiceInfo], language: &str) -> Option<&'a VoiceInfo> {
    let primary = primary_subtag(language);
    let english_name = english_language_name(&primary);

    voices
        .iter()
        .find(|v| same_tag(&v.lang, language))
        .or_else(|| {
            voices.iter().find(|v| {
                primary_subtag(&v.lang) == primary
                    || english_name
                        .map(|name| v.name.to_lowercase().contains(name))
                        .unwrap_or(false)
            })
        })
        .or_else(|| {
            voices.iter().find(|v| {
                same_tag(&v.lang, REGIONAL_VOICE_LANGUAGE) || v.name.to_lowercase().contains("indian")
            })
        })
}

fn english_language_name(primary: &str) -> Option<&'static str> {
    // native names live in the translation tables; synthesizer voice names are English
    language_name(primary)?;
    match primary {
        "hi" => Some("hindi"),
        "gu" => Some("gujarati"),
        "mr" => Some("marathi"),
        "te" => Some("telugu"),
        "ta" => Some("tamil"),
        "en" => Some("english"),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    pub(crate) struct SynthLog {
        pub(crate) spoken: Vec<Utterance>,
        pub(crate) cancels: usize,
    }

    /// Synthesizer whose catalog and log are shared with the test.
    #[derive(Clone, Default)]
    pub(crate) struct FakeSynth {
        pub(crate) catalog: Arc<Mutex<Vec<VoiceInfo>>>,
        pub(crate) log: Arc<Mutex<SynthLog>>,
    }

    impl FakeSynth {
        pub(crate) fn with_voices(voices: Vec<VoiceInfo>) -> Self {
            let synth = Self::default();
            *synth.catalog.lock().unwrap() = voices;
            synth
        }

        pub(crate) fn spoken(&self) -> Vec<Utterance> {
            self.log.lock().unwrap().spoken.clone()
        }
    }

    impl SpeechSynthesizer for FakeSynth {
        fn voices(&self) -> Vec<VoiceInfo> {
            self.catalog.lock().unwrap().clone()
        }
        fn speak(&mut self, utterance: &Utterance) {
            self.log.lock().unwrap().spoken.push(utterance.clone());
        }
        fn cancel(&mut self) {
            self.log.lock().unwrap().cancels += 1;
        }
    }

    /// Recognizer that replays scripted results.
    pub(crate) struct ScriptedRecognizer {
        pub(crate) results: Vec<Result<String, CaptureError>>,
    }

    impl ScriptedRecognizer {
        pub(crate) fn new(mut results: Vec<Result<String, CaptureError>>) -> Self {
            results.reverse();
            Self { results }
        }
    }

    impl SpeechRecognizer for ScriptedRecognizer {
        fn recognize(&mut self, _language: &str) -> Result<String, CaptureError> {
            self.results.pop().unwrap_or(Err(CaptureError::NoSpeech))
        }
    }

    pub(crate) fn voice(name: &str, lang: &str) -> VoiceInfo {
        VoiceInfo {
            name: name.to_string(),
            lang: lang.to_string(),
        }
    }

    fn io(synth: FakeSynth, results: Vec<Result<String, CaptureError>>) -> VoiceIo {
        VoiceIo::new(
            Box::new(ScriptedRecognizer::new(results)),
            Box::new(synth),
            &Settings::default(),
        )
    }

    #[test]
    fn selects_exact_then_primary_then_regional() {
        let voices = vec![
            voice("Google US English", "en-US"),
            voice("Microsoft Heera", "en-IN"),
            voice("Lekha", "hi_IN"),
        ];
        assert_eq!(select_voice(&voices, "hi-IN").unwrap().name, "Lekha");
        assert_eq!(select_voice(&voices, "en-IN").unwrap().name, "Microsoft Heera");
        assert_eq!(select_voice(&voices, "en-GB").unwrap().name, "Google US English");
        assert_eq!(select_voice(&voices, "ta-IN").unwrap().name, "Microsoft Heera");
    }

    #[test]
    fn matches_voice_by_language_name() {
        let voices = vec![voice("Google US English", "en-US"), voice("Hindi Female", "")];
        assert_eq!(select_voice(&voices, "hi-IN").unwrap().name, "Hindi Female");
    }

    #[test]
    fn no_match_means_platform_default() {
        let voices = vec![voice("Thomas", "fr-FR")];
        assert!(select_voice(&voices, "hi-IN").is_none());
        let voices = vec![voice("Indian Accent", "xx")];
        assert_eq!(select_voice(&voices, "hi-IN").unwrap().name, "Indian Accent");
    }

    #[test]
    fn speak_cancels_first_and_normalizes() {
        let synth = FakeSynth::with_voices(vec![voice("Lekha", "hi-IN")]);
        let mut voice_io = io(synth.clone(), vec![]);
        voice_io.speak("कीमत **₹50** है");
        voice_io.speak("दूसरा जवाब");
        let log = synth.log.lock().unwrap();
        assert_eq!(log.cancels, 2);
        assert_eq!(log.spoken.len(), 2);
        assert_eq!(log.spoken[0].text, "कीमत 50 रुपए है");
        assert_eq!(log.spoken[0].rate, 0.85);
        assert_eq!(log.spoken[0].voice.as_ref().unwrap().name, "Lekha");
    }

    #[test]
    fn late_catalog_triggers_exactly_one_utterance() {
        let synth = FakeSynth::default();
        let mut voice_io = io(synth.clone(), vec![]);
        voice_io.speak("first");
        voice_io.speak("second");
        assert!(synth.spoken().is_empty());
        assert!(voice_io.has_parked());

        *synth.catalog.lock().unwrap() = vec![voice("Lekha", "hi-IN")];
        voice_io.on_voices_changed();
        voice_io.on_voices_changed();
        let spoken = synth.spoken();
        assert_eq!(spoken.len(), 1);
        assert_eq!(spoken[0].text, "second");
    }

    #[test]
    fn parked_utterance_uses_default_voice_if_catalog_stays_empty() {
        let synth = FakeSynth::default();
        let mut voice_io = io(synth.clone(), vec![]);
        voice_io.speak("hello");
        voice_io.on_voices_changed();
        let spoken = synth.spoken();
        assert_eq!(spoken.len(), 1);
        assert!(spoken[0].voice.is_none());
    }

    #[test]
    fn listen_returns_one_trimmed_transcript() {
        let mut voice_io = io(
            FakeSynth::default(),
            vec![Ok("  मौसम कैसा है  ".to_string()), Ok("   ".to_string())],
        );
        assert_eq!(voice_io.listen().unwrap(), "मौसम कैसा है");
        assert_eq!(voice_io.listen(), Err(CaptureError::NoSpeech));
        assert!(!voice_io.is_listening());
    }

    #[test]
    fn capture_errors_map_to_distinct_keys() {
        let errors = [
            CaptureError::NoSpeech,
            CaptureError::AudioCapture,
            CaptureError::NotAllowed,
            CaptureError::CameraUnavailable,
            CaptureError::Busy,
            CaptureError::Other("x".to_string()),
        ];
        let mut keys: Vec<_> = errors.iter().map(|e| e.translation_key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), errors.len());
        let table = TranslationTable::builtin();
        for key in keys {
            assert_ne!(table.lookup(key, "hi"), key);
        }
    }
}
