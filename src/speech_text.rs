// Text preparation for speech synthesis
//
// Assistant replies are written for the screen: markdown emphasis, emoji and
// symbols read badly through a synthesizer. This pipeline turns them into
// plain speakable text:
// 1. Strip markdown emphasis and heading markers
// 2. Strip emoji, pictographs and variation selectors
// 3. Expand ₹, % and °C into words of the active language
// 4. Collapse whitespace

use crate::i18n::TranslationTable;
use tracing::warn;

/// Spoken words for symbols, in the voice language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechSubstitutions {
    pub currency: String,
    pub percent: String,
    pub celsius: String,
}

impl SpeechSubstitutions {
    pub fn for_language(table: &TranslationTable, language: &str) -> Self {
        let language = crate::util::primary_subtag(language);
        Self {
            currency: table.lookup("speech.currency", &language),
            percent: table.lookup("speech.percent", &language),
            celsius: table.lookup("speech.celsius", &language),
        }
    }
}

const EMOJI_PATTERN: &str = r"[\x{1F000}-\x{1FAFF}\x{2600}-\x{27BF}\x{2B00}-\x{2BFF}\x{FE00}-\x{FE0F}\x{200D}\x{20E3}]";

pub fn normalize_for_speech(text: &str, words: &SpeechSubstitutions) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    let mut result = strip_markdown(text);
    result = replace_all(&result, EMOJI_PATTERN, " ");
    result = expand_symbols(&result, words);
    collapse_whitespace(&result)
}

fn strip_markdown(text: &str) -> String {
    let mut result = replace_all(text, r"\*\*([^*]+?)\*\*", "$1");
    result = replace_all(&result, r"__([^_]+?)__", "$1");
    result = replace_all(
        &result,
        r"(?m)(^|[^\w*])\*([^*\s](?:[^*\n]*?[^*\s])?)\*",
        "${1}${2}",
    );
    result = replace_all(&result, r"\b_([^_\n]+?)_\b", "$1");
    result = replace_all(&result, r"(?m)^\s*#{1,6}\s+", "");
    // leftover markers hug a word edge; "2*3" keeps its asterisk
    replace_all(&result, r"(?m)(^|\s)\*+|\*+(\s|$)", "${1}${2}")
}

fn expand_symbols(text: &str, words: &SpeechSubstitutions) -> String {
    let currency = escape_replacement(&words.currency);
    let percent = escape_replacement(&words.percent);
    let celsius = escape_replacement(&words.celsius);

    // amounts are read before the unit word: "₹50" -> "50 rupees"
    let mut result = replace_all(
        text,
        r"₹\s*([0-9][0-9,]*(?:\.[0-9]+)?)",
        &format!("${{1}} {}", currency),
    );
    result = result.replace('₹', &format!(" {} ", words.currency));
    result = replace_all(
        &result,
        r"([0-9]+(?:\.[0-9]+)?)\s*%",
        &format!("${{1}} {}", percent),
    );
    result = result.replace('%', &format!(" {} ", words.percent));
    result = replace_all(&result, r"°\s*C", &format!(" {}", celsius));
    result
}

fn escape_replacement(word: &str) -> String {
    word.replace('$', "$$")
}

fn replace_all(text: &str, pattern: &str, replacement: &str) -> String {
    match regex::Regex::new(pattern) {
        Ok(re) => re.replace_all(text, replacement).into_owned(),
        Err(e) => {
            warn!("Invalid speech pattern '{}': {}", pattern, e);
            text.to_string()
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hindi() -> SpeechSubstitutions {
        SpeechSubstitutions::for_language(&TranslationTable::builtin(), "hi-IN")
    }

    fn english() -> SpeechSubstitutions {
        SpeechSubstitutions::for_language(&TranslationTable::builtin(), "en-IN")
    }

    #[test]
    fn expands_rupee_and_percent_in_hindi() {
        let spoken = normalize_for_speech("कीमत ₹50 है और 10% बढ़ी", &hindi());
        assert!(!spoken.contains('₹'));
        assert!(!spoken.contains('%'));
        assert_eq!(spoken, "कीमत 50 रुपए है और 10 प्रतिशत बढ़ी");
    }

    #[test]
    fn expands_grouped_amounts_and_temperature() {
        let spoken = normalize_for_speech("Onion ₹1,850 per quintal at 32°C", &english());
        assert_eq!(spoken, "Onion 1,850 rupees per quintal at 32 degrees Celsius");
    }

    #[test]
    fn strips_markdown_emphasis() {
        let spoken = normalize_for_speech("**Spray** neem oil *today*, not __tomorrow__ or _later_", &english());
        assert_eq!(spoken, "Spray neem oil today, not tomorrow or later");
    }

    #[test]
    fn drops_unmatched_emphasis_but_keeps_arithmetic() {
        let spoken = normalize_for_speech("* Mix 2*3 litres per acre**", &english());
        assert_eq!(spoken, "Mix 2*3 litres per acre");
    }

    #[test]
    fn expands_temperature_before_devanagari() {
        let spoken = normalize_for_speech("तापमान 32°Cतक जाएगा", &hindi());
        assert!(!spoken.contains('°'));
        assert!(spoken.contains("32 डिग्री सेल्सियस"));
    }

    #[test]
    fn regional_languages_use_native_unit_words() {
        let table = TranslationTable::builtin();
        let marathi = SpeechSubstitutions::for_language(&table, "mr-IN");
        assert_eq!(normalize_for_speech("₹50", &marathi), "50 रुपये");
        for language in ["gu-IN", "mr-IN", "te-IN", "ta-IN"] {
            let words = SpeechSubstitutions::for_language(&table, language);
            let spoken = normalize_for_speech("₹50, 10% and 32°C", &words);
            assert!(!spoken.contains("rupees"), "{}: {}", language, spoken);
            assert!(!spoken.contains("percent"), "{}: {}", language, spoken);
            assert!(!spoken.contains("Celsius"), "{}: {}", language, spoken);
        }
    }

    #[test]
    fn keeps_snake_case_words_intact() {
        let spoken = normalize_for_speech("use soil_test_kit", &english());
        assert_eq!(spoken, "use soil_test_kit");
    }

    #[test]
    fn strips_emoji_and_variation_selectors() {
        let spoken = normalize_for_speech("🌾 Good harvest ☀\u{FE0F} expected 👍🏽", &english());
        assert_eq!(spoken, "Good harvest expected");
    }

    #[test]
    fn strips_heading_markers() {
        let spoken = normalize_for_speech("## Treatment\nUse copper", &english());
        assert_eq!(spoken, "Treatment Use copper");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize_for_speech("   ", &english()), "");
    }
}
