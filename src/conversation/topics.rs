// Keyword sets and the pure text rules of the conversation core.

use super::models::{Exchange, Topic};
use crate::constants::FOLLOW_UP_MAX_CHARS;

const FOLLOW_UP_WORDS: &[&str] = &[
    "इसका", "उसका", "यह", "वह", "कैसे", "क्यों", "कब", "कहाँ", "और", "फिर", "अब", "this", "that",
    "it", "how", "why", "when", "where", "then", "now", "also",
];

const REFERENTIAL_WORDS: &[&str] = &["यह", "इसका", "this"];

const CROP_KEYWORDS: &[&str] = &["फसल", "crop"];
const DISEASE_KEYWORDS: &[&str] = &["बीमारी", "रोग", "disease"];
const WEATHER_KEYWORDS: &[&str] = &["मौसम", "बारिश", "weather", "rain"];
const PRICE_KEYWORDS: &[&str] = &["दाम", "कीमत", "price"];

const PREVIOUS_QUESTION_LABEL: &str = "पिछला सवाल";
const PREVIOUS_ANSWER_LABEL: &str = "पिछला जवाब";
const NEW_QUESTION_LABEL: &str = "नया सवाल";

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(|token| {
            token
                .trim_matches(|c: char| c.is_ascii_punctuation() || c == '।' || c == '॥')
                .to_lowercase()
        })
        .filter(|token| !token.is_empty())
}

fn has_token(text: &str, words: &[&str]) -> bool {
    tokens(text).any(|token| words.iter().any(|w| *w == token))
}

/// Latin keywords must start a token ("rains" matches, "grain" does not);
/// Devanagari keywords match anywhere so inflected forms still count.
fn mentions(text: &str, keywords: &[&str]) -> bool {
    let lowered = text.to_lowercase();
    keywords.iter().any(|k| {
        if k.is_ascii() {
            tokens(text).any(|token| token.starts_with(k))
        } else {
            lowered.contains(k)
        }
    })
}

pub fn topic_keywords(topic: Topic) -> &'static [&'static str] {
    match topic {
        Topic::Crop => CROP_KEYWORDS,
        Topic::Disease => DISEASE_KEYWORDS,
        Topic::Weather => WEATHER_KEYWORDS,
    }
}

/// Memory topics whose keywords appear in `text`.
pub fn matching_topics(text: &str) -> Vec<Topic> {
    Topic::ALL
        .into_iter()
        .filter(|topic| mentions(text, topic_keywords(*topic)))
        .collect()
}

/// Short utterances and ones carrying a follow-up word lean on the previous exchange.
pub fn is_follow_up(utterance: &str) -> bool {
    utterance.trim().chars().count() < FOLLOW_UP_MAX_CHARS || has_token(utterance, FOLLOW_UP_WORDS)
}

pub fn is_referential(utterance: &str) -> bool {
    has_token(utterance, REFERENTIAL_WORDS)
}

/// Prefix a follow-up with the last exchange so the backend sees the thread.
pub fn enrich(utterance: &str, previous: Option<&Exchange>) -> String {
    match previous {
        Some(prev) if is_follow_up(utterance) => format!(
            "{}: {}\n{}: {}\n{}: {}",
            PREVIOUS_QUESTION_LABEL,
            prev.query,
            PREVIOUS_ANSWER_LABEL,
            prev.response,
            NEW_QUESTION_LABEL,
            utterance
        ),
        _ => utterance.to_string(),
    }
}

/// Translation key of the canned reply for `utterance`.
/// Disease beats weather beats price; no match asks for clarification.
pub fn fallback_key(utterance: &str, remembers_disease: bool) -> &'static str {
    if remembers_disease && is_referential(utterance) {
        return "fallback.prior_disease";
    }
    if mentions(utterance, DISEASE_KEYWORDS) {
        "fallback.disease"
    } else if mentions(utterance, WEATHER_KEYWORDS) {
        "fallback.weather"
    } else if mentions(utterance, PRICE_KEYWORDS) {
        "fallback.price"
    } else {
        "fallback.generic"
    }
}
