//! Multilingual string table with graceful fallback.
//!
//! Resolution order for every lookup: requested language → default language
//! (`en`) → the literal key. A missing key never produces blank text.

mod tables;

use crate::constants::{DEFAULT_LANGUAGE, STORAGE_KEY_LANGUAGE};
use crate::presenter::{Presenter, TextBinding, View};
use crate::storage::{load_or_default, save_logged, SharedStore};
use crate::util::primary_subtag;
use std::collections::HashMap;
use tracing::{debug, info, warn};

type Dictionary = HashMap<&'static str, &'static str>;

/// Read-only language → key → string mapping.
pub struct TranslationTable {
    tables: HashMap<&'static str, Dictionary>,
    default_language: &'static str,
}

impl TranslationTable {
    /// The tables shipped with the client.
    pub fn builtin() -> Self {
        let tables: HashMap<&'static str, Dictionary> = tables::LANGUAGES
            .iter()
            .filter_map(|(code, _)| {
                tables::table_for(code)
                    .map(|pairs| (*code, pairs.iter().copied().collect::<Dictionary>()))
            })
            .collect();
        Self {
            tables,
            default_language: DEFAULT_LANGUAGE,
        }
    }

    pub fn has_language(&self, language: &str) -> bool {
        self.tables.contains_key(primary_subtag(language).as_str())
    }

    pub fn languages(&self) -> Vec<&'static str> {
        let mut codes: Vec<&'static str> = self.tables.keys().copied().collect();
        codes.sort_unstable();
        codes
    }

    fn find(&self, key: &str, language: &str) -> Option<&'static str> {
        let code = primary_subtag(language);
        self.tables
            .get(code.as_str())
            .and_then(|dict| dict.get(key))
            .or_else(|| {
                self.tables
                    .get(self.default_language)
                    .and_then(|dict| dict.get(key))
            })
            .copied()
    }

    pub fn lookup(&self, key: &str, language: &str) -> String {
        match self.find(key, language) {
            Some(text) => text.to_string(),
            None => {
                debug!("No translation for '{}' in '{}'", key, language);
                key.to_string()
            }
        }
    }

    /// Keys of the default table, used by invariant checks.
    pub fn default_keys(&self) -> Vec<&'static str> {
        self.tables
            .get(self.default_language)
            .map(|dict| dict.keys().copied().collect())
            .unwrap_or_default()
    }

    fn keys_of(&self, language: &str) -> Vec<&'static str> {
        self.tables
            .get(primary_subtag(language).as_str())
            .map(|dict| dict.keys().copied().collect())
            .unwrap_or_default()
    }
}

/// Native display name of a shipped language.
pub fn language_name(code: &str) -> Option<&'static str> {
    let code = primary_subtag(code);
    tables::LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Replace `{name}` placeholders with the given values.
pub fn fill(template: &str, params: &[(&str, &str)]) -> String {
    let mut text = template.to_string();
    for (name, value) in params {
        text = text.replace(&format!("{{{}}}", name), value);
    }
    text
}

/// Active-language front of the table plus the registry of bound elements.
pub struct TranslationStore {
    table: TranslationTable,
    active: String,
    bindings: Vec<TextBinding>,
    store: Option<SharedStore>,
}

impl TranslationStore {
    pub fn new(table: TranslationTable, language: &str) -> Self {
        let active = if table.has_language(language) {
            primary_subtag(language)
        } else {
            warn!("Unknown language '{}', using {}", language, DEFAULT_LANGUAGE);
            DEFAULT_LANGUAGE.to_string()
        };
        Self {
            table,
            active,
            bindings: Vec::new(),
            store: None,
        }
    }

    /// Attach durable storage; a saved preference naming a known table wins
    /// over the configured language.
    pub fn with_storage(mut self, store: SharedStore) -> Self {
        let saved: Option<String> = load_or_default(store.as_ref(), STORAGE_KEY_LANGUAGE);
        if let Some(code) = saved {
            if self.table.has_language(&code) {
                self.active = primary_subtag(&code);
                info!("Restored language preference '{}'", self.active);
            }
        }
        self.store = Some(store);
        self
    }

    pub fn active_language(&self) -> &str {
        &self.active
    }

    pub fn table(&self) -> &TranslationTable {
        &self.table
    }

    pub fn lookup(&self, key: &str, language: &str) -> String {
        self.table.lookup(key, language)
    }

    pub fn text(&self, key: &str) -> String {
        self.table.lookup(key, &self.active)
    }

    pub fn text_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        fill(&self.text(key), params)
    }

    /// Register an element and render it once in the active language.
    pub fn bind(&mut self, binding: TextBinding, presenter: &mut dyn Presenter) {
        self.render_binding(&binding, presenter);
        if let Some(existing) = self
            .bindings
            .iter_mut()
            .find(|b| b.target == binding.target && b.slot == binding.slot)
        {
            *existing = binding;
        } else {
            self.bindings.push(binding);
        }
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn clear_bindings(&mut self) {
        self.bindings.clear();
    }

    /// Switch the active language and re-render every bound element.
    /// Unknown codes are refused and change nothing.
    pub fn set_language(&mut self, code: &str, presenter: &mut dyn Presenter) -> bool {
        if !self.table.has_language(code) {
            warn!("Ignoring unknown language '{}'", code);
            return false;
        }
        let code = primary_subtag(code);
        if code != self.active {
            info!("Language changed {} -> {}", self.active, code);
            self.active = code;
            if let Some(store) = &self.store {
                save_logged(store.as_ref(), STORAGE_KEY_LANGUAGE, &self.active);
            }
        }
        let bindings = self.bindings.clone();
        for binding in &bindings {
            self.render_binding(binding, presenter);
        }
        true
    }

    fn render_binding(&self, binding: &TextBinding, presenter: &mut dyn Presenter) {
        presenter.render(&View::BoundText {
            binding: binding.clone(),
            text: self.text(&binding.key),
        });
    }
}

/// Format a number with Indian digit grouping (`12,34,567.5`).
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = (value.abs() * 100.0).round() / 100.0;
    let formatted = format!("{:.2}", rounded);
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');
    let mut out = String::new();
    if value < 0.0 && rounded > 0.0 {
        out.push('-');
    }
    out.push_str(&group_indian(int_part));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Format an INR amount: `₹1,23,456` or `₹99.50`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("₹{}", amount);
    }
    let rounded = (amount.abs() * 100.0).round() / 100.0;
    let formatted = format!("{:.2}", rounded);
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    let sign = if amount < 0.0 && rounded > 0.0 { "-" } else { "" };
    if frac_part == "00" {
        format!("{}₹{}", sign, group_indian(int_part))
    } else {
        format!("{}₹{}.{}", sign, group_indian(int_part), frac_part)
    }
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, last3) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();
    format!("{},{}", groups.join(","), last3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::testing::RecordingPresenter;
    use crate::storage::{LocalStore, MemoryStore};
    use std::sync::Arc;

    #[test]
    fn lookup_prefers_requested_language() {
        let table = TranslationTable::builtin();
        assert_eq!(table.lookup("loading", "hi"), "लोड हो रहा है...");
        assert_eq!(table.lookup("loading", "hi-IN"), "लोड हो रहा है...");
    }

    #[test]
    fn lookup_falls_back_to_default_then_key() {
        let table = TranslationTable::builtin();
        assert_eq!(table.lookup("fallback.generic", "ta"), table.lookup("fallback.generic", "en"));
        assert_eq!(table.lookup("loading", "xx"), "Loading...");
        assert_eq!(table.lookup("no.such.key", "hi"), "no.such.key");
    }

    #[test]
    fn default_table_is_superset_of_every_language() {
        let table = TranslationTable::builtin();
        let defaults = table.default_keys();
        for code in table.languages() {
            for key in table.keys_of(code) {
                assert!(defaults.contains(&key), "'{}' in {} missing from en", key, code);
            }
        }
    }

    #[test]
    fn every_default_key_is_non_empty_in_every_language() {
        let table = TranslationTable::builtin();
        for code in table.languages() {
            for key in table.default_keys() {
                assert!(!table.lookup(key, code).is_empty(), "{}:{}", code, key);
            }
        }
    }

    #[test]
    fn set_language_rerenders_bindings() {
        let mut store = TranslationStore::new(TranslationTable::builtin(), "en");
        let mut presenter = RecordingPresenter::default();
        store.bind(TextBinding::text("submit-btn", "submit"), &mut presenter);
        store.bind(TextBinding::placeholder("search-box", "search"), &mut presenter);
        assert_eq!(presenter.views().len(), 2);

        assert!(store.set_language("hi", &mut presenter));
        let views = presenter.views();
        assert_eq!(views.len(), 4);
        assert!(matches!(
            &views[2],
            View::BoundText { text, .. } if text == "जमा करें"
        ));
        assert!(matches!(
            &views[3],
            View::BoundText { text, .. } if text == "खोजें"
        ));
    }

    #[test]
    fn rebinding_same_target_replaces_entry() {
        let mut store = TranslationStore::new(TranslationTable::builtin(), "en");
        let mut presenter = RecordingPresenter::default();
        store.bind(TextBinding::text("status", "loading"), &mut presenter);
        store.bind(TextBinding::text("status", "success"), &mut presenter);
        assert_eq!(store.binding_count(), 1);
    }

    #[test]
    fn unknown_language_is_refused() {
        let mut store = TranslationStore::new(TranslationTable::builtin(), "en");
        let mut presenter = RecordingPresenter::default();
        assert!(!store.set_language("fr", &mut presenter));
        assert_eq!(store.active_language(), "en");
    }

    #[test]
    fn set_language_is_idempotent_and_persisted_once() {
        let backing = Arc::new(MemoryStore::new());
        let mut store = TranslationStore::new(TranslationTable::builtin(), "en")
            .with_storage(backing.clone());
        let mut presenter = RecordingPresenter::default();
        store.bind(TextBinding::title("logo", "resources"), &mut presenter);

        assert!(store.set_language("gu", &mut presenter));
        assert_eq!(backing.get(STORAGE_KEY_LANGUAGE).unwrap().as_deref(), Some("\"gu\""));
        backing.remove(STORAGE_KEY_LANGUAGE).unwrap();

        assert!(store.set_language("gu", &mut presenter));
        assert_eq!(store.active_language(), "gu");
        assert_eq!(backing.get(STORAGE_KEY_LANGUAGE).unwrap(), None);
        assert_eq!(presenter.views().len(), 3);
    }

    #[test]
    fn saved_preference_is_restored() {
        let backing = Arc::new(MemoryStore::new());
        backing.set(STORAGE_KEY_LANGUAGE, "\"mr\"").unwrap();
        let store = TranslationStore::new(TranslationTable::builtin(), "en").with_storage(backing);
        assert_eq!(store.active_language(), "mr");
        assert_eq!(store.text("rabi"), "रब्बी");
    }

    #[test]
    fn unknown_saved_preference_is_ignored() {
        let backing = Arc::new(MemoryStore::new());
        backing.set(STORAGE_KEY_LANGUAGE, "\"zz\"").unwrap();
        let store = TranslationStore::new(TranslationTable::builtin(), "hi").with_storage(backing);
        assert_eq!(store.active_language(), "hi");
    }

    #[test]
    fn text_with_fills_placeholders() {
        let store = TranslationStore::new(TranslationTable::builtin(), "en");
        assert_eq!(
            store.text_with("upload.ready", &[("name", "leaf.jpg")]),
            "Ready to analyze: leaf.jpg"
        );
    }

    #[test]
    fn language_names_are_native() {
        assert_eq!(language_name("hi-IN"), Some("हिंदी"));
        assert_eq!(language_name("fr"), None);
    }

    #[test]
    fn indian_grouping() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1234.0), "1,234");
        assert_eq!(format_number(1234567.5), "12,34,567.5");
        assert_eq!(format_number(-100000.0), "-1,00,000");
        assert_eq!(format_currency(123456.0), "₹1,23,456");
        assert_eq!(format_currency(99.5), "₹99.50");
        assert_eq!(format_currency(-2500.0), "-₹2,500");
    }
}
