//! Localized text attached to catalog items and the fallback resolver.
//!
//! # Invariants
//! - Resolution never fails.
//! - When an item has at least one translation, resolution returns one of
//!   them and never a synthesized value.

use crate::text::language::normalize_language;
use serde::{Deserialize, Serialize};

/// One (language, name, description) triple.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    /// Normalized primary language subtag, e.g. `en`.
    pub language: String,
    pub name: String,
    /// Derived from `name` by the string normalizer; never read from input.
    #[serde(skip)]
    pub normalized_name: String,
    #[serde(default)]
    pub description: String,
}

impl LocalizedText {
    pub fn new(
        language: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into(),
            name: name.into(),
            normalized_name: String::new(),
            description: description.into(),
        }
    }
}

/// Finds the translation for `language` after normalizing it.
pub fn find_translation<'a>(
    translations: &'a [LocalizedText],
    language: &str,
) -> Option<&'a LocalizedText> {
    let normalized = normalize_language(language);
    translations
        .iter()
        .find(|translation| translation.language == normalized)
}

/// Resolves display text: requested language, then fallback language, then
/// the first stored translation, then an empty value.
pub fn resolve_translation(
    translations: &[LocalizedText],
    requested_language: &str,
    fallback_language: &str,
) -> LocalizedText {
    let Some(first) = translations.first() else {
        return LocalizedText::default();
    };

    if let Some(found) = find_translation(translations, requested_language) {
        return found.clone();
    }

    if normalize_language(fallback_language) != normalize_language(requested_language) {
        if let Some(found) = find_translation(translations, fallback_language) {
            return found.clone();
        }
    }

    first.clone()
}

#[cfg(test)]
mod tests {
    use super::{find_translation, resolve_translation, LocalizedText};

    fn sample() -> Vec<LocalizedText> {
        vec![
            LocalizedText::new("nl", "Thuis", "Thuisadres"),
            LocalizedText::new("en", "Home", "Home address"),
        ]
    }

    #[test]
    fn find_normalizes_requested_language() {
        let translations = sample();
        let found = find_translation(&translations, "EN-gb").expect("en should match");
        assert_eq!(found.name, "Home");
    }

    #[test]
    fn resolve_prefers_requested_language() {
        let resolved = resolve_translation(&sample(), "nl-BE", "en");
        assert_eq!(resolved.name, "Thuis");
    }

    #[test]
    fn resolve_uses_stored_order_as_last_resort() {
        let resolved = resolve_translation(&sample(), "fr", "de");
        assert_eq!(resolved.name, "Thuis");
    }

    #[test]
    fn resolve_empty_collection_yields_empty_text() {
        let resolved = resolve_translation(&[], "en", "en");
        assert_eq!(resolved, LocalizedText::default());
    }
}
