//! Locale tag normalization and fallback-language supply.
//!
//! Translations are keyed by primary language only: `en-US`, `EN` and
//! `en_GB` all normalize to `en`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Language used when no provider is configured.
pub const DEFAULT_LANGUAGE: &str = "en";

static LANGUAGE_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}(?:[-_][A-Za-z0-9]{1,8})*$").expect("valid language tag regex")
});

/// Normalizes a locale tag to its lower-cased primary language subtag.
///
/// Input that is not a well-formed tag is trimmed and lower-cased only, so
/// lookups stay total; structural validation rejects it before writes.
pub fn normalize_language(language: &str) -> String {
    let trimmed = language.trim();
    let primary = trimmed
        .split(['-', '_'])
        .next()
        .unwrap_or(trimmed);
    primary.to_ascii_lowercase()
}

/// Returns whether `language` is a well-formed locale tag.
pub fn is_valid_language_tag(language: &str) -> bool {
    LANGUAGE_TAG_RE.is_match(language.trim())
}

/// Supplies the language used when a requested translation is missing.
pub trait LanguageProvider: Send + Sync {
    fn default_language(&self) -> String;
}

/// Provider that always answers [`DEFAULT_LANGUAGE`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLanguageProvider;

impl LanguageProvider for DefaultLanguageProvider {
    fn default_language(&self) -> String {
        DEFAULT_LANGUAGE.to_string()
    }
}

/// Provider configured with one fixed language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedLanguageProvider {
    language: String,
}

impl FixedLanguageProvider {
    pub fn new(language: &str) -> Self {
        Self {
            language: normalize_language(language),
        }
    }
}

impl LanguageProvider for FixedLanguageProvider {
    fn default_language(&self) -> String {
        self.language.clone()
    }
}
