//! Catalog item model.
//!
//! # Responsibility
//! - Define the record shared by every reference-data catalog.
//! - Normalize keys, languages and names through injected collaborators.
//! - Validate structural invariants before persistence.
//!
//! # Invariants
//! - `id` is empty exactly while the item is transient.
//! - `key` is non-blank after normalization.
//! - Each translation language is a well-formed tag and appears once.
//! - Each translation name is non-blank.
//! - Tax profiles carry a non-negative rate; other catalogs carry none.

use crate::model::catalog::CatalogKind;
use crate::model::translation::LocalizedText;
use crate::text::language::{is_valid_language_tag, normalize_language};
use crate::text::normalizer::StringNormalizer;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One entry of a reference-data catalog.
///
/// The owning catalog is implied by the store or service the item flows
/// through, so one shape serves all catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Server-assigned id; empty while transient.
    #[serde(default)]
    pub id: String,
    pub key: String,
    /// Ordered; the first entry is the last-resort display text.
    #[serde(default)]
    pub translations: Vec<LocalizedText>,
    #[serde(default)]
    pub is_default: bool,
    /// Seeded, protected entry. Cannot be deleted and keeps its key.
    #[serde(default)]
    pub is_system: bool,
    /// Tax rate; required for tax profiles and absent elsewhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<Decimal>,
}

/// Structural validation errors for catalog items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogValidationError {
    EmptyKey,
    InvalidLanguage(String),
    EmptyName { language: String },
    DuplicateLanguage(String),
    MissingRate,
    NegativeRate(Decimal),
    UnexpectedRate(CatalogKind),
}

impl Display for CatalogValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyKey => write!(f, "key must not be blank"),
            Self::InvalidLanguage(value) => write!(f, "invalid translation language `{value}`"),
            Self::EmptyName { language } => {
                write!(f, "translation name must not be blank (language `{language}`)")
            }
            Self::DuplicateLanguage(value) => {
                write!(f, "translation language `{value}` appears more than once")
            }
            Self::MissingRate => write!(f, "tax profile requires a rate"),
            Self::NegativeRate(rate) => write!(f, "rate must not be negative, got {rate}"),
            Self::UnexpectedRate(catalog) => {
                write!(f, "{} does not carry a rate", catalog.label())
            }
        }
    }
}

impl Error for CatalogValidationError {}

impl CatalogItem {
    /// Creates a transient item with no translations.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Appends one translation, builder style.
    pub fn with_translation(
        mut self,
        language: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.translations
            .push(LocalizedText::new(language, name, description));
        self
    }

    /// Sets the tax rate, builder style.
    pub fn with_rate(mut self, rate: Decimal) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Sets the default flag, builder style.
    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    /// Returns whether the item has not been persisted yet.
    pub fn is_transient(&self) -> bool {
        self.id.is_empty()
    }

    /// Normalizes key, translation languages and derived normalized names.
    pub fn normalize(&mut self, normalizer: &dyn StringNormalizer) {
        self.key = normalizer.normalize(&self.key);
        for translation in &mut self.translations {
            translation.language = normalize_language(&translation.language);
            translation.normalized_name = normalizer.normalize(&translation.name);
        }
    }

    /// Validates structural invariants.
    ///
    /// Expects a normalized item; cross-record uniqueness is checked by the
    /// service layer against storage.
    pub fn validate(&self) -> Result<(), CatalogValidationError> {
        if self.key.trim().is_empty() {
            return Err(CatalogValidationError::EmptyKey);
        }

        let mut seen = HashSet::new();
        for translation in &self.translations {
            if !is_valid_language_tag(&translation.language) {
                return Err(CatalogValidationError::InvalidLanguage(
                    translation.language.clone(),
                ));
            }
            if translation.name.trim().is_empty() {
                return Err(CatalogValidationError::EmptyName {
                    language: translation.language.clone(),
                });
            }
            if !seen.insert(translation.language.as_str()) {
                return Err(CatalogValidationError::DuplicateLanguage(
                    translation.language.clone(),
                ));
            }
        }

        Ok(())
    }

    /// Validates structure plus the fields owned by `catalog`.
    pub fn validate_for(&self, catalog: CatalogKind) -> Result<(), CatalogValidationError> {
        self.validate()?;

        match (catalog, self.rate) {
            (CatalogKind::TaxProfile, None) => Err(CatalogValidationError::MissingRate),
            (CatalogKind::TaxProfile, Some(rate)) if rate < Decimal::ZERO => {
                Err(CatalogValidationError::NegativeRate(rate))
            }
            (CatalogKind::TaxProfile, Some(_)) | (_, None) => Ok(()),
            (other, Some(_)) => Err(CatalogValidationError::UnexpectedRate(other)),
        }
    }
}
