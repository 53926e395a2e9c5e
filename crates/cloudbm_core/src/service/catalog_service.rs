//! Catalog use-case service.
//!
//! # Responsibility
//! - Provide List/Get/Create/Update/Delete for any reference-data catalog.
//! - Compose normalization, structural validation, the uniqueness validator
//!   and the default enforcer over a `CatalogStore`.
//! - Resolve display text with the configured fallback language.
//!
//! # Invariants
//! - Create/Update/Delete run their reads and writes in one store
//!   transaction; a rejected or failed operation leaves no partial writes.
//! - Create/Update return the item re-read from storage.
//! - System items are never deleted and never change key.
//! - For catalogs enforcing defaults, the current default is never deleted
//!   and at most one item is flagged after each operation.

use crate::model::catalog::CatalogKind;
use crate::model::item::{CatalogItem, CatalogValidationError};
use crate::model::query::{CatalogListQuery, CatalogPage, CatalogSummary, CatalogSummaryPage};
use crate::model::translation::{resolve_translation, LocalizedText};
use crate::repo::catalog_repo::{CatalogStore, RepoError};
use crate::service::default_enforcer::enforce_default;
use crate::service::uniqueness::validate_unique;
use crate::text::language::{DefaultLanguageProvider, LanguageProvider};
use crate::text::normalizer::{DefaultStringNormalizer, StringNormalizer};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;
use std::time::Instant;

pub type CatalogResult<T> = Result<T, CatalogServiceError>;

/// Errors returned by catalog operations.
///
/// Business-rule variants carry the catalog so messages and status mapping
/// stay catalog-specific without one error type per catalog.
#[derive(Debug)]
pub enum CatalogServiceError {
    /// No item with this id in the catalog.
    NotFound { catalog: CatalogKind, id: String },
    /// Another item already uses the normalized key.
    DuplicateKey { catalog: CatalogKind, key: String },
    /// Another item already uses the (language, name) pair.
    DuplicateName {
        catalog: CatalogKind,
        language: String,
        name: String,
    },
    /// Mutation not allowed on a system item.
    ReadOnly { catalog: CatalogKind, id: String },
    /// The item is the catalog's current default.
    IsDefault { catalog: CatalogKind, id: String },
    /// Candidate failed structural validation.
    Validation(CatalogValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Write succeeded but read-back did not find the item.
    InconsistentState(&'static str),
}

/// Flat discriminant of [`CatalogServiceError`] for transport mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogErrorKind {
    NotFound,
    DuplicateKey,
    DuplicateName,
    ReadOnly,
    IsDefault,
    Validation,
    Storage,
}

impl CatalogServiceError {
    pub fn kind(&self) -> CatalogErrorKind {
        match self {
            Self::NotFound { .. } => CatalogErrorKind::NotFound,
            Self::DuplicateKey { .. } => CatalogErrorKind::DuplicateKey,
            Self::DuplicateName { .. } => CatalogErrorKind::DuplicateName,
            Self::ReadOnly { .. } => CatalogErrorKind::ReadOnly,
            Self::IsDefault { .. } => CatalogErrorKind::IsDefault,
            Self::Validation(_) => CatalogErrorKind::Validation,
            Self::Repo(_) | Self::InconsistentState(_) => CatalogErrorKind::Storage,
        }
    }

    /// Catalog named by a business-rule error.
    pub fn catalog(&self) -> Option<CatalogKind> {
        match self {
            Self::NotFound { catalog, .. }
            | Self::DuplicateKey { catalog, .. }
            | Self::DuplicateName { catalog, .. }
            | Self::ReadOnly { catalog, .. }
            | Self::IsDefault { catalog, .. } => Some(*catalog),
            Self::Validation(_) | Self::Repo(_) | Self::InconsistentState(_) => None,
        }
    }
}

impl Display for CatalogServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { catalog, id } => write!(f, "{} not found: {id}", catalog.label()),
            Self::DuplicateKey { catalog, key } => {
                write!(f, "{} with same key exists: {key}", catalog.label())
            }
            Self::DuplicateName {
                catalog,
                language,
                name,
            } => write!(
                f,
                "{} with same language/name exists: {language}/{name}",
                catalog.label()
            ),
            Self::ReadOnly { catalog, id } => {
                write!(f, "{} is read only: {id}", catalog.label())
            }
            Self::IsDefault { catalog, id } => {
                write!(f, "{} is the current default: {id}", catalog.label())
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent catalog state: {details}")
            }
        }
    }
}

impl Error for CatalogServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CatalogServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<CatalogValidationError> for CatalogServiceError {
    fn from(value: CatalogValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Collaborators injected into every catalog service.
///
/// `Default` supplies the default normalizer and language provider, so
/// callers only override what they need.
#[derive(Clone)]
pub struct CatalogOptions {
    pub normalizer: Arc<dyn StringNormalizer>,
    pub language_provider: Arc<dyn LanguageProvider>,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            normalizer: Arc::new(DefaultStringNormalizer),
            language_provider: Arc::new(DefaultLanguageProvider),
        }
    }
}

impl Debug for CatalogOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogOptions")
            .field(
                "default_language",
                &self.language_provider.default_language(),
            )
            .finish_non_exhaustive()
    }
}

/// Catalog engine over one store; one instance per catalog.
pub struct CatalogService<S: CatalogStore> {
    store: S,
    options: CatalogOptions,
}

impl<S: CatalogStore> CatalogService<S> {
    /// Creates a service with default collaborators.
    pub fn new(store: S) -> Self {
        Self::with_options(store, CatalogOptions::default())
    }

    pub fn with_options(store: S, options: CatalogOptions) -> Self {
        Self { store, options }
    }

    pub fn catalog(&self) -> CatalogKind {
        self.store.catalog()
    }

    /// Lists items. Filter, sort and paging pass through to the store.
    pub fn list_items(&self, query: &CatalogListQuery) -> CatalogResult<CatalogPage> {
        self.store.list_items(query).map_err(|err| {
            error!(
                "event=catalog_list module=service status=error catalog={} error={}",
                self.catalog(),
                err
            );
            err.into()
        })
    }

    /// Lists items projected to rows with resolved display text.
    ///
    /// `language = None` resolves in the configured default language.
    pub fn list_summaries(
        &self,
        query: &CatalogListQuery,
        language: Option<&str>,
    ) -> CatalogResult<CatalogSummaryPage> {
        let page = self.list_items(query)?;
        let items = page
            .items
            .into_iter()
            .map(|item| {
                let text = self.resolve_translation(&item, language);
                CatalogSummary {
                    id: item.id,
                    key: item.key,
                    name: text.name,
                    description: text.description,
                    is_default: item.is_default,
                    is_system: item.is_system,
                    rate: item.rate,
                }
            })
            .collect();

        Ok(CatalogSummaryPage {
            items,
            total_count: page.total_count,
        })
    }

    /// Gets one item by id; absence is `NotFound`.
    pub fn get_item_by_id(&self, id: &str) -> CatalogResult<CatalogItem> {
        self.store
            .get_item_by_id(id)?
            .ok_or_else(|| self.not_found(id))
    }

    /// Gets one item by key after normalizing it; absence is not an error.
    pub fn get_item_by_key(&self, key: &str) -> CatalogResult<Option<CatalogItem>> {
        let key = self.options.normalizer.normalize(key);
        Ok(self.store.get_item_by_key(&key)?)
    }

    /// Gets the catalog's flagged default item, if any.
    pub fn get_default_item(&self) -> CatalogResult<Option<CatalogItem>> {
        Ok(self.store.get_default_item()?)
    }

    /// Creates an item and returns it as stored.
    ///
    /// Any caller-supplied id is discarded. When the candidate is flagged
    /// default in an enforcing catalog, the previous default is cleared in
    /// the same transaction.
    pub fn create_item(&self, mut candidate: CatalogItem) -> CatalogResult<CatalogItem> {
        let started_at = Instant::now();
        candidate.id.clear();
        candidate.normalize(self.options.normalizer.as_ref());
        let key = candidate.key.clone();

        let result = candidate
            .validate_for(self.catalog())
            .map_err(CatalogServiceError::from)
            .and_then(|()| {
                self.store.atomically(|store| {
                    validate_unique(store, &candidate)?;
                    enforce_default(store, &candidate)?;
                    let id = store.create_item(&candidate)?;
                    store
                        .get_item_by_id(&id)?
                        .ok_or(CatalogServiceError::InconsistentState(
                            "created catalog item not found in read-back",
                        ))
                })
            });

        let subject = match &result {
            Ok(item) => item.id.as_str(),
            Err(_) => "",
        };
        self.log_outcome("catalog_create", subject, &key, started_at, &result);
        result
    }

    /// Updates an item and returns it as stored.
    ///
    /// Translations are replaced wholesale; `is_default` and `rate` are
    /// copied from the candidate. A non-empty candidate key that differs from the stored
    /// key renames the item, except for system items (`ReadOnly`).
    pub fn update_item(&self, id: &str, mut candidate: CatalogItem) -> CatalogResult<CatalogItem> {
        let started_at = Instant::now();
        candidate.normalize(self.options.normalizer.as_ref());
        let catalog = self.catalog();

        let result = self.store.atomically(|store| {
            let mut merged = store
                .get_item_by_id(id)?
                .ok_or_else(|| self.not_found(id))?;

            if !candidate.key.is_empty() && candidate.key != merged.key {
                if merged.is_system {
                    return Err(CatalogServiceError::ReadOnly {
                        catalog,
                        id: id.to_string(),
                    });
                }
                merged.key = candidate.key;
            }
            merged.translations = candidate.translations;
            merged.is_default = candidate.is_default;
            merged.rate = candidate.rate;

            merged.validate_for(catalog)?;
            validate_unique(store, &merged)?;
            enforce_default(store, &merged)?;
            store.update_item(&merged)?;
            store
                .get_item_by_id(id)?
                .ok_or(CatalogServiceError::InconsistentState(
                    "updated catalog item not found in read-back",
                ))
        });

        let key = match &result {
            Ok(item) => item.key.as_str(),
            Err(_) => "",
        };
        self.log_outcome("catalog_update", id, key, started_at, &result);
        result
    }

    /// Deletes an item.
    ///
    /// Rejected with `ReadOnly` for system items and with `IsDefault` for the
    /// current default of an enforcing catalog.
    pub fn delete_item(&self, id: &str) -> CatalogResult<()> {
        let started_at = Instant::now();
        let catalog = self.catalog();

        let result = self.store.atomically(|store| {
            let existing = store
                .get_item_by_id(id)?
                .ok_or_else(|| self.not_found(id))?;
            if existing.is_system {
                return Err(CatalogServiceError::ReadOnly {
                    catalog,
                    id: id.to_string(),
                });
            }
            if catalog.enforces_default() && existing.is_default {
                return Err(CatalogServiceError::IsDefault {
                    catalog,
                    id: id.to_string(),
                });
            }
            store.delete_item(&existing)?;
            Ok(existing.key)
        });

        let key = result.as_deref().unwrap_or("");
        self.log_outcome("catalog_delete", id, key, started_at, &result);
        result.map(|_| ())
    }

    /// Resolves display text for `item`.
    ///
    /// Falls back to the configured default language, then to the first
    /// stored translation. `language = None` requests the default language.
    pub fn resolve_translation(&self, item: &CatalogItem, language: Option<&str>) -> LocalizedText {
        let fallback = self.options.language_provider.default_language();
        let requested = language.unwrap_or(fallback.as_str());
        resolve_translation(&item.translations, requested, &fallback)
    }

    fn not_found(&self, id: &str) -> CatalogServiceError {
        CatalogServiceError::NotFound {
            catalog: self.catalog(),
            id: id.to_string(),
        }
    }

    fn log_outcome<T>(
        &self,
        event: &'static str,
        id: &str,
        key: &str,
        started_at: Instant,
        result: &CatalogResult<T>,
    ) {
        let duration_ms = started_at.elapsed().as_millis();
        match result {
            Ok(_) => info!(
                "event={event} module=service status=ok catalog={} id={id} key={key} duration_ms={duration_ms}",
                self.catalog()
            ),
            Err(err) if err.kind() == CatalogErrorKind::Storage => error!(
                "event={event} module=service status=error catalog={} id={id} duration_ms={duration_ms} error={err}",
                self.catalog()
            ),
            Err(err) => warn!(
                "event={event} module=service status=rejected catalog={} id={id} duration_ms={duration_ms} error_code={:?}",
                self.catalog(),
                err.kind()
            ),
        }
    }
}
