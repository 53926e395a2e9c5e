//! Core domain logic for the reference-data catalogs.
//! This crate is the single source of truth for catalog invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;
pub mod text;

pub use config::{ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LogTarget};
pub use model::catalog::{CatalogKind, UnknownCatalogError};
pub use model::item::{CatalogItem, CatalogValidationError};
pub use model::query::{
    CatalogFilter, CatalogListQuery, CatalogPage, CatalogSummary, CatalogSummaryPage, Sort,
    SortField, SortOrder,
};
pub use model::translation::{find_translation, resolve_translation, LocalizedText};
pub use repo::catalog_repo::{CatalogStore, RepoError, RepoResult, SqliteCatalogStore};
pub use seed::{parse_seed_entries, seed_system_items, SeedEntry, SeedReport};
pub use service::catalog_service::{
    CatalogErrorKind, CatalogOptions, CatalogResult, CatalogService, CatalogServiceError,
};
pub use text::language::{
    DefaultLanguageProvider, FixedLanguageProvider, LanguageProvider, DEFAULT_LANGUAGE,
};
pub use text::normalizer::{DefaultStringNormalizer, StringNormalizer};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
