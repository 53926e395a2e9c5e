//! System-item seeding.
//!
//! # Responsibility
//! - Parse seed documents into catalog entries.
//! - Install protected system items through the catalog service, so seeded
//!   data obeys the same uniqueness and default rules as user data.
//!
//! # Invariants
//! - Seeding is idempotent: an entry whose key already exists in its catalog
//!   is skipped, never overwritten.
//! - Every created item has `is_system = true`.
//! - Entries are applied in document order; the first failure stops the run.

use crate::model::catalog::CatalogKind;
use crate::model::item::CatalogItem;
use crate::model::translation::LocalizedText;
use crate::repo::catalog_repo::SqliteCatalogStore;
use crate::service::catalog_service::{
    CatalogOptions, CatalogResult, CatalogService, CatalogServiceError,
};
use log::info;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;

/// One system item to install.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedEntry {
    pub catalog: CatalogKind,
    pub key: String,
    pub translations: Vec<LocalizedText>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub rate: Option<Decimal>,
}

impl SeedEntry {
    fn to_item(&self) -> CatalogItem {
        CatalogItem {
            id: String::new(),
            key: self.key.clone(),
            translations: self.translations.clone(),
            is_default: self.is_default,
            is_system: true,
            rate: self.rate,
        }
    }
}

/// Outcome of one seeding run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub skipped: usize,
    /// Created count per catalog.
    pub created_by_catalog: BTreeMap<CatalogKind, usize>,
}

/// Parses a JSON array of seed entries.
pub fn parse_seed_entries(raw: &str) -> Result<Vec<SeedEntry>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Installs `entries` as system items, skipping keys already present.
pub fn seed_system_items(
    conn: &Connection,
    entries: &[SeedEntry],
    options: &CatalogOptions,
) -> CatalogResult<SeedReport> {
    let mut report = SeedReport::default();

    for entry in entries {
        let store = SqliteCatalogStore::try_new(conn, entry.catalog)
            .map_err(CatalogServiceError::from)?;
        let service = CatalogService::with_options(store, options.clone());

        if service.get_item_by_key(&entry.key)?.is_some() {
            report.skipped += 1;
            continue;
        }

        service.create_item(entry.to_item())?;
        report.created += 1;
        *report.created_by_catalog.entry(entry.catalog).or_insert(0) += 1;
    }

    info!(
        "event=catalog_seed module=seed status=ok entries={} created={} skipped={}",
        entries.len(),
        report.created,
        report.skipped
    );
    Ok(report)
}
