//! List query, sort and page types passed through to catalog stores.

use crate::model::item::CatalogItem;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of one sort field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Field is listed but contributes no ordering.
    #[default]
    None,
    Ascending,
    Descending,
}

/// One named sort field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    pub name: String,
    pub order: SortOrder,
}

impl SortField {
    pub fn ascending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            order: SortOrder::Ascending,
        }
    }

    pub fn descending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            order: SortOrder::Descending,
        }
    }
}

/// Ordered sort specification. Interpretation belongs to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub fields: Vec<SortField>,
}

/// Optional list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFilter {
    /// Only items with a translation in this language.
    pub language: Option<String>,
    /// Case-insensitive translation name prefix.
    pub name: Option<String>,
}

/// Query options for listing catalog items.
///
/// No bound is applied to `limit` here; request layers own that policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogListQuery {
    pub offset: u32,
    pub limit: Option<u32>,
    pub filter: CatalogFilter,
    pub sort: Sort,
}

/// One page of items plus the unpaged match count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogPage {
    pub items: Vec<CatalogItem>,
    pub total_count: u64,
}

/// List row with its translation resolved for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub id: String,
    pub key: String,
    pub name: String,
    pub description: String,
    pub is_default: bool,
    pub is_system: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<Decimal>,
}

/// Page of resolved list rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSummaryPage {
    pub items: Vec<CatalogSummary>,
    pub total_count: u64,
}
