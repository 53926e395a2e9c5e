//! Repository layer for catalog persistence.
//!
//! # Responsibility
//! - Define the store contract the catalog engine composes.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `CatalogItem::validate()` before persistence.
//! - Lookups return `Ok(None)` for absence; writes report `NotFound` when no
//!   row changed.

pub mod catalog_repo;
