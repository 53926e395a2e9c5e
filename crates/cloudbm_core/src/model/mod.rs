//! Reference-data catalog domain model.
//!
//! # Responsibility
//! - Define the item shape shared by all nine catalogs.
//! - Carry per-catalog parameters (`CatalogKind`) instead of per-type copies.
//! - Provide the translation resolver and list query types.
//!
//! # Invariants
//! - An item with an empty `id` is transient.
//! - Keys and translation languages are stored in normalized form.
//! - At most one translation per language.

pub mod catalog;
pub mod item;
pub mod query;
pub mod translation;
