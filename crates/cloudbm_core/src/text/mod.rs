//! Text normalization collaborators shared by every catalog.
//!
//! # Responsibility
//! - Case-fold keys and names before they are compared or stored.
//! - Normalize locale tags and supply the fallback language.
//!
//! # Invariants
//! - Normalizers are pure: the same input always yields the same output.
//! - Normalized language tags carry only the primary language subtag.

pub mod language;
pub mod normalizer;
