//! Catalog use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into catalog-level operations.
//! - Own the cross-record rules: key/name uniqueness and the default
//!   singleton.
//! - Keep request layers decoupled from storage details.

pub mod catalog_service;
pub mod default_enforcer;
pub mod uniqueness;
