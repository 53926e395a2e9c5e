//! Default-singleton maintenance for catalogs that enforce it.
//!
//! # Invariants
//! - Only catalogs with `CatalogKind::enforces_default()` are touched.
//! - Must run inside the caller's store transaction, before the candidate
//!   itself is written with `is_default = true`.

use crate::model::item::CatalogItem;
use crate::repo::catalog_repo::{CatalogStore, RepoResult};
use log::info;

/// Clears the current default when `candidate` takes over the flag.
///
/// Persisting the candidate is left to the caller.
pub fn enforce_default<S: CatalogStore>(
    store: &S,
    candidate: &CatalogItem,
) -> RepoResult<()> {
    if !candidate.is_default || !store.catalog().enforces_default() {
        return Ok(());
    }

    let Some(mut current) = store.get_default_item()? else {
        return Ok(());
    };
    if current.id == candidate.id {
        return Ok(());
    }

    current.is_default = false;
    store.update_item(&current)?;
    info!(
        "event=catalog_default_swap module=service status=ok catalog={} previous_id={} previous_key={}",
        store.catalog(),
        current.id,
        current.key
    );

    Ok(())
}
