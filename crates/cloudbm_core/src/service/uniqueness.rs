//! Catalog-wide key and (language, name) uniqueness checks.
//!
//! # Invariants
//! - Key is checked before names; names in translation order.
//! - The first violation is reported.
//! - A stored record never conflicts with itself, so re-saving an unchanged
//!   item succeeds.

use crate::model::item::CatalogItem;
use crate::repo::catalog_repo::CatalogStore;
use crate::service::catalog_service::{CatalogResult, CatalogServiceError};

/// Checks a normalized candidate against the items stored in its catalog.
pub fn validate_unique<S: CatalogStore>(store: &S, candidate: &CatalogItem) -> CatalogResult<()> {
    if let Some(existing) = store.get_item_by_key(&candidate.key)? {
        if !is_same_record(&existing, candidate) {
            return Err(CatalogServiceError::DuplicateKey {
                catalog: store.catalog(),
                key: candidate.key.clone(),
            });
        }
    }

    for translation in &candidate.translations {
        let existing =
            store.get_item_by_name(&translation.language, &translation.normalized_name)?;
        if let Some(existing) = existing {
            if !is_same_record(&existing, candidate) {
                return Err(CatalogServiceError::DuplicateName {
                    catalog: store.catalog(),
                    language: translation.language.clone(),
                    name: translation.name.clone(),
                });
            }
        }
    }

    Ok(())
}

fn is_same_record(existing: &CatalogItem, candidate: &CatalogItem) -> bool {
    !candidate.is_transient() && existing.id == candidate.id
}

#[cfg(test)]
mod tests {
    use super::is_same_record;
    use crate::model::item::CatalogItem;

    #[test]
    fn transient_candidate_never_matches_stored_record() {
        let stored = CatalogItem {
            id: "a".to_string(),
            ..CatalogItem::new("home")
        };
        assert!(!is_same_record(&stored, &CatalogItem::new("home")));
    }

    #[test]
    fn persisted_candidate_matches_itself_only() {
        let stored = CatalogItem {
            id: "a".to_string(),
            ..CatalogItem::new("home")
        };
        let same = CatalogItem {
            id: "a".to_string(),
            ..CatalogItem::new("home")
        };
        let other = CatalogItem {
            id: "b".to_string(),
            ..CatalogItem::new("home")
        };
        assert!(is_same_record(&stored, &same));
        assert!(!is_same_record(&stored, &other));
    }
}
