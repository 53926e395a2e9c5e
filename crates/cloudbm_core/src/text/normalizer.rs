//! Key/name normalization.

/// Case-folds identifiers before comparison or persistence.
///
/// Implementations must be deterministic; uniqueness checks rely on two equal
/// inputs producing equal outputs.
pub trait StringNormalizer: Send + Sync {
    fn normalize(&self, value: &str) -> String;
}

/// Default normalizer: trims surrounding whitespace and lower-cases.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStringNormalizer;

impl StringNormalizer for DefaultStringNormalizer {
    fn normalize(&self, value: &str) -> String {
        value.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::{DefaultStringNormalizer, StringNormalizer};

    #[test]
    fn default_normalizer_trims_and_lowercases() {
        let normalizer = DefaultStringNormalizer;
        assert_eq!(normalizer.normalize("  Home "), "home");
        assert_eq!(normalizer.normalize("ÉCOLE"), "école");
    }

    #[test]
    fn default_normalizer_keeps_inner_whitespace() {
        assert_eq!(DefaultStringNormalizer.normalize("Head Office"), "head office");
    }
}
