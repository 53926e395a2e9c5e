//! Catalog identities and their per-catalog parameters.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// One reference-data catalog.
///
/// Every catalog shares the same item shape and engine; the variants only
/// differ in storage tag, label and whether the default singleton applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    AddressType,
    PhoneType,
    EmailType,
    UriType,
    ContactTitle,
    CompanyType,
    Industry,
    JobTitle,
    TaxProfile,
}

impl CatalogKind {
    /// All catalogs in declaration order.
    pub const ALL: [CatalogKind; 9] = [
        Self::AddressType,
        Self::PhoneType,
        Self::EmailType,
        Self::UriType,
        Self::ContactTitle,
        Self::CompanyType,
        Self::Industry,
        Self::JobTitle,
        Self::TaxProfile,
    ];

    /// Stable tag stored in `catalog_items.catalog`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddressType => "address_type",
            Self::PhoneType => "phone_type",
            Self::EmailType => "email_type",
            Self::UriType => "uri_type",
            Self::ContactTitle => "contact_title",
            Self::CompanyType => "company_type",
            Self::Industry => "industry",
            Self::JobTitle => "job_title",
            Self::TaxProfile => "tax_profile",
        }
    }

    /// Human-readable label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::AddressType => "address type",
            Self::PhoneType => "phone type",
            Self::EmailType => "email type",
            Self::UriType => "uri type",
            Self::ContactTitle => "contact title",
            Self::CompanyType => "company type",
            Self::Industry => "industry",
            Self::JobTitle => "job title",
            Self::TaxProfile => "tax profile",
        }
    }

    /// Whether "at most one default" is maintained for this catalog.
    ///
    /// Other catalogs store `is_default` as given without enforcement.
    /// Keep in sync with `idx_catalog_items_single_default`.
    pub fn enforces_default(self) -> bool {
        matches!(
            self,
            Self::AddressType | Self::PhoneType | Self::EmailType | Self::UriType
        )
    }

    /// Parses a storage tag back into a catalog.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value.trim())
    }
}

impl Display for CatalogKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown catalog tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCatalogError(pub String);

impl Display for UnknownCatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown catalog: `{}`", self.0)
    }
}

impl Error for UnknownCatalogError {}

impl FromStr for CatalogKind {
    type Err = UnknownCatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| UnknownCatalogError(value.to_string()))
    }
}
