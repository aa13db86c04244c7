//! Products and taxonomy terms table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Products table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum ProductConstraints {
    #[strum(serialize = "products_name_length")]
    NameLength,
    #[strum(serialize = "products_price_non_negative")]
    PriceNonNegative,
    #[strum(serialize = "products_stock_non_negative")]
    StockNonNegative,
    #[strum(serialize = "products_updated_after_created")]
    UpdatedAfterCreated,
    #[strum(serialize = "products_created_by_fkey")]
    CreatedByReference,
    #[strum(serialize = "products_chemical_family_id_fkey")]
    ChemicalFamilyReference,
    #[strum(serialize = "products_polymer_type_id_fkey")]
    PolymerTypeReference,
    #[strum(serialize = "products_payment_terms_id_fkey")]
    PaymentTermsReference,
}

impl ProductConstraints {
    /// Creates a new [`ProductConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            ProductConstraints::NameLength
            | ProductConstraints::PriceNonNegative
            | ProductConstraints::StockNonNegative => ConstraintCategory::Validation,

            ProductConstraints::UpdatedAfterCreated => ConstraintCategory::Chronological,

            ProductConstraints::CreatedByReference
            | ProductConstraints::ChemicalFamilyReference
            | ProductConstraints::PolymerTypeReference
            | ProductConstraints::PaymentTermsReference => ConstraintCategory::Reference,
        }
    }
}

/// Taxonomy terms table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum TaxonomyTermConstraints {
    #[strum(serialize = "taxonomy_terms_name_length")]
    NameLength,
    #[strum(serialize = "taxonomy_terms_kind_name_unique")]
    KindNameUnique,
}

impl TaxonomyTermConstraints {
    /// Creates a new [`TaxonomyTermConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            TaxonomyTermConstraints::NameLength => ConstraintCategory::Validation,
            TaxonomyTermConstraints::KindNameUnique => ConstraintCategory::Uniqueness,
        }
    }
}

impl From<ProductConstraints> for String {
    #[inline]
    fn from(val: ProductConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ProductConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TaxonomyTermConstraints> for String {
    #[inline]
    fn from(val: TaxonomyTermConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for TaxonomyTermConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
