//! Taxonomy kind enumeration.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Reference list a taxonomy term belongs to.
///
/// Corresponds to the `TAXONOMY_KIND` PostgreSQL enum.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[ExistingTypePath = "crate::schema::sql_types::TaxonomyKind"]
#[strum(serialize_all = "snake_case")]
pub enum TaxonomyKind {
    #[db_rename = "chemical_family"]
    #[serde(rename = "chemical_family")]
    ChemicalFamily,

    #[db_rename = "polymer_type"]
    #[serde(rename = "polymer_type")]
    PolymerType,

    #[db_rename = "grade"]
    #[serde(rename = "grade")]
    Grade,

    #[db_rename = "industry"]
    #[serde(rename = "industry")]
    Industry,

    #[db_rename = "incoterm"]
    #[serde(rename = "incoterm")]
    Incoterm,

    #[db_rename = "packaging_type"]
    #[serde(rename = "packaging_type")]
    PackagingType,

    #[db_rename = "payment_terms"]
    #[serde(rename = "payment_terms")]
    PaymentTerms,
}

impl TaxonomyKind {
    /// Kinds stored in `product_terms` rather than a product column.
    #[inline]
    pub fn is_multi_valued(self) -> bool {
        matches!(
            self,
            TaxonomyKind::Grade
                | TaxonomyKind::Industry
                | TaxonomyKind::Incoterm
                | TaxonomyKind::PackagingType
        )
    }
}
