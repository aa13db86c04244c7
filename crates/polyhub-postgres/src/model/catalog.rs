//! Product and taxonomy models.

use bigdecimal::BigDecimal;
use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::{product_terms, products, taxonomy_terms};
use crate::types::TaxonomyKind;

/// Catalog entry owned by one seller or admin account.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub chemical_name: Option<String>,
    pub trade_name: Option<String>,
    pub description: Option<String>,
    pub density: Option<BigDecimal>,
    /// Melt flow index.
    pub mfi: Option<BigDecimal>,
    pub tensile_strength: Option<BigDecimal>,
    pub price: Option<BigDecimal>,
    pub stock: Option<BigDecimal>,
    pub uom: Option<String>,
    pub lead_time: Option<String>,
    pub chemical_family_id: Option<Uuid>,
    pub polymer_type_id: Option<Uuid>,
    pub payment_terms_id: Option<Uuid>,
    /// Owning account. Resolves the seller of product quotes.
    pub created_by: Uuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, Insertable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewProduct {
    pub name: String,
    pub chemical_name: Option<String>,
    pub trade_name: Option<String>,
    pub description: Option<String>,
    pub density: Option<BigDecimal>,
    pub mfi: Option<BigDecimal>,
    pub tensile_strength: Option<BigDecimal>,
    pub price: Option<BigDecimal>,
    pub stock: Option<BigDecimal>,
    pub uom: Option<String>,
    pub lead_time: Option<String>,
    pub chemical_family_id: Option<Uuid>,
    pub polymer_type_id: Option<Uuid>,
    pub payment_terms_id: Option<Uuid>,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub chemical_name: Option<Option<String>>,
    pub trade_name: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub density: Option<Option<BigDecimal>>,
    pub mfi: Option<Option<BigDecimal>>,
    pub tensile_strength: Option<Option<BigDecimal>>,
    pub price: Option<Option<BigDecimal>>,
    pub stock: Option<Option<BigDecimal>>,
    pub uom: Option<Option<String>>,
    pub lead_time: Option<Option<String>>,
    pub chemical_family_id: Option<Option<Uuid>>,
    pub polymer_type_id: Option<Option<Uuid>>,
    pub payment_terms_id: Option<Option<Uuid>>,
}

/// Link between a product and a multi-valued taxonomy term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = product_terms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductTerm {
    pub product_id: Uuid,
    pub term_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = taxonomy_terms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaxonomyTerm {
    pub id: Uuid,
    pub kind: TaxonomyKind,
    pub name: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = taxonomy_terms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewTaxonomyTerm {
    pub kind: TaxonomyKind,
    pub name: String,
}
