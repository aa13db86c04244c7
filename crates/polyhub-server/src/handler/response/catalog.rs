//! Product and taxonomy response types.

use bigdecimal::BigDecimal;
use jiff::Timestamp;
use polyhub_postgres::model;
use polyhub_postgres::types::TaxonomyKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a taxonomy term in API responses.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyTerm {
    pub id: Uuid,
    pub kind: TaxonomyKind,
    pub name: String,
    pub created_at: Timestamp,
}

/// List of taxonomy terms.
pub type TaxonomyTerms = Vec<TaxonomyTerm>;

impl From<model::TaxonomyTerm> for TaxonomyTerm {
    fn from(term: model::TaxonomyTerm) -> Self {
        Self {
            id: term.id,
            kind: term.kind,
            name: term.name,
            created_at: term.created_at.into(),
        }
    }
}

/// Represents a catalog product in API responses.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chemical_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub density: Option<BigDecimal>,
    /// Melt flow index.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub mfi: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub tensile_strength: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub price: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub stock: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chemical_family_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polymer_type_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_terms_id: Option<Uuid>,
    /// Multi-valued references: grades, industries, incoterms, packaging types.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub terms: Vec<TaxonomyTerm>,
    /// Owning seller account.
    pub created_by: Uuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Product {
    /// Builds the response from a product row and its linked terms.
    pub fn with_terms(product: model::Product, terms: Vec<model::TaxonomyTerm>) -> Self {
        let mut response = Self::from(product);
        response.terms = terms.into_iter().map(Into::into).collect();
        response
    }
}

impl From<model::Product> for Product {
    fn from(product: model::Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            chemical_name: product.chemical_name,
            trade_name: product.trade_name,
            description: product.description,
            density: product.density,
            mfi: product.mfi,
            tensile_strength: product.tensile_strength,
            price: product.price,
            stock: product.stock,
            uom: product.uom,
            lead_time: product.lead_time,
            chemical_family_id: product.chemical_family_id,
            polymer_type_id: product.polymer_type_id,
            payment_terms_id: product.payment_terms_id,
            terms: Vec::new(),
            created_by: product.created_by,
            created_at: product.created_at.into(),
            updated_at: product.updated_at.into(),
        }
    }
}
