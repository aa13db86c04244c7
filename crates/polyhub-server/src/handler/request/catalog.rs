//! Product and taxonomy request types.

use bigdecimal::{BigDecimal, Zero};
use polyhub_postgres::model::{
    NewProduct, NewTaxonomyTerm, UpdateProduct as UpdateProductModel,
};
use polyhub_postgres::query::ProductFilter;
use polyhub_postgres::types::TaxonomyKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::validations::{normalized_option, validate_name, validation_error};

fn non_negative(value: &BigDecimal) -> Result<(), ValidationError> {
    if *value < BigDecimal::zero() {
        return Err(validation_error("non_negative", "Value cannot be negative"));
    }
    Ok(())
}

/// Request payload to create a catalog product.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200))]
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(length(max = 200))]
    pub chemical_name: Option<String>,
    #[validate(length(max = 200))]
    pub trade_name: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(custom(function = "non_negative"))]
    #[schemars(with = "Option<String>")]
    pub density: Option<BigDecimal>,
    /// Melt flow index.
    #[validate(custom(function = "non_negative"))]
    #[schemars(with = "Option<String>")]
    pub mfi: Option<BigDecimal>,
    #[validate(custom(function = "non_negative"))]
    #[schemars(with = "Option<String>")]
    pub tensile_strength: Option<BigDecimal>,
    #[validate(custom(function = "non_negative"))]
    #[schemars(with = "Option<String>")]
    pub price: Option<BigDecimal>,
    #[validate(custom(function = "non_negative"))]
    #[schemars(with = "Option<String>")]
    pub stock: Option<BigDecimal>,
    #[validate(length(max = 32))]
    pub uom: Option<String>,
    #[validate(length(max = 100))]
    pub lead_time: Option<String>,
    pub chemical_family_id: Option<Uuid>,
    pub polymer_type_id: Option<Uuid>,
    pub payment_terms_id: Option<Uuid>,
    /// Grades, industries, incoterms and packaging types.
    #[serde(default)]
    #[validate(length(max = 64))]
    pub term_ids: Vec<Uuid>,
}

impl CreateProduct {
    /// Converts this request into a database model owned by `owner_id`.
    pub fn into_model(self, owner_id: Uuid) -> (NewProduct, Vec<Uuid>) {
        let product = NewProduct {
            name: self.name.trim().to_owned(),
            chemical_name: normalized_option(self.chemical_name),
            trade_name: normalized_option(self.trade_name),
            description: normalized_option(self.description),
            density: self.density,
            mfi: self.mfi,
            tensile_strength: self.tensile_strength,
            price: self.price,
            stock: self.stock,
            uom: normalized_option(self.uom),
            lead_time: normalized_option(self.lead_time),
            chemical_family_id: self.chemical_family_id,
            polymer_type_id: self.polymer_type_id,
            payment_terms_id: self.payment_terms_id,
            created_by: owner_id,
        };

        (product, self.term_ids)
    }
}

/// Request payload to update a catalog product. Absent fields are kept.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200))]
    #[validate(custom(function = "validate_name"))]
    pub name: Option<String>,
    #[validate(length(max = 200))]
    pub chemical_name: Option<String>,
    #[validate(length(max = 200))]
    pub trade_name: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(custom(function = "non_negative"))]
    #[schemars(with = "Option<String>")]
    pub density: Option<BigDecimal>,
    #[validate(custom(function = "non_negative"))]
    #[schemars(with = "Option<String>")]
    pub mfi: Option<BigDecimal>,
    #[validate(custom(function = "non_negative"))]
    #[schemars(with = "Option<String>")]
    pub tensile_strength: Option<BigDecimal>,
    #[validate(custom(function = "non_negative"))]
    #[schemars(with = "Option<String>")]
    pub price: Option<BigDecimal>,
    #[validate(custom(function = "non_negative"))]
    #[schemars(with = "Option<String>")]
    pub stock: Option<BigDecimal>,
    #[validate(length(max = 32))]
    pub uom: Option<String>,
    #[validate(length(max = 100))]
    pub lead_time: Option<String>,
    pub chemical_family_id: Option<Uuid>,
    pub polymer_type_id: Option<Uuid>,
    pub payment_terms_id: Option<Uuid>,
    /// Replaces every multi-valued term link when present.
    #[validate(length(max = 64))]
    pub term_ids: Option<Vec<Uuid>>,
}

impl UpdateProduct {
    /// Converts this request into a database model and the optional
    /// replacement term set.
    pub fn into_model(self) -> (UpdateProductModel, Option<Vec<Uuid>>) {
        let changes = UpdateProductModel {
            name: self.name.map(|name| name.trim().to_owned()),
            chemical_name: self.chemical_name.map(|v| normalized_option(Some(v))),
            trade_name: self.trade_name.map(|v| normalized_option(Some(v))),
            description: self.description.map(|v| normalized_option(Some(v))),
            density: self.density.map(Some),
            mfi: self.mfi.map(Some),
            tensile_strength: self.tensile_strength.map(Some),
            price: self.price.map(Some),
            stock: self.stock.map(Some),
            uom: self.uom.map(|v| normalized_option(Some(v))),
            lead_time: self.lead_time.map(|v| normalized_option(Some(v))),
            chemical_family_id: self.chemical_family_id.map(Some),
            polymer_type_id: self.polymer_type_id.map(Some),
            payment_terms_id: self.payment_terms_id.map(Some),
            ..Default::default()
        };

        (changes, self.term_ids)
    }
}

/// Query parameters for listing products.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    /// Only products owned by this account.
    pub owner_id: Option<Uuid>,
    pub chemical_family_id: Option<Uuid>,
    pub polymer_type_id: Option<Uuid>,
    /// Case-insensitive text matched against the product name.
    #[validate(length(max = 200))]
    pub search: Option<String>,
}

impl From<ProductQuery> for ProductFilter {
    fn from(query: ProductQuery) -> Self {
        Self {
            owner_id: query.owner_id,
            chemical_family_id: query.chemical_family_id,
            polymer_type_id: query.polymer_type_id,
            search: normalized_option(query.search),
        }
    }
}

/// Request payload to create a taxonomy term.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaxonomyTerm {
    pub kind: TaxonomyKind,
    #[validate(length(min = 1, max = 120))]
    #[validate(custom(function = "validate_name"))]
    pub name: String,
}

impl CreateTaxonomyTerm {
    pub fn into_model(self) -> NewTaxonomyTerm {
        NewTaxonomyTerm {
            kind: self.kind,
            name: self.name.trim().to_owned(),
        }
    }
}

/// Query parameters for listing taxonomy terms.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyQuery {
    /// Only terms of this kind.
    pub kind: Option<TaxonomyKind>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_prices_are_rejected() {
        let request = UpdateProduct {
            price: Some(BigDecimal::from(-1)),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn update_keeps_absent_fields() {
        let request = UpdateProduct {
            name: Some(" HDPE 5502 ".into()),
            uom: Some(String::new()),
            ..Default::default()
        };

        let (changes, terms) = request.into_model();
        assert_eq!(changes.name.as_deref(), Some("HDPE 5502"));
        assert_eq!(changes.uom, Some(None));
        assert_eq!(changes.price, None);
        assert!(terms.is_none());
    }
}
