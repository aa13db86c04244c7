//! Seller responses to quote requests.

use bigdecimal::BigDecimal;
use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::QuoteRequest;
use super::request::positive_decimal;
use crate::types::{DocumentRef, QuotationDocument};

/// The seller's offer attached to a quote request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct SellerResponse {
    pub message: String,
    #[cfg_attr(feature = "schema", schemars(with = "String"))]
    pub quoted_price: BigDecimal,
    #[cfg_attr(feature = "schema", schemars(with = "Option<String>"))]
    pub quoted_quantity: Option<BigDecimal>,
    pub estimated_delivery: Option<String>,
    pub quotation_document: Option<DocumentRef>,
    pub responded_at: Timestamp,
}

/// Payload of a seller response.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct SellerResponseInput {
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
    #[validate(custom(function = "positive_decimal"))]
    #[cfg_attr(feature = "schema", schemars(with = "String"))]
    pub quoted_price: BigDecimal,
    #[validate(custom(function = "positive_decimal"))]
    #[cfg_attr(feature = "schema", schemars(with = "Option<String>"))]
    pub quoted_quantity: Option<BigDecimal>,
    #[validate(length(max = 100))]
    pub estimated_delivery: Option<String>,
    /// Structured reference, or the same reference serialized into a string.
    pub quotation_document: Option<QuotationDocument>,
}

/// Result of a seller response.
#[derive(Debug, Clone)]
pub struct RespondOutcome {
    pub quote: QuoteRequest,
    /// Set when a submitted quotation document could not be parsed and was
    /// left out of the stored response.
    pub document_dropped: bool,
}
