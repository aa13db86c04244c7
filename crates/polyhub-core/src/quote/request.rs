//! The unified quote request and its two variants.

use bigdecimal::BigDecimal;
use jiff::Timestamp;
use jiff::civil::Date;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use super::{Priority, QuoteStatus, SellerResponse, StatusActor, StatusEntry, StatusHistory};
use crate::types::{AccountSummary, Actor};
use crate::{Error, Result};

/// Discriminator of the two quote request variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QuoteType {
    ProductQuote,
    DealQuote,
}

/// Fields normalized across both variants. Never stored.
pub trait UnifiedFields {
    fn request_type(&self) -> QuoteType;

    /// `delivery_date` of a product quote or `delivery_deadline` of a deal quote.
    fn unified_delivery_date(&self) -> Option<Date>;

    /// `country` of a product quote or `shipping_country` of a deal quote.
    fn unified_shipping_location(&self) -> &str;

    /// `quantity` of a product quote or `desired_quantity` of a deal quote.
    fn unified_quantity(&self) -> &BigDecimal;
}

/// Request for a price quote against a catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProductQuote {
    pub product_id: Uuid,
    #[cfg_attr(feature = "schema", schemars(with = "String"))]
    pub quantity: BigDecimal,
    pub uom: String,
    pub country: String,
    pub destination: String,
    pub delivery_date: Option<Date>,
    pub grade_id: Option<Uuid>,
    pub incoterm_id: Option<Uuid>,
    pub packaging_type_id: Option<Uuid>,
    pub application: Option<String>,
    #[cfg_attr(feature = "schema", schemars(with = "Option<String>"))]
    pub price: Option<BigDecimal>,
    pub lead_time: Option<String>,
    pub terms: Option<String>,
    pub expected_annual_volume: Option<String>,
    pub packaging_size: Option<String>,
}

/// Request for a quote against a promotional best deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct DealQuote {
    pub best_deal_id: Uuid,
    #[cfg_attr(feature = "schema", schemars(with = "String"))]
    pub desired_quantity: BigDecimal,
    pub shipping_country: String,
    pub payment_terms: String,
    pub delivery_deadline: Date,
}

/// Variant-specific part of a quote request. Exactly one of product or best
/// deal is referenced, matching the request type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(tag = "requestType", rename_all = "snake_case")]
pub enum QuoteDetails {
    ProductQuote(ProductQuote),
    DealQuote(DealQuote),
}

impl QuoteDetails {
    pub fn product_id(&self) -> Option<Uuid> {
        match self {
            Self::ProductQuote(quote) => Some(quote.product_id),
            Self::DealQuote(_) => None,
        }
    }

    pub fn best_deal_id(&self) -> Option<Uuid> {
        match self {
            Self::ProductQuote(_) => None,
            Self::DealQuote(quote) => Some(quote.best_deal_id),
        }
    }
}

impl UnifiedFields for ProductQuote {
    fn request_type(&self) -> QuoteType {
        QuoteType::ProductQuote
    }

    fn unified_delivery_date(&self) -> Option<Date> {
        self.delivery_date
    }

    fn unified_shipping_location(&self) -> &str {
        &self.country
    }

    fn unified_quantity(&self) -> &BigDecimal {
        &self.quantity
    }
}

impl UnifiedFields for DealQuote {
    fn request_type(&self) -> QuoteType {
        QuoteType::DealQuote
    }

    fn unified_delivery_date(&self) -> Option<Date> {
        Some(self.delivery_deadline)
    }

    fn unified_shipping_location(&self) -> &str {
        &self.shipping_country
    }

    fn unified_quantity(&self) -> &BigDecimal {
        &self.desired_quantity
    }
}

impl UnifiedFields for QuoteDetails {
    fn request_type(&self) -> QuoteType {
        match self {
            Self::ProductQuote(quote) => quote.request_type(),
            Self::DealQuote(quote) => quote.request_type(),
        }
    }

    fn unified_delivery_date(&self) -> Option<Date> {
        match self {
            Self::ProductQuote(quote) => quote.unified_delivery_date(),
            Self::DealQuote(quote) => quote.unified_delivery_date(),
        }
    }

    fn unified_shipping_location(&self) -> &str {
        match self {
            Self::ProductQuote(quote) => quote.unified_shipping_location(),
            Self::DealQuote(quote) => quote.unified_shipping_location(),
        }
    }

    fn unified_quantity(&self) -> &BigDecimal {
        match self {
            Self::ProductQuote(quote) => quote.unified_quantity(),
            Self::DealQuote(quote) => quote.unified_quantity(),
        }
    }
}

/// A persisted quote request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub id: Uuid,
    pub buyer_id: Uuid,
    /// Seller resolved at creation; never supplied by the buyer.
    pub seller_id: Uuid,
    pub details: QuoteDetails,
    pub history: StatusHistory,
    pub message: Option<String>,
    pub admin_note: Option<String>,
    pub seller_response: Option<SellerResponse>,
    /// Compare-and-swap token, incremented on every status append.
    pub version: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl QuoteRequest {
    /// Current status, read from the tail of the history.
    #[inline]
    pub fn status(&self) -> QuoteStatus {
        self.history.status()
    }

    #[inline]
    pub fn request_type(&self) -> QuoteType {
        self.details.request_type()
    }

    pub fn icon(&self) -> &'static str {
        self.status().icon()
    }

    pub fn priority(&self, today: Date) -> Priority {
        Priority::from_delivery_date(self.details.unified_delivery_date(), today)
    }

    /// Relationship of `actor` to this request, `None` for outsiders.
    pub fn relationship(&self, actor: &Actor) -> Option<StatusActor> {
        if actor.is_admin() {
            Some(StatusActor::Admin)
        } else if actor.is(self.buyer_id) {
            Some(StatusActor::Buyer)
        } else if actor.is(self.seller_id) {
            Some(StatusActor::Seller)
        } else {
            None
        }
    }

    /// Returns `true` if `account_id` is the buyer or the seller.
    pub fn involves(&self, account_id: Uuid) -> bool {
        self.buyer_id == account_id || self.seller_id == account_id
    }
}

/// Everything a store needs to persist a new quote request.
#[derive(Debug, Clone)]
pub struct NewQuoteRecord {
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub details: QuoteDetails,
    pub initial: StatusEntry,
    pub message: Option<String>,
}

/// A quote request joined with its resolved seller account.
#[derive(Debug, Clone)]
pub struct QuoteWithSeller {
    pub quote: QuoteRequest,
    pub seller: AccountSummary,
}

/// Creation payload for a product quote.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProductQuoteInput {
    #[validate(required)]
    pub product_id: Option<Uuid>,
    #[validate(required, custom(function = "positive_decimal"))]
    #[cfg_attr(feature = "schema", schemars(with = "Option<String>"))]
    pub quantity: Option<BigDecimal>,
    #[validate(required, length(min = 1, max = 32))]
    pub uom: Option<String>,
    #[validate(required, length(min = 2, max = 100))]
    pub country: Option<String>,
    #[validate(required, length(min = 2, max = 200))]
    pub destination: Option<String>,
    pub delivery_date: Option<Date>,
    pub grade_id: Option<Uuid>,
    pub incoterm_id: Option<Uuid>,
    pub packaging_type_id: Option<Uuid>,
    #[validate(length(max = 500))]
    pub application: Option<String>,
    #[validate(custom(function = "positive_decimal"))]
    #[cfg_attr(feature = "schema", schemars(with = "Option<String>"))]
    pub price: Option<BigDecimal>,
    #[validate(length(max = 100))]
    pub lead_time: Option<String>,
    #[validate(length(max = 1000))]
    pub terms: Option<String>,
    #[validate(length(max = 100))]
    pub expected_annual_volume: Option<String>,
    #[validate(length(max = 100))]
    pub packaging_size: Option<String>,
    #[validate(length(max = 2000))]
    pub message: Option<String>,
}

/// Creation payload for a deal quote.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct DealQuoteInput {
    #[validate(required)]
    pub best_deal_id: Option<Uuid>,
    #[validate(required, custom(function = "positive_decimal"))]
    #[cfg_attr(feature = "schema", schemars(with = "Option<String>"))]
    pub desired_quantity: Option<BigDecimal>,
    #[validate(required, length(min = 2, max = 100))]
    pub shipping_country: Option<String>,
    #[validate(required, length(min = 2, max = 200))]
    pub payment_terms: Option<String>,
    #[validate(required)]
    pub delivery_deadline: Option<Date>,
    #[validate(length(max = 2000))]
    pub message: Option<String>,
}

/// Creation payload, tagged by `requestType`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(tag = "requestType", rename_all = "snake_case")]
pub enum NewQuote {
    ProductQuote(ProductQuoteInput),
    DealQuote(DealQuoteInput),
}

impl Validate for NewQuote {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        match self {
            Self::ProductQuote(input) => input.validate(),
            Self::DealQuote(input) => input.validate(),
        }
    }
}

impl NewQuote {
    pub fn request_type(&self) -> QuoteType {
        match self {
            Self::ProductQuote(_) => QuoteType::ProductQuote,
            Self::DealQuote(_) => QuoteType::DealQuote,
        }
    }

    /// Validates the payload and splits it into variant details and the
    /// free-form buyer message.
    pub fn into_details(self) -> Result<(QuoteDetails, Option<String>)> {
        self.validate()?;

        match self {
            Self::ProductQuote(input) => {
                let quote = ProductQuote {
                    product_id: required(input.product_id, "productId")?,
                    quantity: required(input.quantity, "quantity")?,
                    uom: required(input.uom, "uom")?,
                    country: required(input.country, "country")?,
                    destination: required(input.destination, "destination")?,
                    delivery_date: input.delivery_date,
                    grade_id: input.grade_id,
                    incoterm_id: input.incoterm_id,
                    packaging_type_id: input.packaging_type_id,
                    application: input.application,
                    price: input.price,
                    lead_time: input.lead_time,
                    terms: input.terms,
                    expected_annual_volume: input.expected_annual_volume,
                    packaging_size: input.packaging_size,
                };
                Ok((QuoteDetails::ProductQuote(quote), input.message))
            }
            Self::DealQuote(input) => {
                let quote = DealQuote {
                    best_deal_id: required(input.best_deal_id, "bestDealId")?,
                    desired_quantity: required(input.desired_quantity, "desiredQuantity")?,
                    shipping_country: required(input.shipping_country, "shippingCountry")?,
                    payment_terms: required(input.payment_terms, "paymentTerms")?,
                    delivery_deadline: required(input.delivery_deadline, "deliveryDeadline")?,
                };
                Ok((QuoteDetails::DealQuote(quote), input.message))
            }
        }
    }
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T> {
    value.ok_or_else(|| Error::invalid_field(field, "required", format!("{field} is required")))
}

/// Rejects zero and negative amounts.
pub(crate) fn positive_decimal(value: &BigDecimal) -> std::result::Result<(), ValidationError> {
    if *value <= BigDecimal::from(0) {
        return Err(ValidationError::new("positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use jiff::civil::date;

    use super::*;
    use crate::ErrorKind;

    fn deal_input() -> DealQuoteInput {
        DealQuoteInput {
            best_deal_id: Some(Uuid::now_v7()),
            desired_quantity: BigDecimal::from_str("20").ok(),
            shipping_country: Some("Germany".to_owned()),
            payment_terms: Some("Net 30".to_owned()),
            delivery_deadline: Some(date(2026, 6, 1)),
            message: None,
        }
    }

    #[test]
    fn deal_quote_maps_unified_fields() -> anyhow::Result<()> {
        let (details, _) = NewQuote::DealQuote(deal_input()).into_details()?;

        assert_eq!(details.request_type(), QuoteType::DealQuote);
        assert!(details.best_deal_id().is_some());
        assert!(details.product_id().is_none());
        assert_eq!(details.unified_shipping_location(), "Germany");
        assert_eq!(details.unified_delivery_date(), Some(date(2026, 6, 1)));
        Ok(())
    }

    #[test]
    fn missing_deal_fields_are_reported_per_field() {
        let input = DealQuoteInput {
            shipping_country: None,
            delivery_deadline: None,
            ..deal_input()
        };

        let error = NewQuote::DealQuote(input).into_details().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation);

        let fields: Vec<_> = error.fields().iter().map(|f| f.field.as_ref()).collect();
        assert_eq!(fields, vec!["deliveryDeadline", "shippingCountry"]);
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        let input = ProductQuoteInput {
            product_id: Some(Uuid::now_v7()),
            quantity: BigDecimal::from_str("0").ok(),
            uom: Some("kg".to_owned()),
            country: Some("India".to_owned()),
            destination: Some("Mumbai port".to_owned()),
            ..Default::default()
        };

        let error = NewQuote::ProductQuote(input).into_details().unwrap_err();
        assert_eq!(error.fields()[0].code, "positive");
    }

    #[test]
    fn payload_is_tagged_by_request_type() -> anyhow::Result<()> {
        let json = serde_json::json!({
            "requestType": "product_quote",
            "productId": Uuid::now_v7(),
            "quantity": "5",
            "uom": "mt",
            "country": "Vietnam",
            "destination": "Hai Phong",
        });

        let payload: NewQuote = serde_json::from_value(json)?;
        assert_eq!(payload.request_type(), QuoteType::ProductQuote);
        Ok(())
    }
}
