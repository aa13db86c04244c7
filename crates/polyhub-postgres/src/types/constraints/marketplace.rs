//! Best deals and quote requests table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Best deals table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum BestDealConstraints {
    #[strum(serialize = "best_deals_offer_price_positive")]
    OfferPricePositive,
    #[strum(serialize = "best_deals_admin_note_length")]
    AdminNoteLength,
    #[strum(serialize = "best_deals_updated_after_created")]
    UpdatedAfterCreated,
    #[strum(serialize = "best_deals_product_id_fkey")]
    ProductReference,
    #[strum(serialize = "best_deals_seller_id_fkey")]
    SellerReference,
}

impl BestDealConstraints {
    /// Creates a new [`BestDealConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            BestDealConstraints::OfferPricePositive | BestDealConstraints::AdminNoteLength => {
                ConstraintCategory::Validation
            }
            BestDealConstraints::UpdatedAfterCreated => ConstraintCategory::Chronological,
            BestDealConstraints::ProductReference | BestDealConstraints::SellerReference => {
                ConstraintCategory::Reference
            }
        }
    }
}

/// Quote requests table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum QuoteRequestConstraints {
    /// Variant columns do not match `request_type`.
    #[strum(serialize = "quote_requests_discriminator")]
    Discriminator,
    #[strum(serialize = "quote_requests_version_positive")]
    VersionPositive,
    #[strum(serialize = "quote_requests_message_length")]
    MessageLength,
    #[strum(serialize = "quote_requests_updated_after_created")]
    UpdatedAfterCreated,
    /// A product still referenced by quote requests cannot be deleted.
    #[strum(serialize = "quote_requests_product_id_fkey")]
    ProductReference,
    /// A best deal still referenced by quote requests cannot be deleted.
    #[strum(serialize = "quote_requests_best_deal_id_fkey")]
    BestDealReference,
}

impl QuoteRequestConstraints {
    /// Creates a new [`QuoteRequestConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            QuoteRequestConstraints::MessageLength | QuoteRequestConstraints::VersionPositive => {
                ConstraintCategory::Validation
            }
            QuoteRequestConstraints::Discriminator => ConstraintCategory::BusinessLogic,
            QuoteRequestConstraints::UpdatedAfterCreated => ConstraintCategory::Chronological,
            QuoteRequestConstraints::ProductReference
            | QuoteRequestConstraints::BestDealReference => ConstraintCategory::Reference,
        }
    }
}

impl From<BestDealConstraints> for String {
    #[inline]
    fn from(val: BestDealConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for BestDealConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QuoteRequestConstraints> for String {
    #[inline]
    fn from(val: QuoteRequestConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for QuoteRequestConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
