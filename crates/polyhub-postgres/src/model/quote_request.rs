//! Quote request and status history models.
//!
//! Both variants share one row. The `quote_requests_discriminator` check
//! constraint guarantees that the columns of exactly one variant are set,
//! matching `request_type`.

use bigdecimal::BigDecimal;
use diesel::prelude::*;
use jiff_diesel::{Date, Timestamp};
use uuid::Uuid;

use crate::schema::{quote_requests, quote_status_entries};
use crate::types::{QuoteStatus, QuoteType, StatusActor};

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = quote_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct QuoteRequest {
    pub id: Uuid,
    pub request_type: QuoteType,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,

    pub product_id: Option<Uuid>,
    pub quantity: Option<BigDecimal>,
    pub uom: Option<String>,
    pub country: Option<String>,
    pub destination: Option<String>,
    pub delivery_date: Option<Date>,
    pub grade_id: Option<Uuid>,
    pub incoterm_id: Option<Uuid>,
    pub packaging_type_id: Option<Uuid>,
    pub application: Option<String>,
    pub price: Option<BigDecimal>,
    pub lead_time: Option<String>,
    pub terms: Option<String>,
    pub expected_annual_volume: Option<String>,
    pub packaging_size: Option<String>,

    pub best_deal_id: Option<Uuid>,
    pub desired_quantity: Option<BigDecimal>,
    pub shipping_country: Option<String>,
    pub payment_terms: Option<String>,
    pub delivery_deadline: Option<Date>,

    /// Mirrors the last status entry.
    pub status: QuoteStatus,
    /// Compare-and-swap token.
    pub version: i64,
    pub message: Option<String>,
    pub admin_note: Option<String>,
    pub seller_response: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = quote_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewQuoteRequest {
    pub request_type: QuoteType,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,

    pub product_id: Option<Uuid>,
    pub quantity: Option<BigDecimal>,
    pub uom: Option<String>,
    pub country: Option<String>,
    pub destination: Option<String>,
    pub delivery_date: Option<Date>,
    pub grade_id: Option<Uuid>,
    pub incoterm_id: Option<Uuid>,
    pub packaging_type_id: Option<Uuid>,
    pub application: Option<String>,
    pub price: Option<BigDecimal>,
    pub lead_time: Option<String>,
    pub terms: Option<String>,
    pub expected_annual_volume: Option<String>,
    pub packaging_size: Option<String>,

    pub best_deal_id: Option<Uuid>,
    pub desired_quantity: Option<BigDecimal>,
    pub shipping_country: Option<String>,
    pub payment_terms: Option<String>,
    pub delivery_deadline: Option<Date>,

    pub status: QuoteStatus,
    pub message: Option<String>,
}

impl NewQuoteRequest {
    /// A product quote row with every deal column unset.
    pub fn product_quote(buyer_id: Uuid, seller_id: Uuid, product_id: Uuid) -> Self {
        Self::empty(QuoteType::ProductQuote, buyer_id, seller_id, Some(product_id), None)
    }

    /// A deal quote row with every product column unset.
    pub fn deal_quote(buyer_id: Uuid, seller_id: Uuid, best_deal_id: Uuid) -> Self {
        Self::empty(QuoteType::DealQuote, buyer_id, seller_id, None, Some(best_deal_id))
    }

    fn empty(
        request_type: QuoteType,
        buyer_id: Uuid,
        seller_id: Uuid,
        product_id: Option<Uuid>,
        best_deal_id: Option<Uuid>,
    ) -> Self {
        Self {
            request_type,
            buyer_id,
            seller_id,
            product_id,
            quantity: None,
            uom: None,
            country: None,
            destination: None,
            delivery_date: None,
            grade_id: None,
            incoterm_id: None,
            packaging_type_id: None,
            application: None,
            price: None,
            lead_time: None,
            terms: None,
            expected_annual_volume: None,
            packaging_size: None,
            best_deal_id,
            desired_quantity: None,
            shipping_country: None,
            payment_terms: None,
            delivery_deadline: None,
            status: QuoteStatus::Pending,
            message: None,
        }
    }
}

/// One immutable entry of a quote request's status history.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable)]
#[diesel(table_name = quote_status_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct QuoteStatusEntry {
    pub quote_id: Uuid,
    /// Zero-based position in the history.
    pub position: i32,
    pub status: QuoteStatus,
    pub message: String,
    pub updated_by: StatusActor,
    pub created_at: Timestamp,
}

/// Status entry to append; the position is assigned by the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuoteStatusEntry {
    pub status: QuoteStatus,
    pub message: String,
    pub updated_by: StatusActor,
    pub created_at: Timestamp,
}

impl NewQuoteStatusEntry {
    pub(crate) fn at_position(self, quote_id: Uuid, position: i32) -> QuoteStatusEntry {
        QuoteStatusEntry {
            quote_id,
            position,
            status: self.status,
            message: self.message,
            updated_by: self.updated_by,
            created_at: self.created_at,
        }
    }
}

/// A quote request row with its full ordered history.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequestWithHistory {
    pub quote: QuoteRequest,
    pub history: Vec<QuoteStatusEntry>,
}
