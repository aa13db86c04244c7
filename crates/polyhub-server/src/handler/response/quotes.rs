//! Quote request response types.

use bigdecimal::BigDecimal;
use jiff::Timestamp;
use jiff::civil::Date;
use jiff::tz::TimeZone;
use polyhub_core::quote::{
    self, Priority, QuoteDetails, QuoteStatus, QuoteSummary, SellerResponse, StatusEntry,
    UnifiedFields,
};
use polyhub_core::types::AccountSummary;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a quote request in API responses.
///
/// Variant fields are inlined next to `requestType`. The unified fields,
/// `priority` and `icon` are derived on every read.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub id: Uuid,
    pub buyer_id: Uuid,
    /// Seller resolved at creation time.
    pub seller_id: Uuid,
    #[serde(flatten)]
    pub details: QuoteDetails,
    /// Current status, equal to the last history entry.
    pub status: QuoteStatus,
    /// Full status history, oldest first.
    pub status_history: Vec<StatusEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_response: Option<SellerResponse>,
    /// Token to send back with the next status update.
    pub version: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unified_delivery_date: Option<Date>,
    pub unified_shipping_location: String,
    #[schemars(with = "String")]
    pub unified_quantity: BigDecimal,
    pub priority: Priority,
    pub icon: String,
    /// Resolved seller account, present on single-record reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller: Option<AccountSummary>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Current UTC calendar date, the reference point of priorities.
pub(crate) fn today() -> Date {
    Timestamp::now().to_zoned(TimeZone::UTC).date()
}

impl QuoteRequest {
    /// Builds the response as of `today`.
    pub fn at(quote: quote::QuoteRequest, today: Date) -> Self {
        Self {
            unified_delivery_date: quote.details.unified_delivery_date(),
            unified_shipping_location: quote.details.unified_shipping_location().to_owned(),
            unified_quantity: quote.details.unified_quantity().clone(),
            priority: quote.priority(today),
            icon: quote.icon().to_owned(),
            status: quote.status(),
            id: quote.id,
            buyer_id: quote.buyer_id,
            seller_id: quote.seller_id,
            details: quote.details,
            status_history: quote.history.into(),
            message: quote.message,
            admin_note: quote.admin_note,
            seller_response: quote.seller_response,
            version: quote.version,
            seller: None,
            created_at: quote.created_at,
            updated_at: quote.updated_at,
        }
    }

    pub fn with_seller(mut self, seller: AccountSummary) -> Self {
        self.seller = Some(seller);
        self
    }
}

impl From<quote::QuoteRequest> for QuoteRequest {
    fn from(quote: quote::QuoteRequest) -> Self {
        Self::at(quote, today())
    }
}

impl From<quote::QuoteWithSeller> for QuoteRequest {
    fn from(joined: quote::QuoteWithSeller) -> Self {
        Self::from(joined.quote).with_seller(joined.seller)
    }
}

/// One page of quote requests with counts over the whole filtered set.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequestsPage {
    pub items: Vec<QuoteRequest>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u64,
    pub summary: QuoteSummary,
}

impl From<quote::QuotePage> for QuoteRequestsPage {
    fn from(page: quote::QuotePage) -> Self {
        let today = today();
        Self {
            items: page
                .items
                .into_iter()
                .map(|quote| QuoteRequest::at(quote, today))
                .collect(),
            total: page.total,
            page: page.page,
            total_pages: page.total_pages,
            summary: page.summary,
        }
    }
}

/// Result of a seller response.
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponded {
    pub quote: QuoteRequest,
    /// Set when the attached quotation document could not be read and was
    /// left out. The rest of the response was saved.
    pub document_dropped: bool,
}

impl From<quote::RespondOutcome> for QuoteResponded {
    fn from(outcome: quote::RespondOutcome) -> Self {
        Self {
            quote: outcome.quote.into(),
            document_dropped: outcome.document_dropped,
        }
    }
}
