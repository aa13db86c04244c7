//! Listing filters and the summary computed over a filtered set.

use std::collections::BTreeMap;

use jiff::Timestamp;
use jiff::civil::Date;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use uuid::Uuid;

use super::{Priority, QuoteRequest, QuoteStatus, QuoteType, UnifiedFields};

/// Filters applied when listing quote requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteFilter {
    pub request_type: Option<QuoteType>,
    pub status: Option<QuoteStatus>,
    pub buyer_id: Option<Uuid>,
    pub seller_id: Option<Uuid>,
    /// Restricts results to requests where this account is buyer or seller.
    pub participant_id: Option<Uuid>,
    /// Case-insensitive text matched against the buyer message and every
    /// status history message.
    pub search: Option<String>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
}

impl QuoteFilter {
    /// Returns the search text if it is not blank.
    pub fn search_text(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// In-memory evaluation of the filter.
    pub fn matches(&self, quote: &QuoteRequest) -> bool {
        if self
            .request_type
            .is_some_and(|kind| kind != quote.request_type())
        {
            return false;
        }

        if self.status.is_some_and(|status| status != quote.status()) {
            return false;
        }

        if self.buyer_id.is_some_and(|id| id != quote.buyer_id) {
            return false;
        }

        if self.seller_id.is_some_and(|id| id != quote.seller_id) {
            return false;
        }

        if self.participant_id.is_some_and(|id| !quote.involves(id)) {
            return false;
        }

        if self.created_from.is_some_and(|from| quote.created_at < from) {
            return false;
        }

        if self.created_to.is_some_and(|to| quote.created_at > to) {
            return false;
        }

        match self.search_text() {
            Some(text) => {
                let in_message = quote
                    .message
                    .as_deref()
                    .is_some_and(|m| m.to_lowercase().contains(&text.to_lowercase()));
                in_message || quote.history.mentions(text)
            }
            None => true,
        }
    }
}

/// The columns of a quote request needed to build a [`QuoteSummary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteFacet {
    pub status: QuoteStatus,
    pub request_type: QuoteType,
    pub delivery_date: Option<Date>,
    pub created_at: Timestamp,
}

impl From<&QuoteRequest> for QuoteFacet {
    fn from(quote: &QuoteRequest) -> Self {
        Self {
            status: quote.status(),
            request_type: quote.request_type(),
            delivery_date: quote.details.unified_delivery_date(),
            created_at: quote.created_at,
        }
    }
}

/// Counts over a filtered set of quote requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummary {
    pub total: u64,
    pub by_status: BTreeMap<QuoteStatus, u64>,
    pub by_type: BTreeMap<QuoteType, u64>,
    pub by_priority: BTreeMap<Priority, u64>,
}

impl QuoteSummary {
    /// Folds facets into counts. Every known status, type and priority is
    /// present in the result, with zero when absent from the set.
    pub fn from_facets<'a>(facets: impl IntoIterator<Item = &'a QuoteFacet>, today: Date) -> Self {
        let mut summary = Self {
            total: 0,
            by_status: QuoteStatus::iter().map(|s| (s, 0)).collect(),
            by_type: QuoteType::iter().map(|t| (t, 0)).collect(),
            by_priority: Priority::iter().map(|p| (p, 0)).collect(),
        };

        for facet in facets {
            summary.total += 1;
            *summary.by_status.entry(facet.status).or_default() += 1;
            *summary.by_type.entry(facet.request_type).or_default() += 1;

            let priority = Priority::from_delivery_date(facet.delivery_date, today);
            *summary.by_priority.entry(priority).or_default() += 1;
        }

        summary
    }
}

/// One page of quote requests with the summary of the whole filtered set.
#[derive(Debug, Clone)]
pub struct QuotePage {
    pub items: Vec<QuoteRequest>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u64,
    pub summary: QuoteSummary,
}
