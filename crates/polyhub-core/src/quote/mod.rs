//! Unified quote request lifecycle.
//!
//! A quote request is either a [`ProductQuote`] or a [`DealQuote`]. Both
//! share an append-only [`StatusHistory`] whose last entry is the current
//! status, a resolved seller, and a version token used to serialize status
//! changes. Status changes follow the table in [`QuoteStatus::allowed_next`]
//! and the per-actor rules in [`QuoteStatus::permits`].

mod history;
mod manager;
mod priority;
mod query;
mod request;
mod response;
mod status;

pub use history::{StatusEntry, StatusHistory};
pub use manager::{QuoteRequestManager, StatusUpdate};
pub use priority::Priority;
pub use query::{QuoteFacet, QuoteFilter, QuotePage, QuoteSummary};
pub(crate) use request::positive_decimal;
pub use request::{
    DealQuote, DealQuoteInput, NewQuote, NewQuoteRecord, ProductQuote, ProductQuoteInput,
    QuoteDetails, QuoteRequest, QuoteType, QuoteWithSeller, UnifiedFields,
};
pub use response::{RespondOutcome, SellerResponse, SellerResponseInput};
pub use status::{QuoteStatus, StatusActor};
