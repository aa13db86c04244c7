//! Shared value types.

mod account;
mod document;
mod page;

pub use account::{AccountRole, AccountSummary, Actor, VerificationStatus};
pub use document::{DocumentRef, QuotationDocument};
pub use page::PageRequest;
