//! Diesel models for every table: query, insert and update structs.

mod account;
mod account_notification;
mod best_deal;
mod catalog;
mod quote_request;

pub use account::{Account, AccountCredential, NewAccount, NewAccountCredential, UpdateAccount};
pub use account_notification::{AccountNotification, NewAccountNotification};
pub use best_deal::{BestDeal, NewBestDeal, UpdateBestDeal};
pub use catalog::{
    NewProduct, NewTaxonomyTerm, Product, ProductTerm, TaxonomyTerm, UpdateProduct,
};
pub use quote_request::{
    NewQuoteRequest, NewQuoteStatusEntry, QuoteRequest, QuoteRequestWithHistory, QuoteStatusEntry,
};
