//! Quote request discriminator enumeration.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Selects which variant columns of a quote request row are populated.
///
/// Corresponds to the `QUOTE_TYPE` PostgreSQL enum. The pairing with
/// `product_id` / `best_deal_id` is enforced by the
/// `quote_requests_discriminator` check constraint.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[ExistingTypePath = "crate::schema::sql_types::QuoteType"]
#[strum(serialize_all = "snake_case")]
pub enum QuoteType {
    #[db_rename = "product_quote"]
    #[serde(rename = "product_quote")]
    ProductQuote,

    #[db_rename = "deal_quote"]
    #[serde(rename = "deal_quote")]
    DealQuote,
}
