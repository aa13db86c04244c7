//! Quote request status enumeration.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Corresponds to the `QUOTE_STATUS` PostgreSQL enum.
///
/// Used both for the scalar `quote_requests.status` column and for each
/// `quote_status_entries` row.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[ExistingTypePath = "crate::schema::sql_types::QuoteStatus"]
#[strum(serialize_all = "snake_case")]
pub enum QuoteStatus {
    #[db_rename = "pending"]
    #[serde(rename = "pending")]
    #[default]
    Pending,

    #[db_rename = "responded"]
    #[serde(rename = "responded")]
    Responded,

    #[db_rename = "negotiation"]
    #[serde(rename = "negotiation")]
    Negotiation,

    #[db_rename = "accepted"]
    #[serde(rename = "accepted")]
    Accepted,

    #[db_rename = "in_progress"]
    #[serde(rename = "in_progress")]
    InProgress,

    #[db_rename = "shipped"]
    #[serde(rename = "shipped")]
    Shipped,

    #[db_rename = "delivered"]
    #[serde(rename = "delivered")]
    Delivered,

    #[db_rename = "completed"]
    #[serde(rename = "completed")]
    Completed,

    #[db_rename = "rejected"]
    #[serde(rename = "rejected")]
    Rejected,

    #[db_rename = "cancelled"]
    #[serde(rename = "cancelled")]
    Cancelled,
}
