//! Notification type enumeration.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Corresponds to the `NOTIFICATION_TYPE` PostgreSQL enum.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[ExistingTypePath = "crate::schema::sql_types::NotificationType"]
#[strum(serialize_all = "snake_case")]
pub enum NotificationType {
    /// A buyer submitted a quote request
    #[db_rename = "quote_requested"]
    #[serde(rename = "quote_requested")]
    QuoteRequested,

    /// A quote request moved to another status
    #[db_rename = "quote_status_changed"]
    #[serde(rename = "quote_status_changed")]
    QuoteStatusChanged,

    /// The seller attached a response to a quote request
    #[db_rename = "quote_responded"]
    #[serde(rename = "quote_responded")]
    QuoteResponded,

    /// An admin approved or rejected a best deal
    #[db_rename = "deal_decision"]
    #[serde(rename = "deal_decision")]
    DealDecision,
}
