//! Best deal status enumeration.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Corresponds to the `DEAL_STATUS` PostgreSQL enum.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[ExistingTypePath = "crate::schema::sql_types::DealStatus"]
#[strum(serialize_all = "snake_case")]
pub enum DealStatus {
    /// Awaiting admin review
    #[db_rename = "pending"]
    #[serde(rename = "pending")]
    #[default]
    Pending,

    /// Visible to buyers while its validity lasts
    #[db_rename = "approved"]
    #[serde(rename = "approved")]
    Approved,

    #[db_rename = "rejected"]
    #[serde(rename = "rejected")]
    Rejected,
}
