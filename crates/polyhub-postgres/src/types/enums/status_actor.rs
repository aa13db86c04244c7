//! Status history author enumeration.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Relationship of the account that appended a status entry.
///
/// Corresponds to the `STATUS_ACTOR` PostgreSQL enum.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[ExistingTypePath = "crate::schema::sql_types::StatusActor"]
#[strum(serialize_all = "snake_case")]
pub enum StatusActor {
    #[db_rename = "buyer"]
    #[serde(rename = "buyer")]
    Buyer,

    #[db_rename = "seller"]
    #[serde(rename = "seller")]
    Seller,

    #[db_rename = "admin"]
    #[serde(rename = "admin")]
    Admin,
}
