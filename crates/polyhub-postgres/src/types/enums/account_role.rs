//! Account role enumeration.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Marketplace role of an account.
///
/// Corresponds to the `ACCOUNT_ROLE` PostgreSQL enum.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[ExistingTypePath = "crate::schema::sql_types::AccountRole"]
#[strum(serialize_all = "snake_case")]
pub enum AccountRole {
    #[db_rename = "buyer"]
    #[serde(rename = "buyer")]
    #[default]
    Buyer,

    #[db_rename = "seller"]
    #[serde(rename = "seller")]
    Seller,

    #[db_rename = "admin"]
    #[serde(rename = "admin")]
    Admin,

    /// Industry expert with read access to the catalog.
    #[db_rename = "expert"]
    #[serde(rename = "expert")]
    Expert,
}

impl AccountRole {
    /// Roles that may own catalog products and best deals.
    #[inline]
    pub fn can_sell(self) -> bool {
        matches!(self, AccountRole::Seller | AccountRole::Admin)
    }

    /// Roles an account may choose at registration.
    #[inline]
    pub fn is_self_assignable(self) -> bool {
        !matches!(self, AccountRole::Admin)
    }
}
