//! Account verification status enumeration.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Admin review state of an account.
///
/// Corresponds to the `VERIFICATION_STATUS` PostgreSQL enum.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[ExistingTypePath = "crate::schema::sql_types::VerificationStatus"]
#[strum(serialize_all = "snake_case")]
pub enum VerificationStatus {
    #[db_rename = "pending"]
    #[serde(rename = "pending")]
    #[default]
    Pending,

    #[db_rename = "approved"]
    #[serde(rename = "approved")]
    Approved,

    #[db_rename = "rejected"]
    #[serde(rename = "rejected")]
    Rejected,

    #[db_rename = "verified"]
    #[serde(rename = "verified")]
    Verified,
}
