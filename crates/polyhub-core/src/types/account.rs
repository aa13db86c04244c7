//! Account roles and the resolved caller identity.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

/// Role tag carried by every account.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AccountRole {
    /// Requests quotes and deals.
    #[default]
    Buyer,
    /// Lists products and proposes best deals.
    Seller,
    /// Platform operator.
    Admin,
    /// Industry expert profile.
    Expert,
}

/// Verification state of an account, controlled by admins.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Verified,
}

/// The `{accountId, role}` pair resolved by the authentication layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub account_id: Uuid,
    pub role: AccountRole,
}

impl Actor {
    pub fn new(account_id: Uuid, role: AccountRole) -> Self {
        Self { account_id, role }
    }

    pub fn buyer(account_id: Uuid) -> Self {
        Self::new(account_id, AccountRole::Buyer)
    }

    pub fn seller(account_id: Uuid) -> Self {
        Self::new(account_id, AccountRole::Seller)
    }

    pub fn admin(account_id: Uuid) -> Self {
        Self::new(account_id, AccountRole::Admin)
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == AccountRole::Admin
    }

    /// Returns `true` if the actor is the given account.
    #[inline]
    pub fn is(&self, account_id: Uuid) -> bool {
        self.account_id == account_id
    }
}

/// Public projection of an account, used in joined views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: Uuid,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    pub email_address: String,
    pub role: AccountRole,
}
