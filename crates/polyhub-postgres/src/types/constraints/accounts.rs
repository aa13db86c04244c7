//! Accounts and credentials table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Accounts table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum AccountConstraints {
    #[strum(serialize = "accounts_display_name_length")]
    DisplayNameLength,
    #[strum(serialize = "accounts_email_address_format")]
    EmailAddressFormat,
    #[strum(serialize = "accounts_email_address_unique_idx")]
    EmailAddressUnique,
    #[strum(serialize = "accounts_updated_after_created")]
    UpdatedAfterCreated,
}

impl AccountConstraints {
    /// Creates a new [`AccountConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            AccountConstraints::DisplayNameLength | AccountConstraints::EmailAddressFormat => {
                ConstraintCategory::Validation
            }
            AccountConstraints::EmailAddressUnique => ConstraintCategory::Uniqueness,
            AccountConstraints::UpdatedAfterCreated => ConstraintCategory::Chronological,
        }
    }
}

/// Account credentials table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum AccountCredentialConstraints {
    #[strum(serialize = "account_credentials_password_hash_not_empty")]
    PasswordHashNotEmpty,
    #[strum(serialize = "account_credentials_email_address_unique_idx")]
    EmailAddressUnique,
}

impl AccountCredentialConstraints {
    /// Creates a new [`AccountCredentialConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            AccountCredentialConstraints::PasswordHashNotEmpty => ConstraintCategory::Validation,
            AccountCredentialConstraints::EmailAddressUnique => ConstraintCategory::Uniqueness,
        }
    }
}

impl From<AccountConstraints> for String {
    #[inline]
    fn from(val: AccountConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for AccountConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AccountCredentialConstraints> for String {
    #[inline]
    fn from(val: AccountCredentialConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for AccountCredentialConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
