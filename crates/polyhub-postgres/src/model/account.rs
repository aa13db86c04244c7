//! Account and credential models.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::{account_credentials, accounts};
use crate::types::{AccountRole, VerificationStatus};

/// Marketplace account. Never carries a password hash.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Account {
    pub id: Uuid,
    pub role: AccountRole,
    pub verification_status: VerificationStatus,
    pub display_name: String,
    /// Unique case-insensitively.
    pub email_address: String,
    pub company_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Data for registering a new account.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAccount {
    pub role: AccountRole,
    pub display_name: String,
    pub email_address: String,
    pub company_name: Option<String>,
}

/// Data for updating an account.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateAccount {
    pub display_name: Option<String>,
    pub company_name: Option<Option<String>>,
    pub verification_status: Option<VerificationStatus>,
}

impl Account {
    /// Returns whether an admin has approved or verified the account.
    pub fn is_verified(&self) -> bool {
        matches!(
            self.verification_status,
            VerificationStatus::Approved | VerificationStatus::Verified
        )
    }
}

/// Password hash stored apart from the account row.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = account_credentials)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AccountCredential {
    pub account_id: Uuid,
    pub email_address: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = account_credentials)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAccountCredential {
    pub account_id: Uuid,
    pub email_address: String,
    pub password_hash: String,
}
