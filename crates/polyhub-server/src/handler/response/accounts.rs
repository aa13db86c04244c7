//! Account response types.

use jiff::Timestamp;
use polyhub_postgres::model::Account as AccountModel;
use polyhub_postgres::types::{AccountRole, VerificationStatus};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents an account in API responses. Credentials are never included.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique account identifier.
    pub id: Uuid,
    /// Role the account acts in.
    pub role: AccountRole,
    /// Verification state assigned by an admin.
    pub verification_status: VerificationStatus,
    /// Display name of the account.
    pub display_name: String,
    /// Email address of the account.
    pub email_address: String,
    /// Company the account represents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
    /// Timestamp when the account was last updated.
    pub updated_at: Timestamp,
}

impl From<AccountModel> for Account {
    fn from(account: AccountModel) -> Self {
        Self {
            id: account.id,
            role: account.role,
            verification_status: account.verification_status,
            display_name: account.display_name,
            email_address: account.email_address,
            company_name: account.company_name,
            created_at: account.created_at.into(),
            updated_at: account.updated_at.into(),
        }
    }
}
