//! Authentication response types.

use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Account;

/// Bearer token issued on registration or login.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthToken {
    /// Signed HS256 token to send as `Authorization: Bearer <token>`.
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Instant after which the token is rejected.
    pub expires_at: Timestamp,
    /// The authenticated account.
    pub account: Account,
}

impl AuthToken {
    pub fn bearer(access_token: String, expires_at: Timestamp, account: Account) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_owned(),
            expires_at,
            account,
        }
    }
}
