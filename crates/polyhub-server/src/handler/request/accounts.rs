//! Account request types.

use polyhub_postgres::model::UpdateAccount as UpdateAccountModel;
use polyhub_postgres::types::VerificationStatus;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validations::{normalized_option, validate_name};

/// Request payload to update the caller's own profile.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccount {
    /// New display name.
    #[validate(length(min = 2, max = 120))]
    #[validate(custom(function = "validate_name"))]
    pub display_name: Option<String>,

    /// Company or organization name. An empty string clears it.
    #[validate(length(max = 200))]
    pub company_name: Option<String>,
}

impl UpdateAccount {
    /// Converts this request into a database model.
    pub fn into_model(self) -> UpdateAccountModel {
        UpdateAccountModel {
            display_name: self.display_name.map(|name| name.trim().to_owned()),
            company_name: self.company_name.map(|name| normalized_option(Some(name))),
            ..Default::default()
        }
    }
}

/// Admin request to change an account's verification status.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVerification {
    pub verification_status: VerificationStatus,
}
