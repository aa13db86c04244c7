//! Authentication request types.

use polyhub_postgres::model::NewAccount;
use polyhub_postgres::types::AccountRole;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validations::{
    normalized_email, normalized_option, validate_name, validate_password_strength,
};

/// Request payload for login.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Login {
    /// Email address of the account.
    #[validate(email)]
    #[validate(length(min = 5, max = 254))]
    pub email_address: String,

    /// Password of the account.
    #[validate(length(min = 1, max = 1000))]
    pub password: String,
}

/// Request payload for signup.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Signup {
    /// Display name of the account.
    #[validate(length(min = 2, max = 120))]
    #[validate(custom(function = "validate_name"))]
    pub display_name: String,

    /// Email address of the account.
    #[validate(email)]
    #[validate(length(min = 5, max = 254))]
    pub email_address: String,

    /// Password of the account.
    #[validate(length(min = 8, max = 128))]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,

    /// Company or organization name.
    #[validate(length(min = 2, max = 200))]
    pub company_name: Option<String>,

    /// Role to register as. Defaults to buyer; admin cannot be self-assigned.
    #[serde(default)]
    pub role: AccountRole,
}

impl Signup {
    /// Converts this request into a database model.
    pub fn to_model(&self) -> NewAccount {
        NewAccount {
            role: self.role,
            display_name: self.display_name.trim().to_owned(),
            email_address: normalized_email(&self.email_address),
            company_name: normalized_option(self.company_name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_normalizes_email() {
        let signup: Signup = serde_json::from_value(serde_json::json!({
            "displayName": "Acme Buyer",
            "emailAddress": "Buyer@Acme.COM",
            "password": "polymer123",
        }))
        .unwrap();

        assert!(signup.validate().is_ok());
        let model = signup.to_model();
        assert_eq!(model.email_address, "buyer@acme.com");
        assert_eq!(model.role, AccountRole::Buyer);
        assert_eq!(model.company_name, None);
    }
}
