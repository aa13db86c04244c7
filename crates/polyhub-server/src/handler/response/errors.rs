use std::collections::HashMap;

use polyhub_core::FieldError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One failed rule on one request field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationErrorDetail {
    /// Field name, in the casing of the request body.
    pub field: String,
    /// Machine-readable rule identifier, e.g. `length` or `unknown_status`.
    pub code: String,
    pub message: String,
    /// Rule parameters such as `min` and `max`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<HashMap<String, serde_json::Value>>,
}

impl From<&FieldError> for ValidationErrorDetail {
    fn from(error: &FieldError) -> Self {
        let message = match &error.message {
            Some(message) => message.to_string(),
            None => format!("Validation failed for field '{}'", error.field),
        };

        Self {
            field: error.field.to_string(),
            code: error.code.to_string(),
            message,
            params: None,
        }
    }
}

/// JSON body of every error response.
///
/// `name` is stable and meant for programmatic checks, `message` is safe to
/// show to end users.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub name: String,
    pub message: String,
    /// The kind of record the error refers to, e.g. `quote_request`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    /// Field-level failures, present on `validation_failed` only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation: Vec<ValidationErrorDetail>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_parts_are_omitted() -> anyhow::Result<()> {
        let response = ErrorResponse {
            name: "not_found".to_owned(),
            message: "Quote request not found.".to_owned(),
            resource: None,
            validation: Vec::new(),
        };

        let value = serde_json::to_value(&response)?;
        assert_eq!(
            value,
            json!({ "name": "not_found", "message": "Quote request not found." })
        );
        Ok(())
    }

    #[test]
    fn field_errors_keep_their_message() {
        let field =
            FieldError::new("status", "unknown_status").with_message("bogus is not a status");
        let detail = ValidationErrorDetail::from(&field);

        assert_eq!(detail.field, "status");
        assert_eq!(detail.code, "unknown_status");
        assert_eq!(detail.message, "bogus is not a status");
    }

    #[test]
    fn field_errors_without_message_name_the_field() {
        let detail = ValidationErrorDetail::from(&FieldError::new("buyerId", "required"));
        assert_eq!(detail.message, "Validation failed for field 'buyerId'");
    }
}
