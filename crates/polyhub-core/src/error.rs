//! Domain error taxonomy.

use std::borrow::Cow;

use serde::Serialize;
use strum::{AsRefStr, IntoStaticStr};
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with the domain [`Error`] type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of domain failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or missing input, including illegal status transitions.
    Validation,
    /// A referenced entity does not exist.
    NotFound,
    /// The actor is not allowed to perform the operation.
    Authorization,
    /// A cross-entity reference chain failed to resolve.
    ReferenceIntegrity,
    /// The record changed since it was read.
    Conflict,
    /// Infrastructure failure.
    Internal,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    /// Name of the offending field, in wire format.
    pub field: Cow<'static, str>,
    /// Machine readable error code.
    pub code: Cow<'static, str>,
    /// Optional human readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Cow<'static, str>>,
}

impl FieldError {
    pub fn new(field: impl Into<Cow<'static, str>>, code: impl Into<Cow<'static, str>>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// A structured error type for marketplace operations.
#[derive(Debug, Error)]
#[error("{kind:?}{}", message.as_ref().map(|m| format!(": {}", m)).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional error message.
    pub message: Option<String>,
    /// Field-level details, populated for validation errors.
    pub fields: Vec<FieldError>,
    /// Optional source error.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            fields: Vec::new(),
            source: None,
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a source error to this error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Appends a field-level detail to this error.
    pub fn with_field(mut self, field: FieldError) -> Self {
        self.fields.push(field);
        self
    }

    /// Creates a new validation error.
    pub fn validation() -> Self {
        Self::new(ErrorKind::Validation)
    }

    /// Creates a validation error carrying a single field detail.
    pub fn invalid_field(
        field: impl Into<Cow<'static, str>>,
        code: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
    ) -> Self {
        let message = message.into();
        Self::validation()
            .with_field(FieldError::new(field, code).with_message(message.clone()))
            .with_message(message)
    }

    /// Creates a new not found error.
    pub fn not_found() -> Self {
        Self::new(ErrorKind::NotFound)
    }

    /// Creates a new authorization error.
    pub fn authorization() -> Self {
        Self::new(ErrorKind::Authorization)
    }

    /// Creates a new reference integrity error.
    pub fn reference_integrity() -> Self {
        Self::new(ErrorKind::ReferenceIntegrity)
    }

    /// Creates a new conflict error.
    pub fn conflict() -> Self {
        Self::new(ErrorKind::Conflict)
    }

    /// Creates a new internal error.
    pub fn internal() -> Self {
        Self::new(ErrorKind::Internal)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the field-level details.
    pub fn fields(&self) -> &[FieldError] {
        &self.fields
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = Vec::new();
        collect_field_errors(&errors, None, &mut fields);
        fields.sort_by(|a, b| a.field.cmp(&b.field));

        Self {
            kind: ErrorKind::Validation,
            message: Some("Request payload failed validation".to_owned()),
            fields,
            source: None,
        }
    }
}

fn collect_field_errors(errors: &ValidationErrors, prefix: Option<&str>, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let field = camel_case(field);
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field,
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                out.extend(list.iter().map(|error| FieldError {
                    field: Cow::Owned(path.clone()),
                    code: error.code.clone(),
                    message: error.message.clone(),
                }));
            }
            ValidationErrorsKind::Struct(nested) => {
                collect_field_errors(nested, Some(&path), out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_field_errors(nested, Some(&format!("{path}[{index}]")), out);
                }
            }
        }
    }
}

/// Converts a Rust field name to its wire spelling (`delivery_date` to `deliveryDate`).
pub fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for ch in field.chars() {
        match ch {
            '_' if !out.is_empty() => upper = true,
            '_' => {}
            ch if upper => {
                out.extend(ch.to_uppercase());
                upper = false;
            }
            ch => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Payload {
        #[validate(length(min = 2))]
        name: String,
        #[validate(required)]
        country: Option<String>,
        #[validate(range(min = 1))]
        lead_time_days: u32,
    }

    #[test]
    fn validation_errors_become_field_details() {
        let payload = Payload {
            name: "x".to_owned(),
            country: None,
            lead_time_days: 0,
        };

        let error = Error::from(payload.validate().unwrap_err());
        assert_eq!(error.kind(), ErrorKind::Validation);

        let fields: Vec<_> = error.fields().iter().map(|f| f.field.as_ref()).collect();
        assert_eq!(fields, vec!["country", "leadTimeDays", "name"]);
    }

    #[test]
    fn field_names_use_wire_spelling() {
        assert_eq!(camel_case("delivery_deadline"), "deliveryDeadline");
        assert_eq!(camel_case("best_deal_id"), "bestDealId");
        assert_eq!(camel_case("quantity"), "quantity");
        assert_eq!(camel_case("_private"), "private");
    }

    #[test]
    fn display_includes_message() {
        let error = Error::not_found().with_message("quote request not found");
        assert_eq!(error.to_string(), "NotFound: quote request not found");
    }
}
