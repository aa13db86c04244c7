//! JSON extractor that runs `validator` rules after deserialization.

use std::borrow::Cow;
use std::collections::HashMap;

use axum::extract::{FromRequest, Request};
use polyhub_core::camel_case;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use super::Json;
use crate::handler::response::ValidationErrorDetail;
use crate::handler::{Error, ErrorKind};

extractor_newtype! {
    /// JSON extractor with automatic validation.
    ///
    /// Rejections carry one [`ValidationErrorDetail`] per failed rule, with
    /// nested fields reported as camelCase dotted paths (`details.leadTimeDays`).
    ValidateJson
}

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
        data.validate()?;
        Ok(Self(data))
    }
}

impl From<ValidationErrors> for Error<'static> {
    fn from(errors: ValidationErrors) -> Self {
        let mut details = Vec::new();
        collect_details(None, &errors, &mut details);
        details.sort_by(|a, b| a.field.cmp(&b.field));

        tracing::warn!(
            fields = ?details.iter().map(|d| d.field.as_str()).collect::<Vec<_>>(),
            "Request validation failed"
        );

        let message = match details.as_slice() {
            [single] => single.message.clone(),
            _ => "Request payload failed validation".to_owned(),
        };

        ErrorKind::ValidationFailed
            .with_message(message)
            .with_validation(details)
    }
}

fn collect_details(
    prefix: Option<&str>,
    errors: &ValidationErrors,
    details: &mut Vec<ValidationErrorDetail>,
) {
    for (field, kind) in errors.errors() {
        let field = camel_case(field);
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field,
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                details.extend(field_errors.iter().map(|error| detail(&path, error)));
            }
            ValidationErrorsKind::Struct(inner) => collect_details(Some(&path), inner, details),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_details(Some(&format!("{path}[{index}]")), inner, details);
                }
            }
        }
    }
}

fn detail(field: &str, error: &ValidationError) -> ValidationErrorDetail {
    let params: HashMap<_, _> = error
        .params
        .iter()
        .filter(|(key, _)| key.as_ref() != "value")
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect();

    ValidationErrorDetail {
        field: field.to_owned(),
        code: error.code.to_string(),
        message: format_validation_error(field, error),
        params: (!params.is_empty()).then_some(params),
    }
}

/// Builds a readable message for a failed rule, preferring the custom one.
fn format_validation_error(field: &str, error: &ValidationError) -> String {
    if let Some(custom_message) = &error.message {
        return custom_message.to_string();
    }

    match error.code.as_ref() {
        "required" => format!("Field '{field}' is required"),
        "email" => format!("Field '{field}' must be a valid email address"),
        "length" => format_bounds(field, &error.params, "must be between", "long"),
        "range" => format_bounds(field, &error.params, "must be between", ""),
        code => format!("Field '{field}' failed validation: {code}"),
    }
}

fn format_bounds(
    field: &str,
    params: &HashMap<Cow<'static, str>, serde_json::Value>,
    verb: &str,
    suffix: &str,
) -> String {
    let suffix = if suffix.is_empty() {
        String::new()
    } else {
        format!(" {suffix}")
    };

    match (params.get("min"), params.get("max")) {
        (Some(min), Some(max)) => format!("Field '{field}' {verb} {min} and {max}{suffix}"),
        (Some(min), None) => format!("Field '{field}' must be at least {min}{suffix}"),
        (None, Some(max)) => format!("Field '{field}' must be at most {max}{suffix}"),
        _ => format!("Field '{field}' is out of range"),
    }
}

impl<T> aide::OperationInput for ValidateJson<T>
where
    T: schemars::JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        Json::<T>::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        Json::<T>::inferred_early_responses(ctx, operation)
    }
}
