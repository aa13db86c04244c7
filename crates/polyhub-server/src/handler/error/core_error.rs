//! Conversion of marketplace domain errors into HTTP errors.

use polyhub_core::ErrorKind as CoreErrorKind;

use crate::handler::response::ValidationErrorDetail;
use crate::handler::{Error, ErrorKind};

/// Tracing target for domain error conversion.
const TRACING_TARGET: &str = "polyhub_server::domain_errors";

impl From<polyhub_core::Error> for Error<'static> {
    fn from(error: polyhub_core::Error) -> Self {
        let kind = match error.kind() {
            CoreErrorKind::Validation if error.fields().is_empty() => ErrorKind::BadRequest,
            CoreErrorKind::Validation => ErrorKind::ValidationFailed,
            CoreErrorKind::NotFound => ErrorKind::NotFound,
            CoreErrorKind::ReferenceIntegrity => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    "reference chain failed to resolve",
                );
                ErrorKind::NotFound
            }
            CoreErrorKind::Authorization => ErrorKind::Forbidden,
            CoreErrorKind::Conflict => ErrorKind::Conflict,
            CoreErrorKind::Internal => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    source = ?error.source,
                    "internal marketplace error",
                );
                return ErrorKind::InternalServerError.into_error();
            }
        };

        let mut http_error = kind.into_error();
        if !error.fields().is_empty() {
            let details = error
                .fields()
                .iter()
                .map(ValidationErrorDetail::from)
                .collect();
            http_error = http_error.with_validation(details);
        }

        match error.message {
            Some(message) => http_error.with_message(message),
            None => http_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn field_errors_become_validation_details() {
        let error = Error::from(polyhub_core::Error::invalid_field(
            "status",
            "invalid_transition",
            "cannot move from completed to pending",
        ));

        assert_eq!(error.kind(), ErrorKind::ValidationFailed);
        assert_eq!(error.kind().status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.validation().len(), 1);
        assert_eq!(error.validation()[0].field, "status");
    }

    #[test]
    fn domain_kinds_map_to_status_codes() {
        let cases = [
            (polyhub_core::Error::not_found(), StatusCode::NOT_FOUND),
            (polyhub_core::Error::reference_integrity(), StatusCode::NOT_FOUND),
            (polyhub_core::Error::authorization(), StatusCode::FORBIDDEN),
            (polyhub_core::Error::conflict(), StatusCode::CONFLICT),
            (polyhub_core::Error::validation(), StatusCode::BAD_REQUEST),
            (
                polyhub_core::Error::internal().with_message("secret detail"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (domain, status) in cases {
            assert_eq!(Error::from(domain).kind().status_code(), status);
        }
    }

    #[test]
    fn internal_messages_are_not_exposed() {
        let error = Error::from(polyhub_core::Error::internal().with_message("pool exhausted"));
        assert_eq!(error.message(), None);
    }
}
