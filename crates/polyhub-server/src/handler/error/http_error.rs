//! HTTP error type returned by every handler and extractor.

use std::borrow::Cow;
use std::fmt;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use strum::IntoStaticStr;

use crate::handler::response::{ErrorResponse, ValidationErrorDetail};

/// Tracing target for error responses.
const TRACING_TARGET: &str = "polyhub_server::handler::error";

/// A specialized [`Result`] type for HTTP operations.
///
/// [`Result`]: std::result::Result
pub type Result<T, E = Error<'static>> = std::result::Result<T, E>;

/// The error type of HTTP handlers.
///
/// The [`ErrorKind`] decides the status code and the `name` of the body.
/// The message and resource refine what the client sees, while the context
/// only ever reaches the logs.
#[derive(Clone, Default)]
#[must_use = "errors do nothing unless returned"]
pub struct Error<'a> {
    kind: ErrorKind,
    message: Option<Cow<'a, str>>,
    resource: Option<Cow<'a, str>>,
    context: Option<Cow<'a, str>>,
    validation: Vec<ValidationErrorDetail>,
}

impl Error<'static> {
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }
}

impl<'a> Error<'a> {
    /// Replaces the default client message of the kind.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Names the kind of record the error refers to.
    pub fn with_resource(mut self, resource: impl Into<Cow<'a, str>>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Adds a diagnostic note for the logs. Notes accumulate.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        let context = context.into();
        self.context = Some(match self.context.take() {
            Some(existing) => Cow::Owned(format!("{existing}; {context}")),
            None => context,
        });
        self
    }

    pub fn with_validation(mut self, validation: Vec<ValidationErrorDetail>) -> Self {
        self.validation = validation;
        self
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[inline]
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    #[inline]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    #[inline]
    pub fn validation(&self) -> &[ValidationErrorDetail] {
        &self.validation
    }

    /// Body sent to the client.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            name: self.kind.name().to_owned(),
            message: self
                .message
                .as_deref()
                .unwrap_or(self.kind.default_message())
                .to_owned(),
            resource: self.resource.as_deref().map(str::to_owned),
            validation: self.validation.clone(),
        }
    }
}

impl fmt::Debug for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("status", &self.kind.status_code())
            .field("message", &self.message)
            .field("resource", &self.resource)
            .field("context", &self.context)
            .field("validation", &self.validation.len())
            .finish()
    }
}

impl fmt::Display for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.message().unwrap_or(self.kind.default_message());
        write!(f, "{} ({}): {message}", self.kind, self.kind.status_code().as_u16())?;

        if let Some(resource) = self.resource() {
            write!(f, " [{resource}]")?;
        }

        if let Some(context) = self.context() {
            write!(f, " ({context})")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error<'_> {}

impl IntoResponse for Error<'_> {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();

        if status.is_server_error() {
            tracing::error!(
                target: TRACING_TARGET,
                status = status.as_u16(),
                kind = %self.kind,
                resource = self.resource(),
                context = self.context(),
                "request failed",
            );
        } else {
            tracing::debug!(
                target: TRACING_TARGET,
                status = status.as_u16(),
                kind = %self.kind,
                resource = self.resource(),
                context = self.context(),
                "request rejected",
            );
        }

        (status, Json(self.to_response())).into_response()
    }
}

impl aide::OperationOutput for Error<'_> {
    type Inner = ErrorResponse;

    fn operation_response(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Option<aide::openapi::Response> {
        Json::<ErrorResponse>::operation_response(ctx, operation)
    }
}

impl From<ErrorKind> for Error<'static> {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Every failure class the API reports.
///
/// The snake_case variant name is the `name` field of the response body.
#[must_use = "error kinds do nothing unless turned into errors"]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    MissingPathParam,
    BadRequest,
    /// Payload failed field validation; the body lists each field.
    ValidationFailed,
    MissingAuthToken,
    MalformedAuthToken,
    TokenExpired,
    /// Wrong credentials or an account that no longer exists.
    Unauthorized,
    Forbidden,
    NotFound,
    /// Stale version or a state that no longer allows the operation.
    Conflict,
    UnsupportedMediaType,
    #[default]
    InternalServerError,
    ServiceUnavailable,
    GatewayTimeout,
}

impl ErrorKind {
    #[inline]
    pub fn into_error(self) -> Error<'static> {
        Error::new(self)
    }

    #[inline]
    pub fn with_message<'a>(self, message: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_message(message)
    }

    #[inline]
    pub fn with_resource<'a>(self, resource: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_resource(resource)
    }

    #[inline]
    pub fn with_context<'a>(self, context: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_context(context)
    }

    #[inline]
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub const fn status_code(self) -> StatusCode {
        match self {
            Self::MissingPathParam | Self::BadRequest | Self::ValidationFailed => {
                StatusCode::BAD_REQUEST
            }
            Self::MissingAuthToken
            | Self::MalformedAuthToken
            | Self::TokenExpired
            | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::GatewayTimeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Client message used when the error carries none of its own.
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::MissingPathParam => "A path parameter is missing.",
            Self::BadRequest => "The request could not be processed.",
            Self::ValidationFailed => "One or more fields are invalid.",
            Self::MissingAuthToken => "Sign in to continue.",
            Self::MalformedAuthToken => "The session token is not valid.",
            Self::TokenExpired => "The session has expired. Sign in again.",
            Self::Unauthorized => "Invalid credentials.",
            Self::Forbidden => "You are not allowed to perform this action.",
            Self::NotFound => "The requested record does not exist.",
            Self::Conflict => "The record was changed by someone else. Reload and retry.",
            Self::UnsupportedMediaType => "Send the body as application/json.",
            Self::InternalServerError => "Something went wrong on our side.",
            Self::ServiceUnavailable => "The service is temporarily unavailable.",
            Self::GatewayTimeout => "The request took too long.",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl IntoResponse for ErrorKind {
    #[inline]
    fn into_response(self) -> Response {
        Error::new(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_internal() {
        let error = Error::default();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert_eq!(error.to_response().name, "internal_server_error");
    }

    #[test]
    fn message_replaces_default_and_context_stays_private() {
        let error = ErrorKind::NotFound
            .with_message("Quote request not found")
            .with_resource("quote_request")
            .with_context("id: 0190")
            .with_context("buyer lookup");

        assert_eq!(error.context(), Some("id: 0190; buyer lookup"));

        let body = error.to_response();
        assert_eq!(body.name, "not_found");
        assert_eq!(body.message, "Quote request not found");
        assert_eq!(body.resource.as_deref(), Some("quote_request"));
    }

    #[test]
    fn display_includes_status_and_resource() {
        let error = ErrorKind::Conflict
            .with_message("Stale version")
            .with_resource("quote_request");

        let display = error.to_string();
        assert_eq!(display, "conflict (409): Stale version [quote_request]");
    }

    #[test]
    fn kinds_map_to_client_or_server_errors() {
        let kinds = [
            ErrorKind::MissingPathParam,
            ErrorKind::BadRequest,
            ErrorKind::ValidationFailed,
            ErrorKind::MissingAuthToken,
            ErrorKind::MalformedAuthToken,
            ErrorKind::TokenExpired,
            ErrorKind::Unauthorized,
            ErrorKind::Forbidden,
            ErrorKind::NotFound,
            ErrorKind::Conflict,
            ErrorKind::UnsupportedMediaType,
            ErrorKind::InternalServerError,
            ErrorKind::ServiceUnavailable,
            ErrorKind::GatewayTimeout,
        ];

        for kind in kinds {
            assert!(kind.status_code().as_u16() >= 400);
            assert!(!kind.default_message().is_empty());
            assert_eq!(kind.into_response().status(), kind.status_code());
        }

        assert_eq!(ErrorKind::ValidationFailed.name(), "validation_failed");
        assert_eq!(ErrorKind::MissingAuthToken.name(), "missing_auth_token");
    }
}
