//! Startup errors.
//!
//! Raised while the service state is assembled (configuration, database
//! connection, migrations, key material), never by request handlers.

use std::borrow::Cow;
use std::error::Error as StdError;

use strum::{Display, IntoStaticStr};

/// Type alias for boxed errors that are Send + Sync.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Result type alias for service layer operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Which part of startup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// A configuration value is missing or out of range.
    Config,
    /// A dependency such as Postgres could not be reached.
    External,
    /// Signing keys failed their self-check.
    Auth,
    Internal,
}

/// Service layer error.
#[derive(Debug, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    #[source]
    source: Option<BoxedError>,
}

impl Error {
    fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn auth(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Auth, message)
    }

    /// An error raised by `service`, e.g. `Error::internal("postgres", "..")`.
    pub fn internal(service: &str, message: impl AsRef<str>) -> Self {
        Self::new(ErrorKind::Internal, format!("{service}: {}", message.as_ref()))
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<polyhub_postgres::PgError> for Error {
    fn from(error: polyhub_postgres::PgError) -> Self {
        Self::new(ErrorKind::External, format!("postgres: {error}")).with_source(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_keep_their_message() {
        let error = Error::config("auth secret is too short");
        assert_eq!(error.kind(), ErrorKind::Config);
        assert_eq!(error.message(), "auth secret is too short");
        assert_eq!(error.to_string(), "config error: auth secret is too short");
    }

    #[test]
    fn internal_errors_name_the_service() {
        let source = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let error = Error::internal("postgres", "cannot connect").with_source(source);

        assert!(StdError::source(&error).is_some());
        assert_eq!(error.kind(), ErrorKind::Internal);
        assert_eq!(error.message(), "postgres: cannot connect");
    }
}
