//! Conversion of database errors into HTTP errors.

use polyhub_postgres::PgError;
use polyhub_postgres::error::DieselError;

use crate::handler::{Error, ErrorKind};

/// Tracing target for database error conversion.
const TRACING_TARGET: &str = "polyhub_server::postgres_errors";

impl From<PgError> for Error<'static> {
    fn from(error: PgError) -> Self {
        if let Some(constraint) = error.constraint_violation() {
            tracing::warn!(target: TRACING_TARGET, %constraint, "constraint violated");
            return constraint.into();
        }

        let kind = match &error {
            PgError::Query(DieselError::NotFound) => return ErrorKind::NotFound.into_error(),
            PgError::Conflict(reason) => {
                tracing::debug!(target: TRACING_TARGET, %reason, "lost a versioned update");
                return ErrorKind::Conflict.with_message(reason.to_string());
            }
            PgError::Timeout(_) => ErrorKind::ServiceUnavailable,
            PgError::Config(_)
            | PgError::Connection(_)
            | PgError::Migration(_)
            | PgError::Query(_)
            | PgError::Unexpected(_) => ErrorKind::InternalServerError,
        };

        tracing::error!(target: TRACING_TARGET, %error, "database failure");
        kind.into_error()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn database_errors_map_to_statuses() {
        let cases = [
            (PgError::Query(DieselError::NotFound), StatusCode::NOT_FOUND),
            (PgError::Conflict("stale version".into()), StatusCode::CONFLICT),
            (PgError::Config("bad url".to_owned()), StatusCode::INTERNAL_SERVER_ERROR),
            (PgError::Unexpected("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(Error::from(error).kind().status_code(), status);
        }
    }
}
