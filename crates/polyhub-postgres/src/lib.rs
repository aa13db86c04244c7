#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Migrations embedded into the binary at compile time.
pub(crate) const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
    diesel_migrations::embed_migrations!();

/// Tracing target for pool construction and configuration.
pub const TRACING_TARGET_CLIENT: &str = "polyhub_postgres::client";

/// Tracing target for repository queries.
pub const TRACING_TARGET_QUERY: &str = "polyhub_postgres::queries";

/// Tracing target for migration runs and status checks.
pub const TRACING_TARGET_MIGRATION: &str = "polyhub_postgres::migrations";

/// Tracing target for connection setup and recycling.
pub const TRACING_TARGET_CONNECTION: &str = "polyhub_postgres::connection";

mod client;
pub mod model;
pub mod query;
mod schema;
pub mod types;

use std::borrow::Cow;

use deadpool::managed::TimeoutType;
use diesel::ConnectionError;
use diesel::result::{DatabaseErrorKind, Error};
pub use diesel_async::AsyncPgConnection as PgConnection;

pub use crate::client::{
    ConnectionPool, MigrationResult, MigrationStatus, PgClient, PgClientMigrationExt, PgConfig,
    PgConn, PgPoolStatus, PooledConnection, get_applied_migrations, get_migration_status,
    run_pending_migrations, verify_schema_integrity,
};
use crate::types::ConstraintViolation;

pub mod error {
    //! Error re-exports and hints.

    use std::borrow::Cow;

    pub use deadpool::managed::TimeoutType;
    pub use diesel::result::{
        ConnectionError as DieselConnectionError, DatabaseErrorInformation, DatabaseErrorKind,
        Error as DieselError,
    };
    pub use diesel_async::pooled_connection::PoolError as DieselPoolError;
    pub use diesel_async::pooled_connection::deadpool::PoolError as DeadpoolError;

    /// Type-erased error.
    pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

    /// Operator-facing remediation hint for an error.
    pub trait ErrorHint {
        fn hint(&self) -> Cow<'static, str>;
    }

    impl ErrorHint for TimeoutType {
        fn hint(&self) -> Cow<'static, str> {
            match self {
                TimeoutType::Wait => "connection pool is exhausted".into(),
                TimeoutType::Create => "database is unreachable".into(),
                TimeoutType::Recycle => "pooled connection could not be recycled".into(),
            }
        }
    }
}

/// Errors raised by the PostgreSQL layer.
#[derive(Debug, thiserror::Error)]
#[must_use = "database errors should be handled appropriately"]
pub enum PgError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("database operation timed out")]
    Timeout(TimeoutType),

    #[error("database connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("database migration error: {0}")]
    Migration(error::BoxError),

    /// Query failure, constraint violations included.
    #[error("database query error: {0}")]
    Query(#[from] Error),

    /// Compare-and-swap update lost against a concurrent writer.
    #[error("version conflict: {0}")]
    Conflict(Cow<'static, str>),

    #[error("unexpected error: {0}")]
    Unexpected(Cow<'static, str>),
}

impl PgError {
    /// Name of the violated constraint, if any.
    pub fn constraint(&self) -> Option<&str> {
        let PgError::Query(Error::DatabaseError(_, info)) = self else {
            return None;
        };

        info.constraint_name()
    }

    /// Known constraint this error violated.
    pub fn constraint_violation(&self) -> Option<ConstraintViolation> {
        self.constraint().and_then(ConstraintViolation::new)
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            PgError::Query(Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
        )
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            PgError::Query(Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _))
        )
    }

    /// Whether retrying the operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PgError::Timeout(_)
                | PgError::Conflict(_)
                | PgError::Connection(ConnectionError::BadConnection(_))
                | PgError::Query(Error::DatabaseError(
                    DatabaseErrorKind::SerializationFailure,
                    _
                ))
        )
    }
}

impl From<error::DeadpoolError> for PgError {
    fn from(value: error::DeadpoolError) -> Self {
        use error::{DeadpoolError, DieselPoolError};

        match value {
            DeadpoolError::Timeout(timeout) => Self::Timeout(timeout),
            DeadpoolError::Backend(DieselPoolError::QueryError(error)) => Self::Query(error),
            DeadpoolError::Backend(DieselPoolError::ConnectionError(error)) => {
                Self::Connection(error)
            }
            DeadpoolError::PostCreateHook(err) => Self::Unexpected(err.to_string().into()),
            DeadpoolError::NoRuntimeSpecified => Self::Unexpected("no pool runtime".into()),
            DeadpoolError::Closed => Self::Connection(ConnectionError::InvalidConnectionUrl(
                "connection pool is closed".into(),
            )),
        }
    }
}

/// [`Result`] alias with [`PgError`] as the default error.
pub type PgResult<T, E = PgError> = Result<T, E>;
