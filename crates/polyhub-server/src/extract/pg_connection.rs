//! Pooled database connection extractor.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut};
use polyhub_postgres::{PgClient, PgConn};

use crate::handler::{Error, ErrorKind};

/// Tracing target for connection checkout.
const TRACING_TARGET: &str = "polyhub_server::extract::postgres";

/// A connection held for the lifetime of one handler call.
///
/// An exhausted or unreachable pool answers 503 before the handler runs.
#[derive(Debug, Deref, DerefMut)]
pub struct PgPool(pub PgConn);

impl<S> FromRequestParts<S> for PgPool
where
    PgClient: FromRef<S>,
    S: Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(_: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match PgClient::from_ref(state).get_connection().await {
            Ok(conn) => Ok(Self(conn)),
            Err(error) => {
                tracing::warn!(target: TRACING_TARGET, %error, "no database connection available");
                Err(ErrorKind::ServiceUnavailable.with_context(error.to_string()))
            }
        }
    }
}

impl aide::OperationInput for PgPool {}
