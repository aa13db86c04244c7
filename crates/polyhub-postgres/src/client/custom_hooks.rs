//! Connection setup and pool lifecycle hooks.

use std::time::Instant;

use deadpool::managed::{HookResult, Metrics};
use diesel::ConnectionResult;
use diesel_async::pooled_connection::{PoolError, PoolableConnection};
use diesel_async::{AsyncConnection, AsyncPgConnection};
use futures::FutureExt;
use futures::future::BoxFuture;

use crate::TRACING_TARGET_CONNECTION;

/// Replaces the password of a connection URL with `***`.
pub(crate) fn mask_url(url: &str) -> String {
    let authority = url.find("://").map_or(0, |scheme_end| scheme_end + 3);
    if let Some(at) = url[authority..].find('@')
        && let Some(colon) = url[authority..authority + at].find(':')
    {
        let mut masked = url.to_owned();
        masked.replace_range(authority + colon + 1..authority + at, "***");
        return masked;
    }

    url.to_owned()
}

/// Establishes a connection and logs how long it took.
///
/// Installed as the [`ManagerConfig`] custom setup.
///
/// [`ManagerConfig`]: diesel_async::pooled_connection::ManagerConfig
pub fn setup_callback<C>(addr: &str) -> BoxFuture<'_, ConnectionResult<C>>
where
    C: AsyncConnection + 'static,
{
    let start = Instant::now();
    let masked_addr = mask_url(addr);

    async move {
        let result = C::establish(addr).await;
        let elapsed_ms = start.elapsed().as_millis();

        match &result {
            Ok(_) => tracing::info!(
                target: TRACING_TARGET_CONNECTION,
                addr = %masked_addr,
                elapsed_ms,
                "database connection established"
            ),
            Err(err) => tracing::error!(
                target: TRACING_TARGET_CONNECTION,
                addr = %masked_addr,
                elapsed_ms,
                error = %err,
                "failed to establish database connection"
            ),
        }

        result
    }
    .boxed()
}

pub fn post_create(conn: &mut AsyncPgConnection, metrics: &Metrics) -> HookResult<PoolError> {
    if conn.is_broken() {
        tracing::warn!(
            target: TRACING_TARGET_CONNECTION,
            created_at = ?metrics.created,
            "connection is broken right after creation"
        );
    } else {
        tracing::debug!(target: TRACING_TARGET_CONNECTION, "connection added to pool");
    }

    Ok(())
}

pub fn pre_recycle(conn: &mut AsyncPgConnection, metrics: &Metrics) -> HookResult<PoolError> {
    if conn.is_broken() {
        tracing::warn!(
            target: TRACING_TARGET_CONNECTION,
            recycle_count = metrics.recycle_count,
            "connection is broken before recycling"
        );
    }

    Ok(())
}

pub fn post_recycle(conn: &mut AsyncPgConnection, metrics: &Metrics) -> HookResult<PoolError> {
    if conn.is_broken() {
        tracing::error!(
            target: TRACING_TARGET_CONNECTION,
            recycle_count = metrics.recycle_count,
            last_recycled = ?metrics.recycled,
            "connection is broken after recycling"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::mask_url;

    #[test]
    fn masks_password_only() {
        assert_eq!(
            mask_url("postgres://polyhub:hunter2@db:5432/polyhub"),
            "postgres://polyhub:***@db:5432/polyhub"
        );
        assert_eq!(
            mask_url("postgres://db:5432/polyhub"),
            "postgres://db:5432/polyhub"
        );
        assert_eq!(
            mask_url("postgres://polyhub@db/polyhub"),
            "postgres://polyhub@db/polyhub"
        );
    }
}
