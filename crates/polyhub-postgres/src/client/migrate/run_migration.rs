use std::ops::DerefMut;
use std::time::Instant;

use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use super::{MigrationResult, custom_hooks, get_migration_status};
use crate::{MIGRATIONS, PgClient, PgError, PgResult, TRACING_TARGET_MIGRATION};

/// Applies every pending embedded migration.
///
/// The harness is synchronous, so it runs on the blocking pool through
/// an [`AsyncConnectionWrapper`].
#[tracing::instrument(skip(pg), target = TRACING_TARGET_MIGRATION)]
pub async fn run_pending_migrations(pg: &PgClient) -> PgResult<MigrationResult> {
    let start = Instant::now();
    let mut conn = pg.get_pooled_connection().await?;
    let status = get_migration_status(&mut conn).await?;

    if status.is_up_to_date() {
        tracing::info!(target: TRACING_TARGET_MIGRATION, "database schema is up to date");
        return Ok(MigrationResult::success(start.elapsed(), vec![]));
    }

    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        pending = status.pending_migrations(),
        "applying pending migrations"
    );

    custom_hooks::pre_migrate(&mut conn)?;
    let mut conn: AsyncConnectionWrapper<_> = conn.into();
    let (versions, mut conn) = spawn_blocking(move || {
        let versions = conn
            .run_pending_migrations(MIGRATIONS)
            .map(|versions| versions.into_iter().map(|v| v.to_string()).collect::<Vec<_>>());
        (versions, conn)
    })
    .await
    .map_err(|err| PgError::Migration(err.into()))?;

    custom_hooks::post_migrate(conn.deref_mut())?;

    let duration = start.elapsed();
    let versions = versions.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            duration = ?duration,
            error = %err,
            "database migration failed"
        );
        PgError::Migration(err)
    })?;

    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        duration = ?duration,
        applied = versions.len(),
        "database migrations applied"
    );

    Ok(MigrationResult::success(duration, versions))
}
