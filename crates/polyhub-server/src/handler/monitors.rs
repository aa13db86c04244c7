//! Health check handler.
//!
//! Anonymous callers get pool statistics only. Authenticated callers also
//! trigger a connection checkout, which reports an unreachable database as
//! unhealthy.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use polyhub_postgres::PgClient;

use super::response::{MonitorStatus, ServiceStatus};
use crate::extract::{AuthState, Json};
use crate::handler::Result;
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "polyhub_server::handler::monitors";

#[tracing::instrument(skip_all, fields(authenticated = auth_state.is_some()))]
async fn health_status(
    State(pg_client): State<PgClient>,
    auth_state: Option<AuthState>,
) -> Result<(StatusCode, Json<MonitorStatus>)> {
    let mut status = ServiceStatus::Healthy;

    if auth_state.is_some() {
        if let Err(error) = pg_client.get_connection().await {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                "database connection check failed",
            );
            status = ServiceStatus::Unhealthy;
        }
    }

    let pool = pg_client.pool_status();
    if status == ServiceStatus::Healthy && pool.waiting > 0 {
        status = ServiceStatus::Degraded;
    }

    let status_code = match status {
        ServiceStatus::Healthy | ServiceStatus::Degraded => StatusCode::OK,
        ServiceStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    tracing::debug!(
        target: TRACING_TARGET,
        ?status,
        pool_size = pool.size,
        pool_waiting = pool.waiting,
        "health status prepared",
    );

    Ok((
        status_code,
        Json(MonitorStatus::new(status, pool.size, pool.waiting)),
    ))
}

fn health_status_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get system health status")
        .description("Returns 503 when an authenticated check cannot reach the database.")
        .response::<200, Json<MonitorStatus>>()
        .response::<503, Json<MonitorStatus>>()
}

/// Returns the health monitoring route.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/health", get_with(health_status, health_status_docs))
        .with_path_items(|item| item.tag("Monitors"))
}

#[cfg(test)]
mod tests {
    use crate::handler::response::{MonitorStatus, ServiceStatus};
    use crate::handler::test::TestMarket;

    #[tokio::test]
    async fn anonymous_health_check() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;

        let response = market.server.get("/health").await;
        response.assert_status_ok();

        let status = response.json::<MonitorStatus>();
        assert_eq!(status.status, ServiceStatus::Healthy);
        assert_eq!(status.pool_waiting, 0);
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
        Ok(())
    }
}
