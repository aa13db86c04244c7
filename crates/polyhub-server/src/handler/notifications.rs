//! Account notification handlers.
//!
//! Notifications are written by the marketplace lifecycle; these handlers
//! only read them and flip their read flag.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use polyhub_postgres::PgClient;
use polyhub_postgres::query::AccountNotificationRepository;
use polyhub_postgres::types::OffsetPagination;
use validator::Validate;

use super::request::{NotificationPathParams, Pagination};
use super::response::{ErrorResponse, MarkedRead, Notification, Page, UnreadCount};
use crate::extract::{AuthState, Json, Path, Query};
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for notification operations.
const TRACING_TARGET: &str = "polyhub_server::handler::notifications";

/// Lists notifications of the authenticated account, newest first.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn list_notifications(
    State(pg_client): State<PgClient>,
    AuthState(auth_state): AuthState,
    Query(pagination): Query<Pagination>,
) -> Result<(StatusCode, Json<Page<Notification>>)> {
    pagination.validate()?;

    let offset = OffsetPagination::from(pagination);
    let mut conn = pg_client.get_connection().await?;
    let page = conn
        .list_account_notifications(auth_state.account_id, offset)
        .await?;

    tracing::debug!(
        target: TRACING_TARGET,
        returned = page.items.len(),
        total = page.total,
        "notifications listed",
    );

    Ok((
        StatusCode::OK,
        Json(Page::from_offset_page(page, offset, Notification::from)),
    ))
}

fn list_notifications_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List notifications")
        .description("Returns notifications of the authenticated account without marking them read.")
        .response::<200, Json<Page<Notification>>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Returns the number of unread notifications.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn get_unread_count(
    State(pg_client): State<PgClient>,
    AuthState(auth_state): AuthState,
) -> Result<(StatusCode, Json<UnreadCount>)> {
    let mut conn = pg_client.get_connection().await?;
    let unread = conn.count_unread_notifications(auth_state.account_id).await?;

    Ok((StatusCode::OK, Json(UnreadCount { unread })))
}

fn get_unread_count_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get unread notifications count")
        .response::<200, Json<UnreadCount>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Marks a single notification as read.
#[tracing::instrument(skip_all, fields(notification_id = %path_params.notification_id))]
async fn mark_notification_read(
    State(pg_client): State<PgClient>,
    AuthState(auth_state): AuthState,
    Path(path_params): Path<NotificationPathParams>,
) -> Result<(StatusCode, Json<Notification>)> {
    let mut conn = pg_client.get_connection().await?;
    let Some(notification) = conn
        .mark_notification_read(auth_state.account_id, path_params.notification_id)
        .await?
    else {
        return Err(ErrorKind::NotFound
            .with_resource("notification")
            .with_message("Notification not found"));
    };

    Ok((StatusCode::OK, Json(notification.into())))
}

fn mark_notification_read_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Mark notification read")
        .description("Notifications of other accounts are reported as not found.")
        .response::<200, Json<Notification>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Marks every notification of the caller as read.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn mark_all_notifications_read(
    State(pg_client): State<PgClient>,
    AuthState(auth_state): AuthState,
) -> Result<(StatusCode, Json<MarkedRead>)> {
    let mut conn = pg_client.get_connection().await?;
    let updated = conn.mark_all_notifications_read(auth_state.account_id).await?;

    if updated > 0 {
        tracing::debug!(target: TRACING_TARGET, updated, "notifications marked read");
    }

    Ok((StatusCode::OK, Json(MarkedRead { updated })))
}

fn mark_all_notifications_read_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Mark all notifications read")
        .response::<200, Json<MarkedRead>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Returns routes for notification management.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/notifications",
            get_with(list_notifications, list_notifications_docs),
        )
        .api_route(
            "/notifications/unread",
            get_with(get_unread_count, get_unread_count_docs),
        )
        .api_route(
            "/notifications/read",
            post_with(mark_all_notifications_read, mark_all_notifications_read_docs),
        )
        .api_route(
            "/notifications/{notificationId}/read",
            post_with(mark_notification_read, mark_notification_read_docs),
        )
        .with_path_items(|item| item.tag("Notifications"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use polyhub_core::types::AccountRole;
    use serde_json::{Value, json};
    use uuid::Uuid;

    use crate::handler::test::{TestMarket, bearer};

    #[tokio::test]
    async fn notifications_require_a_token() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;

        for path in ["/notifications", "/notifications/unread"] {
            market.server.get(path).await.assert_status_unauthorized();
        }
        market
            .server
            .post("/notifications/read")
            .await
            .assert_status_unauthorized();
        Ok(())
    }

    #[tokio::test]
    async fn listing_validates_paging() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;
        let token = bearer(&market, Uuid::now_v7(), AccountRole::Buyer)?;

        let response = market
            .server
            .get("/notifications")
            .add_query_param("page", 0)
            .authorization_bearer(&token)
            .await;
        response.assert_status_bad_request();

        let body: Value = response.json();
        assert_eq!(body["validation"][0]["field"], json!("page"));
        Ok(())
    }

    #[tokio::test]
    async fn malformed_notification_ids_are_rejected() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;
        let token = bearer(&market, Uuid::now_v7(), AccountRole::Seller)?;

        market
            .server
            .post("/notifications/not-a-uuid/read")
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        Ok(())
    }
}
