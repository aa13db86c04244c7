//! Notification delivery into the account inbox table.

use polyhub_core::Result;
use polyhub_core::notify::{NewNotification, NotificationSink};
use polyhub_postgres::model::NewAccountNotification;
use polyhub_postgres::query::AccountNotificationRepository;

use super::convert::pg_notification_type;
use super::{PgMarketStore, store_error};

#[async_trait::async_trait]
impl NotificationSink for PgMarketStore {
    async fn emit(&self, notification: NewNotification) -> Result<()> {
        let row = NewAccountNotification {
            account_id: notification.account_id,
            notify_type: pg_notification_type(notification.kind),
            message: notification.message,
            redirect: notification.redirect,
            related_id: notification.related_id,
            metadata: notification.meta,
        };

        let mut conn = self.connection().await?;
        conn.create_notification(row).await.map_err(store_error)?;
        Ok(())
    }
}
