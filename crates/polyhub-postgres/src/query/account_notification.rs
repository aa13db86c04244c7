//! Per-account notifications.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{AccountNotification, NewAccountNotification};
use crate::types::{OffsetPage, OffsetPagination};
use crate::{PgConnection, PgError, PgResult, schema};

pub trait AccountNotificationRepository {
    fn create_notification(
        &mut self,
        notification: NewAccountNotification,
    ) -> impl Future<Output = PgResult<AccountNotification>> + Send;

    /// Newest first.
    fn list_account_notifications(
        &mut self,
        account_id: Uuid,
        pagination: OffsetPagination,
    ) -> impl Future<Output = PgResult<OffsetPage<AccountNotification>>> + Send;

    fn count_unread_notifications(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<i64>> + Send;

    /// Marks one notification of `account_id` as read. `None` if it does not
    /// exist or belongs to another account.
    fn mark_notification_read(
        &mut self,
        account_id: Uuid,
        notification_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<AccountNotification>>> + Send;

    /// Returns the number of notifications that changed.
    fn mark_all_notifications_read(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<usize>> + Send;
}

impl AccountNotificationRepository for PgConnection {
    async fn create_notification(
        &mut self,
        notification: NewAccountNotification,
    ) -> PgResult<AccountNotification> {
        use schema::account_notifications;

        diesel::insert_into(account_notifications::table)
            .values(&notification)
            .returning(AccountNotification::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_account_notifications(
        &mut self,
        account_id: Uuid,
        pagination: OffsetPagination,
    ) -> PgResult<OffsetPage<AccountNotification>> {
        use schema::account_notifications::{self, dsl};

        let total: i64 = account_notifications::table
            .filter(dsl::account_id.eq(account_id))
            .count()
            .get_result(self)
            .await?;

        let items = account_notifications::table
            .filter(dsl::account_id.eq(account_id))
            .order((dsl::created_at.desc(), dsl::id.desc()))
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(AccountNotification::as_select())
            .load(self)
            .await?;

        Ok(OffsetPage::new(items, total))
    }

    async fn count_unread_notifications(&mut self, account_id: Uuid) -> PgResult<i64> {
        use schema::account_notifications::{self, dsl};

        account_notifications::table
            .filter(dsl::account_id.eq(account_id))
            .filter(dsl::is_read.eq(false))
            .count()
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn mark_notification_read(
        &mut self,
        account_id: Uuid,
        notification_id: Uuid,
    ) -> PgResult<Option<AccountNotification>> {
        use schema::account_notifications::{self, dsl};

        diesel::update(
            account_notifications::table
                .filter(dsl::id.eq(notification_id))
                .filter(dsl::account_id.eq(account_id)),
        )
        .set(dsl::is_read.eq(true))
        .returning(AccountNotification::as_returning())
        .get_result(self)
        .await
        .optional()
        .map_err(PgError::from)
    }

    async fn mark_all_notifications_read(&mut self, account_id: Uuid) -> PgResult<usize> {
        use schema::account_notifications::{self, dsl};

        diesel::update(
            account_notifications::table
                .filter(dsl::account_id.eq(account_id))
                .filter(dsl::is_read.eq(false)),
        )
        .set(dsl::is_read.eq(true))
        .execute(self)
        .await
        .map_err(PgError::from)
    }
}
