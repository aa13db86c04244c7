//! Account notification model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::account_notifications;
use crate::types::NotificationType;

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = account_notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AccountNotification {
    pub id: Uuid,
    pub account_id: Uuid,
    pub notify_type: NotificationType,
    pub message: String,
    /// Client route to open when the notification is clicked.
    pub redirect: Option<String>,
    pub is_read: bool,
    pub related_id: Option<Uuid>,
    pub metadata: serde_json::Value,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = account_notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAccountNotification {
    pub account_id: Uuid,
    pub notify_type: NotificationType,
    pub message: String,
    pub redirect: Option<String>,
    pub related_id: Option<Uuid>,
    pub metadata: serde_json::Value,
}
