//! Notification inbox responses.

use jiff::Timestamp;
use polyhub_postgres::model::AccountNotification;
use polyhub_postgres::types::NotificationType;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// One inbox entry.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub message: String,
    /// Client route opened when the entry is clicked, e.g. `/quotes/{id}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    pub read: bool,
    /// The quote request or deal the entry is about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
    pub created_at: Timestamp,
}

impl From<AccountNotification> for Notification {
    fn from(row: AccountNotification) -> Self {
        let meta = match row.metadata {
            Value::Object(meta) => meta,
            _ => Map::new(),
        };

        Self {
            id: row.id,
            kind: row.notify_type,
            message: row.message,
            redirect: row.redirect,
            read: row.is_read,
            related_id: row.related_id,
            meta,
            created_at: row.created_at.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCount {
    pub unread: i64,
}

/// Number of entries a mark-as-read call changed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkedRead {
    pub updated: usize,
}
