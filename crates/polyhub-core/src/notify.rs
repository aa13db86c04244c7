//! Best-effort notification side effects.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::Result;

/// Kind of notification delivered to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationKind {
    /// A buyer submitted a quote request to the seller.
    QuoteRequested,
    /// A participant changed the status of a quote request.
    QuoteStatusChanged,
    /// The seller attached a response to a quote request.
    QuoteResponded,
    /// An admin approved or rejected a best deal.
    DealDecision,
}

/// A notification to be recorded for an account.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub account_id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub redirect: Option<String>,
    pub related_id: Option<Uuid>,
    pub meta: serde_json::Value,
}

impl NewNotification {
    pub fn new(account_id: Uuid, kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            account_id,
            kind,
            message: message.into(),
            redirect: None,
            related_id: None,
            meta: serde_json::Value::Object(Default::default()),
        }
    }

    pub fn with_redirect(mut self, redirect: impl Into<String>) -> Self {
        self.redirect = Some(redirect.into());
        self
    }

    pub fn with_related(mut self, related_id: Uuid) -> Self {
        self.related_id = Some(related_id);
        self
    }

    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = meta;
        self
    }
}

/// Fire-and-forget notification delivery.
///
/// Failures are reported to the caller, which logs and discards them. A
/// notification is never atomic with the write that triggered it.
#[async_trait::async_trait]
pub trait NotificationSink: Send + Sync {
    async fn emit(&self, notification: NewNotification) -> Result<()>;
}
