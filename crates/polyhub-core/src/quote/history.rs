//! Append-only status history.

use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{QuoteStatus, StatusActor};
use crate::{Error, Result};

/// A single immutable status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct StatusEntry {
    pub status: QuoteStatus,
    pub message: String,
    pub date: Timestamp,
    pub updated_by: StatusActor,
}

impl StatusEntry {
    pub fn new(
        status: QuoteStatus,
        message: impl Into<String>,
        updated_by: StatusActor,
        date: Timestamp,
    ) -> Self {
        Self {
            status,
            message: message.into(),
            date,
            updated_by,
        }
    }
}

/// Non-empty, ordered history of status entries.
///
/// The current status is always the last entry. There is no way to change
/// it other than appending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<StatusEntry>", try_from = "Vec<StatusEntry>")]
pub struct StatusHistory {
    first: StatusEntry,
    rest: Vec<StatusEntry>,
}

impl StatusHistory {
    /// Starts a history with its initial entry.
    pub fn new(first: StatusEntry) -> Self {
        Self {
            first,
            rest: Vec::new(),
        }
    }

    /// Rebuilds a history from stored entries in append order.
    pub fn from_entries(entries: Vec<StatusEntry>) -> Result<Self> {
        let mut entries = entries.into_iter();
        let first = entries.next().ok_or_else(|| {
            Error::internal().with_message("quote request has an empty status history")
        })?;

        Ok(Self {
            first,
            rest: entries.collect(),
        })
    }

    /// The most recent entry.
    pub fn current(&self) -> &StatusEntry {
        self.rest.last().unwrap_or(&self.first)
    }

    /// The current status.
    #[inline]
    pub fn status(&self) -> QuoteStatus {
        self.current().status
    }

    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }

    /// Always `false`; a history holds at least its initial entry.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEntry> {
        std::iter::once(&self.first).chain(self.rest.iter())
    }

    /// Appends an entry, making it the current status.
    pub fn push(&mut self, entry: StatusEntry) {
        self.rest.push(entry);
    }

    /// Returns `true` if any entry message contains `needle`, ignoring case.
    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.iter()
            .any(|entry| entry.message.to_lowercase().contains(&needle))
    }
}

impl From<StatusHistory> for Vec<StatusEntry> {
    fn from(history: StatusHistory) -> Self {
        let mut entries = Vec::with_capacity(history.len());
        entries.push(history.first);
        entries.extend(history.rest);
        entries
    }
}

#[cfg(feature = "schema")]
impl JsonSchema for StatusHistory {
    fn schema_name() -> std::borrow::Cow<'static, str> {
        "StatusHistory".into()
    }

    fn json_schema(generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        <Vec<StatusEntry>>::json_schema(generator)
    }
}

impl TryFrom<Vec<StatusEntry>> for StatusHistory {
    type Error = Error;

    fn try_from(entries: Vec<StatusEntry>) -> Result<Self> {
        Self::from_entries(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(status: QuoteStatus, by: StatusActor) -> StatusEntry {
        StatusEntry::new(status, status.to_string(), by, Timestamp::now())
    }

    #[test]
    fn current_tracks_last_append() {
        let mut history = StatusHistory::new(entry(QuoteStatus::Pending, StatusActor::Buyer));
        assert_eq!(history.status(), QuoteStatus::Pending);

        history.push(entry(QuoteStatus::Accepted, StatusActor::Seller));
        assert_eq!(history.status(), QuoteStatus::Accepted);
        assert_eq!(history.current().updated_by, StatusActor::Seller);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn empty_history_is_rejected() {
        assert!(StatusHistory::from_entries(Vec::new()).is_err());
    }

    #[test]
    fn serializes_as_plain_list() -> anyhow::Result<()> {
        let history = StatusHistory::new(entry(QuoteStatus::Pending, StatusActor::Buyer));
        let json = serde_json::to_value(&history)?;

        assert!(json.is_array());
        assert_eq!(json[0]["updatedBy"], "buyer");
        Ok(())
    }
}
