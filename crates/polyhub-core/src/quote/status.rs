//! Quote request status machine.

use std::str::FromStr;

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{Error, Result};

/// Lifecycle status of a quote request.
///
/// `Pending` is the sole initial state. `Completed`, `Rejected` and
/// `Cancelled` are terminal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QuoteStatus {
    #[default]
    Pending,
    Responded,
    Negotiation,
    Accepted,
    InProgress,
    Shipped,
    Delivered,
    Completed,
    Rejected,
    Cancelled,
}

/// Relationship of the actor who appended a status entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatusActor {
    Buyer,
    Seller,
    Admin,
}

impl QuoteStatus {
    /// Statuses reachable from `self` in one step.
    pub const fn allowed_next(self) -> &'static [QuoteStatus] {
        use QuoteStatus::*;

        match self {
            Pending => &[Responded, Negotiation, Accepted, Rejected, Cancelled],
            Responded => &[Negotiation, Accepted, Rejected, Cancelled],
            Negotiation => &[Responded, Accepted, Rejected, Cancelled],
            Accepted => &[InProgress, Cancelled],
            InProgress => &[Shipped, Cancelled],
            Shipped => &[Delivered],
            Delivered => &[Completed],
            Completed | Rejected | Cancelled => &[],
        }
    }

    #[inline]
    pub fn can_transition_to(self, next: QuoteStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }

    /// Returns whether `actor` may move a request into this status.
    pub const fn permits(self, actor: StatusActor) -> bool {
        match self {
            Self::Responded | Self::InProgress | Self::Shipped => {
                matches!(actor, StatusActor::Seller | StatusActor::Admin)
            }
            Self::Cancelled => matches!(actor, StatusActor::Buyer | StatusActor::Admin),
            _ => true,
        }
    }

    /// Display icon shown next to the status.
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Pending => "⏳",
            Self::Responded => "💬",
            Self::Negotiation => "🤝",
            Self::Accepted => "✅",
            Self::InProgress => "🔄",
            Self::Shipped => "🚚",
            Self::Delivered => "📦",
            Self::Completed => "🏁",
            Self::Rejected => "❌",
            Self::Cancelled => "🚫",
        }
    }

    /// Parses a wire status value, reporting unknown values as a field error.
    pub fn parse_field(value: &str) -> Result<Self> {
        Self::from_str(value.trim()).map_err(|_| {
            Error::invalid_field(
                "status",
                "unknown_status",
                format!("'{value}' is not a valid quote status"),
            )
        })
    }

    /// Checks that `actor` may move a request from `self` to `next`.
    pub fn check_transition(self, next: QuoteStatus, actor: StatusActor) -> Result<()> {
        if !self.can_transition_to(next) {
            return Err(Error::invalid_field(
                "status",
                "illegal_transition",
                format!("cannot move a quote request from '{self}' to '{next}'"),
            ));
        }

        if !next.permits(actor) {
            return Err(Error::invalid_field(
                "status",
                "transition_not_permitted",
                format!("a {actor} cannot move a quote request to '{next}'"),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::ErrorKind;

    #[test]
    fn terminal_states_have_no_successors() {
        let terminal: Vec<_> = QuoteStatus::iter().filter(|s| s.is_terminal()).collect();
        assert_eq!(
            terminal,
            vec![
                QuoteStatus::Completed,
                QuoteStatus::Rejected,
                QuoteStatus::Cancelled
            ]
        );
    }

    #[test]
    fn nothing_transitions_back_to_pending() {
        assert!(QuoteStatus::iter().all(|s| !s.can_transition_to(QuoteStatus::Pending)));
    }

    #[test]
    fn fulfilment_path_is_linear() {
        assert!(QuoteStatus::Accepted.can_transition_to(QuoteStatus::InProgress));
        assert!(QuoteStatus::InProgress.can_transition_to(QuoteStatus::Shipped));
        assert!(QuoteStatus::Shipped.can_transition_to(QuoteStatus::Delivered));
        assert!(QuoteStatus::Delivered.can_transition_to(QuoteStatus::Completed));
        assert!(!QuoteStatus::Shipped.can_transition_to(QuoteStatus::Cancelled));
        assert!(!QuoteStatus::Pending.can_transition_to(QuoteStatus::Shipped));
    }

    #[test]
    fn actor_permissions() {
        assert!(!QuoteStatus::Responded.permits(StatusActor::Buyer));
        assert!(QuoteStatus::Responded.permits(StatusActor::Seller));
        assert!(!QuoteStatus::Cancelled.permits(StatusActor::Seller));
        assert!(QuoteStatus::Cancelled.permits(StatusActor::Buyer));
        assert!(QuoteStatus::Accepted.permits(StatusActor::Buyer));
        assert!(QuoteStatus::Shipped.permits(StatusActor::Admin));
    }

    #[test]
    fn parses_wire_values() -> anyhow::Result<()> {
        assert_eq!(QuoteStatus::parse_field("in_progress")?, QuoteStatus::InProgress);

        let error = QuoteStatus::parse_field("archived").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation);
        assert_eq!(error.fields()[0].code, "unknown_status");
        Ok(())
    }

    #[test]
    fn illegal_transition_is_validation_error() {
        let error = QuoteStatus::Completed
            .check_transition(QuoteStatus::Accepted, StatusActor::Admin)
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation);

        let error = QuoteStatus::Accepted
            .check_transition(QuoteStatus::InProgress, StatusActor::Buyer)
            .unwrap_err();
        assert_eq!(error.fields()[0].code, "transition_not_permitted");
    }
}
