//! Quote request query types.

use jiff::civil::Date;
use jiff::tz::TimeZone;
use jiff::{Timestamp, ToSpan};
use polyhub_core::quote::{QuoteFilter, QuoteStatus, QuoteType};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::validations::normalized_option;

/// Query parameters for listing quote requests.
///
/// Non-admin callers only ever see requests they take part in, whatever
/// these filters say.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteQuery {
    pub request_type: Option<QuoteType>,
    pub status: Option<QuoteStatus>,
    pub buyer_id: Option<Uuid>,
    pub seller_id: Option<Uuid>,
    /// Text searched in the buyer message and the status history.
    #[validate(length(max = 200))]
    pub search: Option<String>,
    /// First creation day included, UTC.
    pub created_from: Option<Date>,
    /// Last creation day included, UTC.
    pub created_to: Option<Date>,
}

impl QuoteQuery {
    /// Converts the query into a domain filter. Day bounds become inclusive
    /// UTC instants.
    pub fn into_filter(self) -> QuoteFilter {
        QuoteFilter {
            request_type: self.request_type,
            status: self.status,
            buyer_id: self.buyer_id,
            seller_id: self.seller_id,
            participant_id: None,
            search: normalized_option(self.search),
            created_from: self.created_from.and_then(start_of_day),
            created_to: self.created_to.and_then(end_of_day),
        }
    }
}

fn start_of_day(date: Date) -> Option<Timestamp> {
    date.to_zoned(TimeZone::UTC).ok().map(|z| z.timestamp())
}

fn end_of_day(date: Date) -> Option<Timestamp> {
    let next = date.checked_add(1.day()).ok()?;
    start_of_day(next)?.checked_sub(1.nanosecond()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_bounds_are_inclusive() {
        let query = QuoteQuery {
            created_from: Some(jiff::civil::date(2026, 3, 1)),
            created_to: Some(jiff::civil::date(2026, 3, 31)),
            search: Some("  ".into()),
            ..Default::default()
        };

        let filter = query.into_filter();
        assert_eq!(
            filter.created_from,
            Some("2026-03-01T00:00:00Z".parse().unwrap())
        );
        assert_eq!(
            filter.created_to,
            Some("2026-03-31T23:59:59.999999999Z".parse().unwrap())
        );
        assert_eq!(filter.search, None);
    }
}
