//! Delivery urgency derived from the unified delivery date.

use jiff::civil::Date;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Priority {
    Urgent,
    High,
    Medium,
    #[default]
    Normal,
}

impl Priority {
    /// Buckets the number of days until delivery. Dates in the past are urgent.
    pub fn from_delivery_date(delivery: Option<Date>, today: Date) -> Self {
        let Some(delivery) = delivery else {
            return Self::Normal;
        };

        match (delivery - today).get_days() {
            ..=7 => Self::Urgent,
            8..=14 => Self::High,
            15..=30 => Self::Medium,
            _ => Self::Normal,
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use jiff::civil::date;

    use super::*;

    #[test]
    fn buckets_by_days_until_delivery() {
        let today = date(2026, 3, 1);
        let at = |days: i64| Some(today.saturating_add(days.days()));

        assert_eq!(Priority::from_delivery_date(at(5), today), Priority::Urgent);
        assert_eq!(Priority::from_delivery_date(at(10), today), Priority::High);
        assert_eq!(Priority::from_delivery_date(at(20), today), Priority::Medium);
        assert_eq!(Priority::from_delivery_date(at(60), today), Priority::Normal);
        assert_eq!(Priority::from_delivery_date(None, today), Priority::Normal);
    }

    #[test]
    fn boundaries_and_past_dates() {
        let today = date(2026, 3, 1);
        let at = |days: i64| Some(today.saturating_add(days.days()));

        assert_eq!(Priority::from_delivery_date(at(7), today), Priority::Urgent);
        assert_eq!(Priority::from_delivery_date(at(14), today), Priority::High);
        assert_eq!(Priority::from_delivery_date(at(30), today), Priority::Medium);
        assert_eq!(Priority::from_delivery_date(at(31), today), Priority::Normal);
        assert_eq!(Priority::from_delivery_date(at(-3), today), Priority::Urgent);
    }
}
