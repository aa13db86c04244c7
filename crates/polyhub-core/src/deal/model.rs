//! Best deal records, payloads and outcomes.

use bigdecimal::BigDecimal;
use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;
use validator::Validate;

use crate::quote::positive_decimal;
use crate::types::Actor;

/// Admin-controlled approval state of a best deal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DealStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// A seller's discounted offer on one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestDeal {
    pub id: Uuid,
    pub product_id: Uuid,
    pub seller_id: Uuid,
    /// Differs from `seller_id` when an admin created the deal for a seller.
    pub created_by: Uuid,
    pub offer_price: BigDecimal,
    /// Expiry of the offer. `None` never expires.
    pub validity: Option<Timestamp>,
    pub status: DealStatus,
    pub admin_note: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl BestDeal {
    /// Eligibility for buyer-facing listings: approved and not expired.
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.status == DealStatus::Approved && self.validity.is_none_or(|until| until >= now)
    }

    /// The seller and the creating account both own a deal.
    pub fn is_owned_by(&self, actor: &Actor) -> bool {
        actor.is(self.seller_id) || actor.is(self.created_by)
    }

    /// Pending and rejected deals, with their admin notes, stay private to
    /// their owners and administrators.
    pub fn is_visible_to(&self, actor: &Actor) -> bool {
        self.status == DealStatus::Approved || actor.is_admin() || self.is_owned_by(actor)
    }
}

/// Everything a store needs to persist a new deal. New deals are `pending`.
#[derive(Debug, Clone)]
pub struct NewDealRecord {
    pub product_id: Uuid,
    pub seller_id: Uuid,
    pub created_by: Uuid,
    pub offer_price: BigDecimal,
    pub validity: Option<Timestamp>,
}

/// Partial update of a deal. `None` leaves a column unchanged.
#[derive(Debug, Clone, Default)]
pub struct DealChanges {
    pub offer_price: Option<BigDecimal>,
    pub validity: Option<Option<Timestamp>>,
    pub status: Option<DealStatus>,
    pub admin_note: Option<Option<String>>,
}

/// Filters applied when listing deals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DealFilter {
    pub seller_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub status: Option<DealStatus>,
    /// Keep only deals active at this instant.
    pub active_at: Option<Timestamp>,
}

impl DealFilter {
    /// Filter for the buyer-facing active listing.
    pub fn active(now: Timestamp) -> Self {
        Self {
            active_at: Some(now),
            ..Default::default()
        }
    }

    /// Narrows the filter to the deals `actor` may read.
    ///
    /// Returns `None` when nothing can match, e.g. a stranger asking for
    /// another seller's pending deals.
    pub fn visible_to(mut self, actor: &Actor) -> Option<Self> {
        if actor.is_admin() || self.seller_id.is_some_and(|id| actor.is(id)) {
            return Some(self);
        }

        match self.status {
            Some(DealStatus::Approved) => Some(self),
            Some(_) => None,
            None => {
                self.status = Some(DealStatus::Approved);
                Some(self)
            }
        }
    }

    /// In-memory evaluation of the filter.
    pub fn matches(&self, deal: &BestDeal) -> bool {
        self.seller_id.is_none_or(|id| id == deal.seller_id)
            && self.product_id.is_none_or(|id| id == deal.product_id)
            && self.status.is_none_or(|status| status == deal.status)
            && self.active_at.is_none_or(|now| deal.is_active_at(now))
    }
}

/// Summary columns of a deal, used by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DealFacet {
    pub status: DealStatus,
    pub created_at: Timestamp,
}

/// Creation payload of a best deal.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewDealInput {
    /// Required when an admin creates a deal on a seller's behalf.
    pub seller_id: Option<Uuid>,
    pub product_id: Uuid,
    #[validate(custom(function = "positive_decimal"))]
    #[cfg_attr(feature = "schema", schemars(with = "String"))]
    pub offer_price: BigDecimal,
    pub validity: Option<Timestamp>,
}

/// Admin approval or rejection of a deal.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct DealDecisionInput {
    /// `approved` or `rejected`.
    #[validate(length(min = 1, max = 32))]
    pub status: String,
    #[validate(length(max = 1000))]
    pub admin_note: Option<String>,
}

/// Owner edit of a deal's commercial terms.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct DealEditInput {
    #[validate(custom(function = "positive_decimal"))]
    #[cfg_attr(feature = "schema", schemars(with = "String"))]
    pub offer_price: BigDecimal,
    /// New expiry. `None` removes the expiry.
    pub validity: Option<Timestamp>,
}

/// Distinguishes a fresh record from one that already existed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome<T> {
    Created(T),
    AlreadyExisted(T),
}

impl<T> CreateOutcome<T> {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    pub fn get(&self) -> &T {
        match self {
            Self::Created(value) | Self::AlreadyExisted(value) => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Created(value) | Self::AlreadyExisted(value) => value,
        }
    }
}

/// Result of an admin decision.
#[derive(Debug, Clone)]
pub struct DecisionOutcome {
    pub deal: BestDeal,
    /// `false` when the decision matched the stored state and nothing was written.
    pub changed: bool,
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;

    use super::*;

    fn deal(status: DealStatus, validity: Option<Timestamp>) -> BestDeal {
        let now = Timestamp::now();
        BestDeal {
            id: Uuid::now_v7(),
            product_id: Uuid::now_v7(),
            seller_id: Uuid::now_v7(),
            created_by: Uuid::now_v7(),
            offer_price: BigDecimal::from(100),
            validity,
            status,
            admin_note: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn active_requires_approval_and_unexpired_validity() {
        let now = Timestamp::now();
        let past = now.checked_sub(1.hour()).ok();
        let future = now.checked_add(1.hour()).ok();

        assert!(deal(DealStatus::Approved, None).is_active_at(now));
        assert!(deal(DealStatus::Approved, future).is_active_at(now));
        assert!(deal(DealStatus::Approved, Some(now)).is_active_at(now));
        assert!(!deal(DealStatus::Approved, past).is_active_at(now));
        assert!(!deal(DealStatus::Pending, None).is_active_at(now));
        assert!(!deal(DealStatus::Rejected, future).is_active_at(now));
    }

    #[test]
    fn filter_applies_active_predicate() {
        let now = Timestamp::now();
        let filter = DealFilter::active(now);

        assert!(filter.matches(&deal(DealStatus::Approved, None)));
        assert!(!filter.matches(&deal(DealStatus::Approved, now.checked_sub(24.hours()).ok())));
    }
}
