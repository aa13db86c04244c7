//! Best deal response types.

use bigdecimal::BigDecimal;
use jiff::Timestamp;
use polyhub_core::deal::{self, DealStatus};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a best deal in API responses.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BestDeal {
    /// Unique deal identifier.
    pub id: Uuid,
    /// Product the offer applies to.
    pub product_id: Uuid,
    /// Seller making the offer.
    pub seller_id: Uuid,
    /// Account that created the deal, an admin acting for the seller included.
    pub created_by: Uuid,
    /// Offered unit price.
    #[schemars(with = "String")]
    pub offer_price: BigDecimal,
    /// End of the offer, open-ended when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validity: Option<Timestamp>,
    /// Admin review state.
    pub status: DealStatus,
    /// Note left by the reviewing admin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_note: Option<String>,
    /// Whether the deal is approved and still within its validity.
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<deal::BestDeal> for BestDeal {
    fn from(deal: deal::BestDeal) -> Self {
        Self {
            is_active: deal.is_active_at(Timestamp::now()),
            id: deal.id,
            product_id: deal.product_id,
            seller_id: deal.seller_id,
            created_by: deal.created_by,
            offer_price: deal.offer_price,
            validity: deal.validity,
            status: deal.status,
            admin_note: deal.admin_note,
            created_at: deal.created_at,
            updated_at: deal.updated_at,
        }
    }
}

/// Result of a deal creation request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DealCreated {
    /// `false` when the seller already had a deal on the product and it was
    /// returned unchanged.
    pub created: bool,
    pub deal: BestDeal,
}

impl From<deal::CreateOutcome<deal::BestDeal>> for DealCreated {
    fn from(outcome: deal::CreateOutcome<deal::BestDeal>) -> Self {
        Self {
            created: outcome.is_created(),
            deal: outcome.into_inner().into(),
        }
    }
}

/// Result of an admin decision.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DealDecision {
    /// `false` when the decision repeated the stored status and note.
    pub changed: bool,
    pub deal: BestDeal,
}

impl From<deal::DecisionOutcome> for DealDecision {
    fn from(outcome: deal::DecisionOutcome) -> Self {
        Self {
            changed: outcome.changed,
            deal: outcome.deal.into(),
        }
    }
}
