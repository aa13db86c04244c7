//! Best deal request types.
//!
//! Create, decision and edit payloads are the domain inputs themselves; see
//! [`polyhub_core::deal`].

use polyhub_core::deal::{DealFilter, DealStatus};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query parameters for listing best deals.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DealQuery {
    pub seller_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub status: Option<DealStatus>,
}

impl From<DealQuery> for DealFilter {
    fn from(query: DealQuery) -> Self {
        Self {
            seller_id: query.seller_id,
            product_id: query.product_id,
            status: query.status,
            active_at: None,
        }
    }
}
