//! Path parameter types for HTTP handlers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Path parameters for account operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountPathParams {
    /// Unique identifier of the account.
    pub account_id: Uuid,
}

/// Path parameters for product operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPathParams {
    /// Unique identifier of the product.
    pub product_id: Uuid,
}

/// Path parameters for best deal operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DealPathParams {
    /// Unique identifier of the best deal.
    pub deal_id: Uuid,
}

/// Path parameters for quote request operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotePathParams {
    /// Unique identifier of the quote request.
    pub quote_id: Uuid,
}

/// Path parameters for notification operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPathParams {
    /// Unique identifier of the notification.
    pub notification_id: Uuid,
}
