//! Persistence contracts consumed by the lifecycle managers.
//!
//! Implementations map their own failures into [`Error`](crate::Error):
//! a compare-and-swap miss on a quote request becomes
//! [`ErrorKind::Conflict`](crate::ErrorKind::Conflict), anything else
//! infrastructural becomes [`ErrorKind::Internal`](crate::ErrorKind::Internal).

use uuid::Uuid;

use crate::Result;
use crate::deal::{BestDeal, DealChanges, DealFacet, DealFilter, NewDealRecord};
use crate::quote::{
    NewQuoteRecord, QuoteFacet, QuoteFilter, QuoteRequest, QuoteWithSeller, SellerResponse,
    StatusEntry,
};
use crate::types::PageRequest;

/// Product reference resolved to its owning account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductOwner {
    pub product_id: Uuid,
    pub product_name: String,
    /// The account recorded as `created_by` on the product.
    pub owner_id: Uuid,
}

#[async_trait::async_trait]
pub trait QuoteStore: Send + Sync {
    /// Persists a new request with version `1`.
    async fn insert_quote(&self, record: NewQuoteRecord) -> Result<QuoteRequest>;

    async fn find_quote(&self, id: Uuid) -> Result<Option<QuoteRequest>>;

    /// Loads a request joined with its resolved seller account.
    async fn find_quote_with_seller(&self, id: Uuid) -> Result<Option<QuoteWithSeller>>;

    /// Appends `entry` and bumps the version, but only if the stored version
    /// still equals `expected_version`.
    async fn append_status(
        &self,
        id: Uuid,
        expected_version: i64,
        entry: StatusEntry,
    ) -> Result<QuoteRequest>;

    /// Replaces the seller response. Leaves status and version untouched.
    async fn save_seller_response(&self, id: Uuid, response: SellerResponse)
    -> Result<QuoteRequest>;

    /// Hard-deletes a request and its history. Returns `false` if nothing matched.
    async fn delete_quote(&self, id: Uuid) -> Result<bool>;

    /// Returns one page of matching requests, newest first, and the total match count.
    async fn list_quotes(
        &self,
        filter: &QuoteFilter,
        page: PageRequest,
    ) -> Result<(Vec<QuoteRequest>, u64)>;

    /// Returns the summary columns of every matching request.
    async fn quote_facets(&self, filter: &QuoteFilter) -> Result<Vec<QuoteFacet>>;
}

#[async_trait::async_trait]
pub trait DealStore: Send + Sync {
    async fn insert_deal(&self, record: NewDealRecord) -> Result<BestDeal>;

    async fn find_deal(&self, id: Uuid) -> Result<Option<BestDeal>>;

    /// Looks up the deal a seller already has on a product.
    async fn find_deal_for(&self, product_id: Uuid, seller_id: Uuid) -> Result<Option<BestDeal>>;

    async fn update_deal(&self, id: Uuid, changes: DealChanges) -> Result<BestDeal>;

    async fn delete_deal(&self, id: Uuid) -> Result<bool>;

    /// Returns one page of matching deals, newest first, and the total match count.
    async fn list_deals(
        &self,
        filter: &DealFilter,
        page: PageRequest,
    ) -> Result<(Vec<BestDeal>, u64)>;

    /// Returns the summary columns of every deal.
    async fn deal_facets(&self) -> Result<Vec<DealFacet>>;
}

#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_product_owner(&self, product_id: Uuid) -> Result<Option<ProductOwner>>;
}
