//! Product ownership lookups.

use polyhub_core::Result;
use polyhub_core::store::{CatalogStore, ProductOwner};
use polyhub_postgres::query::ProductRepository;
use uuid::Uuid;

use super::{PgMarketStore, store_error};

#[async_trait::async_trait]
impl CatalogStore for PgMarketStore {
    async fn find_product_owner(&self, product_id: Uuid) -> Result<Option<ProductOwner>> {
        let mut conn = self.connection().await?;
        let owner = conn.find_product_owner(product_id).await.map_err(store_error)?;

        Ok(owner.map(|row| ProductOwner {
            product_id: row.product_id,
            product_name: row.product_name,
            owner_id: row.owner_id,
        }))
    }
}
