//! Best deal persistence.

use polyhub_core::Result;
use polyhub_core::deal::{BestDeal, DealChanges, DealFacet, DealFilter, NewDealRecord};
use polyhub_core::store::DealStore;
use polyhub_core::types::PageRequest;
use polyhub_postgres::model::{BestDeal as DealRow, NewBestDeal, UpdateBestDeal};
use polyhub_postgres::query::{BestDealFilter, BestDealRepository};
use uuid::Uuid;

use super::convert::{core_deal_status, pg_deal_status};
use super::{PgMarketStore, offset_pagination, store_error, total_count};

#[async_trait::async_trait]
impl DealStore for PgMarketStore {
    async fn insert_deal(&self, record: NewDealRecord) -> Result<BestDeal> {
        let new_deal = NewBestDeal {
            product_id: record.product_id,
            seller_id: record.seller_id,
            created_by: record.created_by,
            offer_price: record.offer_price,
            validity: record.validity.map(Into::into),
        };

        let mut conn = self.connection().await?;
        let deal = conn.create_best_deal(new_deal).await.map_err(store_error)?;
        Ok(deal_from_row(deal))
    }

    async fn find_deal(&self, id: Uuid) -> Result<Option<BestDeal>> {
        let mut conn = self.connection().await?;
        let deal = conn.find_best_deal(id).await.map_err(store_error)?;
        Ok(deal.map(deal_from_row))
    }

    async fn find_deal_for(&self, product_id: Uuid, seller_id: Uuid) -> Result<Option<BestDeal>> {
        let mut conn = self.connection().await?;
        let deal = conn
            .find_best_deal_for(product_id, seller_id)
            .await
            .map_err(store_error)?;
        Ok(deal.map(deal_from_row))
    }

    async fn update_deal(&self, id: Uuid, changes: DealChanges) -> Result<BestDeal> {
        let updates = UpdateBestDeal {
            offer_price: changes.offer_price,
            validity: changes.validity.map(|validity| validity.map(Into::into)),
            status: changes.status.map(pg_deal_status),
            admin_note: changes.admin_note,
        };

        let mut conn = self.connection().await?;
        let deal = conn.update_best_deal(id, updates).await.map_err(store_error)?;
        Ok(deal_from_row(deal))
    }

    async fn delete_deal(&self, id: Uuid) -> Result<bool> {
        let mut conn = self.connection().await?;
        conn.delete_best_deal(id).await.map_err(store_error)
    }

    async fn list_deals(
        &self,
        filter: &DealFilter,
        page: PageRequest,
    ) -> Result<(Vec<BestDeal>, u64)> {
        let filter = BestDealFilter {
            seller_id: filter.seller_id,
            product_id: filter.product_id,
            status: filter.status.map(pg_deal_status),
            active_at: filter.active_at,
        };

        let mut conn = self.connection().await?;
        let page = conn
            .list_best_deals(filter, offset_pagination(page))
            .await
            .map_err(store_error)?;

        let total = total_count(page.total);
        Ok((page.items.into_iter().map(deal_from_row).collect(), total))
    }

    async fn deal_facets(&self) -> Result<Vec<DealFacet>> {
        let mut conn = self.connection().await?;
        let facets = conn.best_deal_facets().await.map_err(store_error)?;

        Ok(facets
            .into_iter()
            .map(|facet| DealFacet {
                status: core_deal_status(facet.status),
                created_at: facet.created_at.into(),
            })
            .collect())
    }
}

fn deal_from_row(row: DealRow) -> BestDeal {
    BestDeal {
        id: row.id,
        product_id: row.product_id,
        seller_id: row.seller_id,
        created_by: row.created_by,
        offer_price: row.offer_price,
        validity: row.validity.map(Into::into),
        status: core_deal_status(row.status),
        admin_note: row.admin_note,
        created_at: row.created_at.into(),
        updated_at: row.updated_at.into(),
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;
    use jiff::Timestamp;
    use polyhub_core::deal::DealStatus;

    use super::*;

    #[test]
    fn rows_map_onto_deals() {
        let now = Timestamp::now();
        let row = DealRow {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            seller_id: Uuid::new_v4(),
            created_by: Uuid::new_v4(),
            offer_price: BigDecimal::from(1200),
            validity: None,
            status: polyhub_postgres::types::DealStatus::Approved,
            admin_note: Some("looks fair".to_owned()),
            created_at: now.into(),
            updated_at: now.into(),
        };

        let deal = deal_from_row(row);
        assert_eq!(deal.status, DealStatus::Approved);
        assert!(deal.is_active_at(now));
        assert_eq!(deal.admin_note.as_deref(), Some("looks fair"));
    }
}
