//! Best deals.

use std::future::Future;

use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::Timestamp;
use uuid::Uuid;

use super::touched;
use crate::model::{BestDeal, NewBestDeal, UpdateBestDeal};
use crate::types::{DealStatus, OffsetPage, OffsetPagination};
use crate::{PgConnection, PgError, PgResult, schema};

/// Best deal listing filters. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestDealFilter {
    pub seller_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub status: Option<DealStatus>,
    /// Keeps only deals approved and still valid at this instant.
    pub active_at: Option<Timestamp>,
}

/// Columns of a best deal needed for dashboard rollups.
#[derive(Debug, Clone, PartialEq, Queryable)]
pub struct BestDealFacet {
    pub status: DealStatus,
    pub created_at: jiff_diesel::Timestamp,
}

pub trait BestDealRepository {
    fn create_best_deal(
        &mut self,
        new_deal: NewBestDeal,
    ) -> impl Future<Output = PgResult<BestDeal>> + Send;

    fn find_best_deal(
        &mut self,
        deal_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<BestDeal>>> + Send;

    /// Oldest deal a seller has on a product.
    fn find_best_deal_for(
        &mut self,
        product_id: Uuid,
        seller_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<BestDeal>>> + Send;

    fn update_best_deal(
        &mut self,
        deal_id: Uuid,
        updates: UpdateBestDeal,
    ) -> impl Future<Output = PgResult<BestDeal>> + Send;

    fn delete_best_deal(&mut self, deal_id: Uuid) -> impl Future<Output = PgResult<bool>> + Send;

    /// Newest first.
    fn list_best_deals(
        &mut self,
        filter: BestDealFilter,
        pagination: OffsetPagination,
    ) -> impl Future<Output = PgResult<OffsetPage<BestDeal>>> + Send;

    fn best_deal_facets(&mut self) -> impl Future<Output = PgResult<Vec<BestDealFacet>>> + Send;
}

fn filtered_deals(filter: BestDealFilter) -> schema::best_deals::BoxedQuery<'static, Pg> {
    use schema::best_deals::{self, dsl};

    let mut query = best_deals::table.into_boxed();

    if let Some(seller_id) = filter.seller_id {
        query = query.filter(dsl::seller_id.eq(seller_id));
    }
    if let Some(product_id) = filter.product_id {
        query = query.filter(dsl::product_id.eq(product_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(dsl::status.eq(status));
    }
    if let Some(now) = filter.active_at {
        let now = jiff_diesel::Timestamp::from(now);
        query = query
            .filter(dsl::status.eq(DealStatus::Approved))
            .filter(dsl::validity.is_null().or(dsl::validity.ge(now)));
    }

    query
}

impl BestDealRepository for PgConnection {
    async fn create_best_deal(&mut self, new_deal: NewBestDeal) -> PgResult<BestDeal> {
        use schema::best_deals;

        diesel::insert_into(best_deals::table)
            .values(&new_deal)
            .returning(BestDeal::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_best_deal(&mut self, deal_id: Uuid) -> PgResult<Option<BestDeal>> {
        use schema::best_deals::{self, dsl};

        best_deals::table
            .filter(dsl::id.eq(deal_id))
            .select(BestDeal::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_best_deal_for(
        &mut self,
        product_id: Uuid,
        seller_id: Uuid,
    ) -> PgResult<Option<BestDeal>> {
        use schema::best_deals::{self, dsl};

        best_deals::table
            .filter(dsl::product_id.eq(product_id))
            .filter(dsl::seller_id.eq(seller_id))
            .order(dsl::created_at.asc())
            .select(BestDeal::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn update_best_deal(
        &mut self,
        deal_id: Uuid,
        mut updates: UpdateBestDeal,
    ) -> PgResult<BestDeal> {
        use schema::best_deals::{self, dsl};

        diesel::update(best_deals::table.filter(dsl::id.eq(deal_id)))
            .set((&updates, touched(dsl::updated_at)))
            .returning(BestDeal::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn delete_best_deal(&mut self, deal_id: Uuid) -> PgResult<bool> {
        use schema::best_deals::{self, dsl};

        let deleted = diesel::delete(best_deals::table.filter(dsl::id.eq(deal_id)))
            .execute(self)
            .await?;

        Ok(deleted > 0)
    }

    async fn list_best_deals(
        &mut self,
        filter: BestDealFilter,
        pagination: OffsetPagination,
    ) -> PgResult<OffsetPage<BestDeal>> {
        use schema::best_deals::dsl;

        let total: i64 = filtered_deals(filter).count().get_result(self).await?;
        let items = filtered_deals(filter)
            .order((dsl::created_at.desc(), dsl::id.desc()))
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(BestDeal::as_select())
            .load(self)
            .await?;

        Ok(OffsetPage::new(items, total))
    }

    async fn best_deal_facets(&mut self) -> PgResult<Vec<BestDealFacet>> {
        use schema::best_deals::{self, dsl};

        best_deals::table
            .select((dsl::status, dsl::created_at))
            .load(self)
            .await
            .map_err(PgError::from)
    }
}
