//! Best deal model.

use bigdecimal::BigDecimal;
use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::best_deals;
use crate::types::DealStatus;

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = best_deals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BestDeal {
    pub id: Uuid,
    pub product_id: Uuid,
    pub seller_id: Uuid,
    pub created_by: Uuid,
    pub offer_price: BigDecimal,
    pub validity: Option<Timestamp>,
    pub status: DealStatus,
    pub admin_note: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Data for creating a best deal. Status defaults to `pending`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = best_deals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewBestDeal {
    pub product_id: Uuid,
    pub seller_id: Uuid,
    pub created_by: Uuid,
    pub offer_price: BigDecimal,
    pub validity: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = best_deals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateBestDeal {
    pub offer_price: Option<BigDecimal>,
    pub validity: Option<Option<Timestamp>>,
    pub status: Option<DealStatus>,
    pub admin_note: Option<Option<String>>,
}
