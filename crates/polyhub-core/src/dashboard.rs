//! Admin dashboard rollups behind a TTL cache.

use std::collections::BTreeMap;
use std::time::Duration;

use jiff::civil::Date;
use jiff::{Timestamp, ToSpan};
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::context::utc_date;
use crate::deal::{DealFacet, DealStatus};
use crate::quote::{QuoteFacet, QuoteFilter, QuoteStatus, QuoteType};
use crate::types::Actor;
use crate::{Error, MarketContext, Result, TRACING_TARGET_DASHBOARD};

/// Cache key of the admin snapshot.
const SNAPSHOT_KEY: &str = "dashboard:snapshot";

/// Number of calendar months in the histogram, current month included.
const HISTOGRAM_MONTHS: i32 = 12;

/// String key-value cache with per-entry expiry.
#[async_trait::async_trait]
pub trait DashboardCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()>;
}

/// Records created in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCount {
    /// `YYYY-MM`.
    pub month: String,
    pub quotes: u64,
    pub deals: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub total_quotes: u64,
    pub total_deals: u64,
    pub quotes_by_status: BTreeMap<QuoteStatus, u64>,
    pub quotes_by_type: BTreeMap<QuoteType, u64>,
    pub deals_by_status: BTreeMap<DealStatus, u64>,
    /// Oldest month first.
    pub monthly: Vec<MonthlyCount>,
    pub generated_at: Timestamp,
}

impl DashboardSnapshot {
    /// Folds facets into a snapshot as of `now`.
    pub fn compute(quotes: &[QuoteFacet], deals: &[DealFacet], now: Timestamp) -> Self {
        let mut quotes_by_status: BTreeMap<_, u64> = QuoteStatus::iter().map(|s| (s, 0)).collect();
        let mut quotes_by_type: BTreeMap<_, u64> = QuoteType::iter().map(|t| (t, 0)).collect();
        let mut deals_by_status: BTreeMap<_, u64> = DealStatus::iter().map(|s| (s, 0)).collect();

        for facet in quotes {
            *quotes_by_status.entry(facet.status).or_default() += 1;
            *quotes_by_type.entry(facet.request_type).or_default() += 1;
        }

        for facet in deals {
            *deals_by_status.entry(facet.status).or_default() += 1;
        }

        let current = utc_date(now).first_of_month();
        let mut months: BTreeMap<Date, MonthlyCount> = (0..HISTOGRAM_MONTHS)
            .filter_map(|back| current.checked_sub(back.months()).ok())
            .map(|month| (month, MonthlyCount::empty(month)))
            .collect();

        for facet in quotes {
            let month = utc_date(facet.created_at).first_of_month();
            if let Some(count) = months.get_mut(&month) {
                count.quotes += 1;
            }
        }

        for facet in deals {
            let month = utc_date(facet.created_at).first_of_month();
            if let Some(count) = months.get_mut(&month) {
                count.deals += 1;
            }
        }

        Self {
            total_quotes: quotes.len() as u64,
            total_deals: deals.len() as u64,
            quotes_by_status,
            quotes_by_type,
            deals_by_status,
            monthly: months.into_values().collect(),
            generated_at: now,
        }
    }
}

impl MonthlyCount {
    fn empty(month: Date) -> Self {
        Self {
            month: format!("{:04}-{:02}", month.year(), month.month()),
            quotes: 0,
            deals: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardService {
    ctx: MarketContext,
}

impl DashboardService {
    pub(crate) fn new(ctx: MarketContext) -> Self {
        Self { ctx }
    }

    /// Returns the cached snapshot, recomputing it on a miss.
    ///
    /// Cache failures are logged and never fail the request.
    #[tracing::instrument(skip_all, fields(account_id = %actor.account_id))]
    pub async fn snapshot(&self, actor: &Actor) -> Result<DashboardSnapshot> {
        if !actor.is_admin() {
            return Err(Error::authorization().with_message("the dashboard is admin only"));
        }

        match self.ctx.cache().get(SNAPSHOT_KEY).await {
            Ok(Some(cached)) => match serde_json::from_str(&cached) {
                Ok(snapshot) => {
                    tracing::debug!(target: TRACING_TARGET_DASHBOARD, "dashboard cache hit");
                    return Ok(snapshot);
                }
                Err(error) => {
                    tracing::warn!(
                        target: TRACING_TARGET_DASHBOARD,
                        error = %error,
                        "discarding unreadable dashboard cache entry",
                    );
                }
            },
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET_DASHBOARD,
                    error = %error,
                    "dashboard cache read failed",
                );
            }
        }

        let quotes = self
            .ctx
            .quote_store()
            .quote_facets(&QuoteFilter::default())
            .await?;
        let deals = self.ctx.deal_store().deal_facets().await?;
        let snapshot = DashboardSnapshot::compute(&quotes, &deals, Timestamp::now());

        tracing::info!(
            target: TRACING_TARGET_DASHBOARD,
            quotes = snapshot.total_quotes,
            deals = snapshot.total_deals,
            "dashboard snapshot computed",
        );

        match serde_json::to_string(&snapshot) {
            Ok(serialized) => {
                let ttl = self.ctx.policy().dashboard_cache_ttl;
                if let Err(error) = self.ctx.cache().set(SNAPSHOT_KEY, serialized, ttl).await {
                    tracing::warn!(
                        target: TRACING_TARGET_DASHBOARD,
                        error = %error,
                        "dashboard cache write failed",
                    );
                }
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET_DASHBOARD,
                    error = %error,
                    "failed to serialize dashboard snapshot",
                );
            }
        }

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;

    use super::*;
    use crate::ErrorKind;
    use crate::deal::NewDealInput;
    use crate::mock::MemoryStore;
    use crate::types::AccountRole;

    #[test]
    fn histogram_covers_twelve_months_and_skips_older_records() {
        let now: Timestamp = "2026-03-15T12:00:00Z".parse().unwrap();
        let facet = |at: &str, status| QuoteFacet {
            status,
            request_type: QuoteType::ProductQuote,
            delivery_date: None,
            created_at: at.parse().unwrap(),
        };

        let quotes = [
            facet("2026-03-01T00:00:00Z", QuoteStatus::Pending),
            facet("2026-01-20T00:00:00Z", QuoteStatus::Accepted),
            facet("2025-04-02T00:00:00Z", QuoteStatus::Pending),
            facet("2025-03-31T00:00:00Z", QuoteStatus::Pending),
        ];
        let deals = [DealFacet {
            status: DealStatus::Approved,
            created_at: "2026-01-05T00:00:00Z".parse().unwrap(),
        }];

        let snapshot = DashboardSnapshot::compute(&quotes, &deals, now);

        assert_eq!(snapshot.monthly.len(), 12);
        assert_eq!(snapshot.monthly[0].month, "2025-04");
        assert_eq!(snapshot.monthly[11].month, "2026-03");
        assert_eq!(snapshot.monthly[0].quotes, 1);
        assert_eq!(snapshot.monthly[9].quotes, 1);
        assert_eq!(snapshot.monthly[9].deals, 1);
        assert_eq!(snapshot.monthly[11].quotes, 1);

        assert_eq!(snapshot.total_quotes, 4);
        assert_eq!(snapshot.quotes_by_status[&QuoteStatus::Pending], 3);
        assert_eq!(snapshot.quotes_by_status[&QuoteStatus::Shipped], 0);
        assert_eq!(snapshot.deals_by_status[&DealStatus::Approved], 1);
        assert_eq!(snapshot.deals_by_status[&DealStatus::Pending], 0);
    }

    #[tokio::test]
    async fn snapshot_is_admin_only_and_cached() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let ctx = store.context();
        let seller = Actor::seller(store.add_account(AccountRole::Seller, "Seller").await);
        let admin = Actor::admin(store.add_account(AccountRole::Admin, "Admin").await);

        let error = ctx.dashboard().snapshot(&seller).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Authorization);

        let first = ctx.dashboard().snapshot(&admin).await?;
        assert_eq!(first.total_deals, 0);

        let product_id = store.add_product(seller.account_id, "HDPE").await;
        let input = NewDealInput {
            seller_id: None,
            product_id,
            offer_price: BigDecimal::from(10),
            validity: None,
        };
        ctx.best_deals().create(&seller, input).await?;

        let cached = ctx.dashboard().snapshot(&admin).await?;
        assert_eq!(cached, first);

        store.clear_cache().await;
        let fresh = ctx.dashboard().snapshot(&admin).await?;
        assert_eq!(fresh.total_deals, 1);
        Ok(())
    }

    #[tokio::test]
    async fn cache_failures_fall_back_to_recomputation() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let admin = Actor::admin(store.add_account(AccountRole::Admin, "Admin").await);
        store.fail_cache(true);

        let snapshot = store.context().dashboard().snapshot(&admin).await?;
        assert_eq!(snapshot.total_quotes, 0);
        Ok(())
    }
}
