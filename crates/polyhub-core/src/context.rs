//! Explicit dependency container for the lifecycle managers.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use jiff::Timestamp;
use jiff::civil::Date;
use jiff::tz::TimeZone;

use crate::TRACING_TARGET_NOTIFY;
use crate::dashboard::{DashboardCache, DashboardService};
use crate::deal::BestDealManager;
use crate::notify::{NewNotification, NotificationSink};
use crate::quote::QuoteRequestManager;
use crate::store::{CatalogStore, DealStore, QuoteStore};

/// Tunable business rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketPolicy {
    /// Return an approved or rejected deal to `pending` when its owner edits it.
    pub reset_deal_status_on_edit: bool,
    /// Lifetime of a cached dashboard snapshot.
    pub dashboard_cache_ttl: Duration,
}

impl Default for MarketPolicy {
    fn default() -> Self {
        Self {
            reset_deal_status_on_edit: false,
            dashboard_cache_ttl: Duration::from_secs(300),
        }
    }
}

/// Stores, side-effect sinks and policy shared by every operation.
///
/// Built once at startup and cloned into each request.
#[derive(Clone)]
pub struct MarketContext {
    quotes: Arc<dyn QuoteStore>,
    deals: Arc<dyn DealStore>,
    catalog: Arc<dyn CatalogStore>,
    notifications: Arc<dyn NotificationSink>,
    cache: Arc<dyn DashboardCache>,
    policy: MarketPolicy,
}

impl MarketContext {
    pub fn new(
        quotes: Arc<dyn QuoteStore>,
        deals: Arc<dyn DealStore>,
        catalog: Arc<dyn CatalogStore>,
        notifications: Arc<dyn NotificationSink>,
        cache: Arc<dyn DashboardCache>,
    ) -> Self {
        Self {
            quotes,
            deals,
            catalog,
            notifications,
            cache,
            policy: MarketPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MarketPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Quote request lifecycle operations.
    pub fn quote_requests(&self) -> QuoteRequestManager {
        QuoteRequestManager::new(self.clone())
    }

    /// Best deal lifecycle operations.
    pub fn best_deals(&self) -> BestDealManager {
        BestDealManager::new(self.clone())
    }

    /// Admin dashboard rollups.
    pub fn dashboard(&self) -> DashboardService {
        DashboardService::new(self.clone())
    }

    #[inline]
    pub fn policy(&self) -> &MarketPolicy {
        &self.policy
    }

    pub(crate) fn quote_store(&self) -> &dyn QuoteStore {
        self.quotes.as_ref()
    }

    pub(crate) fn deal_store(&self) -> &dyn DealStore {
        self.deals.as_ref()
    }

    pub(crate) fn catalog_store(&self) -> &dyn CatalogStore {
        self.catalog.as_ref()
    }

    pub(crate) fn cache(&self) -> &dyn DashboardCache {
        self.cache.as_ref()
    }

    /// Emits a notification, logging and discarding any failure.
    pub(crate) async fn notify(&self, notification: NewNotification) {
        let account_id = notification.account_id;
        let kind = notification.kind;

        if let Err(error) = self.notifications.emit(notification).await {
            tracing::warn!(
                target: TRACING_TARGET_NOTIFY,
                %account_id,
                kind = %kind,
                error = %error,
                "failed to emit notification",
            );
        }
    }
}

impl fmt::Debug for MarketContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarketContext")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Calendar date of `now` in UTC.
pub(crate) fn utc_date(now: Timestamp) -> Date {
    now.to_zoned(TimeZone::UTC).date()
}
