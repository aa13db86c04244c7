//! Postgres-backed implementations of the marketplace store contracts.
//!
//! [`PgMarketStore`] adapts the `polyhub-postgres` repositories to the
//! traits the lifecycle managers in `polyhub-core` consume. Database
//! failures are translated into core errors here so the managers never see
//! a [`PgError`].

mod catalog;
mod convert;
mod dashboard_cache;
mod deals;
mod notifications;
mod quotes;

use std::sync::Arc;

use polyhub_core::dashboard::DashboardCache;
use polyhub_core::notify::NotificationSink;
use polyhub_core::store::{CatalogStore, DealStore, QuoteStore};
use polyhub_core::types::PageRequest;
use polyhub_core::{Error as CoreError, MarketContext, MarketPolicy};
use polyhub_postgres::error::DieselError;
use polyhub_postgres::types::{ConstraintViolation, OffsetPagination, QuoteRequestConstraints};
use polyhub_postgres::{PgClient, PgConn, PgError};

pub use self::convert::{core_role, core_verification, pg_role};
pub use self::dashboard_cache::SnapshotCache;

const TRACING_TARGET: &str = "polyhub_server::service::store";

/// Store adapter over a shared connection pool.
///
/// Every call checks out its own connection, so one adapter serves all of
/// the store traits concurrently.
#[derive(Debug, Clone)]
pub struct PgMarketStore {
    pg_client: PgClient,
}

impl PgMarketStore {
    pub fn new(pg_client: PgClient) -> Self {
        Self { pg_client }
    }

    /// Wires the adapter and the given cache into a [`MarketContext`].
    pub fn into_context(self, cache: SnapshotCache, policy: MarketPolicy) -> MarketContext {
        let store = Arc::new(self);
        let quotes: Arc<dyn QuoteStore> = store.clone();
        let deals: Arc<dyn DealStore> = store.clone();
        let catalog: Arc<dyn CatalogStore> = store.clone();
        let notifications: Arc<dyn NotificationSink> = store;
        let cache: Arc<dyn DashboardCache> = Arc::new(cache);

        MarketContext::new(quotes, deals, catalog, notifications, cache).with_policy(policy)
    }

    async fn connection(&self) -> Result<PgConn, CoreError> {
        self.pg_client.get_connection().await.map_err(store_error)
    }
}

/// Translates a database failure into a core error.
pub(crate) fn store_error(error: PgError) -> CoreError {
    match error {
        PgError::Conflict(reason) => CoreError::conflict().with_message(reason.into_owned()),
        PgError::Query(DieselError::NotFound) => CoreError::not_found(),
        error if still_referenced(&error) => CoreError::conflict()
            .with_message("the record is still referenced by quote requests")
            .with_source(error),
        error if error.is_unique_violation() => CoreError::conflict()
            .with_message("record already exists")
            .with_source(error),
        error if error.is_foreign_key_violation() => CoreError::reference_integrity()
            .with_message("referenced record does not exist")
            .with_source(error),
        error => {
            tracing::error!(target: TRACING_TARGET, error = %error, "store operation failed");
            CoreError::internal()
                .with_message("database operation failed")
                .with_source(error)
        }
    }
}

/// Whether a delete was refused because quote requests point at the row.
fn still_referenced(error: &PgError) -> bool {
    matches!(
        error.constraint_violation(),
        Some(ConstraintViolation::QuoteRequest(
            QuoteRequestConstraints::BestDealReference | QuoteRequestConstraints::ProductReference
        ))
    )
}

pub(crate) fn offset_pagination(page: PageRequest) -> OffsetPagination {
    let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
    OffsetPagination::new(i64::from(page.limit()), offset)
}

pub(crate) fn total_count(total: i64) -> u64 {
    u64::try_from(total).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use polyhub_core::ErrorKind;
    use polyhub_postgres::error::{DatabaseErrorInformation, DatabaseErrorKind};

    use super::*;

    #[test]
    fn conflicts_keep_their_reason() {
        let error = store_error(PgError::Conflict(Cow::Borrowed("version moved")));
        assert_eq!(error.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn missing_rows_are_not_found() {
        let error = store_error(PgError::Query(DieselError::NotFound));
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    struct ForeignKey(&'static str);

    impl DatabaseErrorInformation for ForeignKey {
        fn message(&self) -> &str {
            "violates foreign key constraint"
        }

        fn details(&self) -> Option<&str> {
            None
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            Some("quote_requests")
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            Some(self.0)
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn foreign_key_violation(constraint: &'static str) -> PgError {
        PgError::Query(DieselError::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new(ForeignKey(constraint)),
        ))
    }

    #[test]
    fn referenced_deals_and_products_are_conflicts() {
        for constraint in [
            "quote_requests_best_deal_id_fkey",
            "quote_requests_product_id_fkey",
        ] {
            let error = store_error(foreign_key_violation(constraint));
            assert_eq!(error.kind(), ErrorKind::Conflict);
        }

        let error = store_error(foreign_key_violation("best_deals_seller_id_fkey"));
        assert_eq!(error.kind(), ErrorKind::ReferenceIntegrity);
    }

    #[test]
    fn everything_else_is_internal() {
        let error = store_error(PgError::Unexpected(Cow::Borrowed("boom")));
        assert_eq!(error.kind(), ErrorKind::Internal);
    }

    #[test]
    fn pages_translate_to_offsets() {
        let pagination = offset_pagination(PageRequest::new(3, 20));
        assert_eq!(pagination.limit, 20);
        assert_eq!(pagination.offset, 40);
    }
}
