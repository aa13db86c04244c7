//! Repository traits implemented for [`PgConnection`](crate::PgConnection).
//!
//! Every repository method takes `&mut self` and runs on the connection it
//! is called on, so handlers can group calls inside [`PgConn::transaction`].
//!
//! [`PgConn::transaction`]: crate::PgConn::transaction

mod account;
mod account_notification;
mod best_deal;
mod catalog;
mod quote_request;

pub use account::AccountRepository;
pub use account_notification::AccountNotificationRepository;
pub use best_deal::{BestDealFacet, BestDealFilter, BestDealRepository};
pub use catalog::{ProductFilter, ProductOwnerRow, ProductRepository, TaxonomyRepository};
pub use quote_request::{QuoteRequestFacet, QuoteRequestFilter, QuoteRequestRepository};

use diesel::dsl::{Eq, now};
use diesel::expression::Expression;
use diesel::prelude::*;
use diesel::sql_types::Timestamptz;

/// `updated_at = CURRENT_TIMESTAMP`.
///
/// `created_at` is filled by the column default, so both sides of the
/// `*_updated_after_created` checks come from the database clock.
pub(crate) fn touched<C>(updated_at: C) -> Eq<C, now>
where
    C: Expression<SqlType = Timestamptz>,
{
    updated_at.eq(now)
}

/// Escapes `LIKE` wildcards and wraps the text for a substring match.
pub(crate) fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use diesel::debug_query;
    use diesel::pg::Pg;
    use uuid::Uuid;

    use super::*;
    use crate::schema::{best_deals, quote_requests};

    #[test]
    fn updates_stamp_with_the_database_clock() {
        let swap = diesel::update(quote_requests::table.filter(quote_requests::id.eq(Uuid::nil())))
            .set((
                quote_requests::version.eq(quote_requests::version + 1),
                touched(quote_requests::updated_at),
            ));
        let sql = debug_query::<Pg, _>(&swap).to_string();
        assert!(sql.contains("\"updated_at\" = CURRENT_TIMESTAMP"), "{sql}");

        let review = diesel::update(best_deals::table).set(touched(best_deals::updated_at));
        assert!(debug_query::<Pg, _>(&review).to_string().contains("CURRENT_TIMESTAMP"));
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(contains_pattern("pp"), "%pp%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
