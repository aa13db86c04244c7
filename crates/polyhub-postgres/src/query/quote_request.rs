//! Quote requests and their status history.

use std::collections::HashMap;
use std::future::Future;

use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl};
use jiff::Timestamp;
use uuid::Uuid;

use super::{contains_pattern, touched};
use crate::model::{
    Account, NewQuoteRequest, NewQuoteStatusEntry, QuoteRequest, QuoteRequestWithHistory,
    QuoteStatusEntry,
};
use crate::types::{OffsetPage, OffsetPagination, QuoteStatus, QuoteType};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Quote request listing filters. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteRequestFilter {
    pub request_type: Option<QuoteType>,
    pub status: Option<QuoteStatus>,
    pub buyer_id: Option<Uuid>,
    pub seller_id: Option<Uuid>,
    /// Buyer or seller.
    pub participant_id: Option<Uuid>,
    /// Matched case-insensitively against the buyer message and every
    /// status history message.
    pub search: Option<String>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
}

/// Columns of a quote request needed for summaries and rollups.
#[derive(Debug, Clone, PartialEq, Queryable)]
pub struct QuoteRequestFacet {
    pub status: QuoteStatus,
    pub request_type: QuoteType,
    pub delivery_date: Option<jiff_diesel::Date>,
    pub delivery_deadline: Option<jiff_diesel::Date>,
    pub created_at: jiff_diesel::Timestamp,
}

pub trait QuoteRequestRepository {
    /// Inserts the request with version `1` and its first history entry.
    fn create_quote_request(
        &mut self,
        new_quote: NewQuoteRequest,
        initial: NewQuoteStatusEntry,
    ) -> impl Future<Output = PgResult<QuoteRequestWithHistory>> + Send;

    fn find_quote_request(
        &mut self,
        quote_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<QuoteRequestWithHistory>>> + Send;

    /// Loads a request joined with its seller account. The account is `None`
    /// when the seller row is missing.
    fn find_quote_request_with_seller(
        &mut self,
        quote_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<(QuoteRequestWithHistory, Option<Account>)>>> + Send;

    /// Appends `entry` and bumps the version if the stored version still
    /// equals `expected_version`.
    ///
    /// Fails with [`PgError::Conflict`] when the version moved and with a
    /// `NotFound` query error when the request does not exist.
    fn append_quote_status(
        &mut self,
        quote_id: Uuid,
        expected_version: i64,
        entry: NewQuoteStatusEntry,
    ) -> impl Future<Output = PgResult<QuoteRequestWithHistory>> + Send;

    /// Replaces the seller response. Status and version are left untouched.
    fn save_seller_response(
        &mut self,
        quote_id: Uuid,
        response: serde_json::Value,
    ) -> impl Future<Output = PgResult<QuoteRequestWithHistory>> + Send;

    /// Deletes the request; history rows cascade. Returns `false` if it did not exist.
    fn delete_quote_request(&mut self, quote_id: Uuid)
    -> impl Future<Output = PgResult<bool>> + Send;

    /// Newest first.
    fn list_quote_requests(
        &mut self,
        filter: &QuoteRequestFilter,
        pagination: OffsetPagination,
    ) -> impl Future<Output = PgResult<OffsetPage<QuoteRequestWithHistory>>> + Send;

    /// Facets of every request matching `filter`.
    fn quote_request_facets(
        &mut self,
        filter: &QuoteRequestFilter,
    ) -> impl Future<Output = PgResult<Vec<QuoteRequestFacet>>> + Send;
}

fn filtered_quotes(filter: &QuoteRequestFilter) -> schema::quote_requests::BoxedQuery<'static, Pg> {
    use schema::quote_requests::{self, dsl};
    use schema::quote_status_entries;

    let mut query = quote_requests::table.into_boxed();

    if let Some(request_type) = filter.request_type {
        query = query.filter(dsl::request_type.eq(request_type));
    }
    if let Some(status) = filter.status {
        query = query.filter(dsl::status.eq(status));
    }
    if let Some(buyer_id) = filter.buyer_id {
        query = query.filter(dsl::buyer_id.eq(buyer_id));
    }
    if let Some(seller_id) = filter.seller_id {
        query = query.filter(dsl::seller_id.eq(seller_id));
    }
    if let Some(account_id) = filter.participant_id {
        query = query.filter(dsl::buyer_id.eq(account_id).or(dsl::seller_id.eq(account_id)));
    }
    if let Some(from) = filter.created_from {
        query = query.filter(dsl::created_at.ge(jiff_diesel::Timestamp::from(from)));
    }
    if let Some(to) = filter.created_to {
        query = query.filter(dsl::created_at.le(jiff_diesel::Timestamp::from(to)));
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = contains_pattern(search);
        let in_history = quote_status_entries::table
            .filter(quote_status_entries::message.ilike(pattern.clone()))
            .select(quote_status_entries::quote_id);
        query = query.filter(dsl::id.eq_any(in_history).or(dsl::message.ilike(pattern)));
    }

    query
}

/// Loads the ordered history of every listed request.
async fn load_histories(
    conn: &mut PgConnection,
    quotes: Vec<QuoteRequest>,
) -> PgResult<Vec<QuoteRequestWithHistory>> {
    use schema::quote_status_entries::{self, dsl};

    if quotes.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = quotes.iter().map(|quote| quote.id).collect();
    let entries: Vec<QuoteStatusEntry> = quote_status_entries::table
        .filter(dsl::quote_id.eq_any(ids))
        .order((dsl::quote_id.asc(), dsl::position.asc()))
        .select(QuoteStatusEntry::as_select())
        .load(conn)
        .await?;

    let mut grouped: HashMap<Uuid, Vec<QuoteStatusEntry>> = HashMap::new();
    for entry in entries {
        grouped.entry(entry.quote_id).or_default().push(entry);
    }

    Ok(quotes
        .into_iter()
        .map(|quote| QuoteRequestWithHistory {
            history: grouped.remove(&quote.id).unwrap_or_default(),
            quote,
        })
        .collect())
}

async fn load_history(
    conn: &mut PgConnection,
    quote: QuoteRequest,
) -> PgResult<QuoteRequestWithHistory> {
    use schema::quote_status_entries::{self, dsl};

    let history = quote_status_entries::table
        .filter(dsl::quote_id.eq(quote.id))
        .order(dsl::position.asc())
        .select(QuoteStatusEntry::as_select())
        .load(conn)
        .await?;

    Ok(QuoteRequestWithHistory { quote, history })
}

impl QuoteRequestRepository for PgConnection {
    async fn create_quote_request(
        &mut self,
        new_quote: NewQuoteRequest,
        initial: NewQuoteStatusEntry,
    ) -> PgResult<QuoteRequestWithHistory> {
        use schema::{quote_requests, quote_status_entries};

        let created = self
            .transaction(|conn| {
                Box::pin(async move {
                    let quote: QuoteRequest = diesel::insert_into(quote_requests::table)
                        .values(&new_quote)
                        .returning(QuoteRequest::as_returning())
                        .get_result(conn)
                        .await?;

                    let entry = initial.at_position(quote.id, 0);
                    diesel::insert_into(quote_status_entries::table)
                        .values(&entry)
                        .execute(conn)
                        .await?;

                    Ok::<_, PgError>(QuoteRequestWithHistory {
                        quote,
                        history: vec![entry],
                    })
                })
            })
            .await?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            quote_id = %created.quote.id,
            request_type = %created.quote.request_type,
            "quote request created"
        );

        Ok(created)
    }

    async fn find_quote_request(
        &mut self,
        quote_id: Uuid,
    ) -> PgResult<Option<QuoteRequestWithHistory>> {
        use schema::quote_requests::{self, dsl};

        let quote = quote_requests::table
            .filter(dsl::id.eq(quote_id))
            .select(QuoteRequest::as_select())
            .first(self)
            .await
            .optional()?;

        match quote {
            Some(quote) => Ok(Some(load_history(self, quote).await?)),
            None => Ok(None),
        }
    }

    async fn find_quote_request_with_seller(
        &mut self,
        quote_id: Uuid,
    ) -> PgResult<Option<(QuoteRequestWithHistory, Option<Account>)>> {
        use schema::{accounts, quote_requests};

        let row: Option<(QuoteRequest, Option<Account>)> = quote_requests::table
            .left_join(accounts::table.on(accounts::id.eq(quote_requests::seller_id)))
            .filter(quote_requests::id.eq(quote_id))
            .select((QuoteRequest::as_select(), Option::<Account>::as_select()))
            .first(self)
            .await
            .optional()?;

        match row {
            Some((quote, seller)) => Ok(Some((load_history(self, quote).await?, seller))),
            None => Ok(None),
        }
    }

    async fn append_quote_status(
        &mut self,
        quote_id: Uuid,
        expected_version: i64,
        entry: NewQuoteStatusEntry,
    ) -> PgResult<QuoteRequestWithHistory> {
        use schema::{quote_requests, quote_status_entries};

        self.transaction(|conn| {
            Box::pin(async move {
                let swapped: Option<QuoteRequest> = diesel::update(
                    quote_requests::table
                        .filter(quote_requests::id.eq(quote_id))
                        .filter(quote_requests::version.eq(expected_version)),
                )
                .set((
                    quote_requests::status.eq(entry.status),
                    quote_requests::version.eq(quote_requests::version + 1),
                    touched(quote_requests::updated_at),
                ))
                .returning(QuoteRequest::as_returning())
                .get_result(conn)
                .await
                .optional()?;

                let Some(quote) = swapped else {
                    let exists: bool = diesel::select(diesel::dsl::exists(
                        quote_requests::table.filter(quote_requests::id.eq(quote_id)),
                    ))
                    .get_result(conn)
                    .await?;

                    if !exists {
                        return Err(PgError::Query(diesel::result::Error::NotFound));
                    }

                    tracing::debug!(
                        target: TRACING_TARGET_QUERY,
                        quote_id = %quote_id,
                        expected_version,
                        "quote status compare-and-swap lost"
                    );
                    return Err(PgError::Conflict(
                        format!("quote request {quote_id} is no longer at version {expected_version}")
                            .into(),
                    ));
                };

                let position: i64 = quote_status_entries::table
                    .filter(quote_status_entries::quote_id.eq(quote_id))
                    .count()
                    .get_result(conn)
                    .await?;
                let position = i32::try_from(position)
                    .map_err(|_| PgError::Unexpected("status history is too long".into()))?;

                diesel::insert_into(quote_status_entries::table)
                    .values(&entry.at_position(quote_id, position))
                    .execute(conn)
                    .await?;

                load_history(conn, quote).await
            })
        })
        .await
    }

    async fn save_seller_response(
        &mut self,
        quote_id: Uuid,
        response: serde_json::Value,
    ) -> PgResult<QuoteRequestWithHistory> {
        use schema::quote_requests::{self, dsl};

        let quote = diesel::update(quote_requests::table.filter(dsl::id.eq(quote_id)))
            .set((
                dsl::seller_response.eq(Some(response)),
                touched(dsl::updated_at),
            ))
            .returning(QuoteRequest::as_returning())
            .get_result(self)
            .await?;

        load_history(self, quote).await
    }

    async fn delete_quote_request(&mut self, quote_id: Uuid) -> PgResult<bool> {
        use schema::quote_requests::{self, dsl};

        let deleted = diesel::delete(quote_requests::table.filter(dsl::id.eq(quote_id)))
            .execute(self)
            .await?;

        Ok(deleted > 0)
    }

    async fn list_quote_requests(
        &mut self,
        filter: &QuoteRequestFilter,
        pagination: OffsetPagination,
    ) -> PgResult<OffsetPage<QuoteRequestWithHistory>> {
        use schema::quote_requests::dsl;

        let total: i64 = filtered_quotes(filter).count().get_result(self).await?;
        let quotes: Vec<QuoteRequest> = filtered_quotes(filter)
            .order((dsl::created_at.desc(), dsl::id.desc()))
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(QuoteRequest::as_select())
            .load(self)
            .await?;

        let items = load_histories(self, quotes).await?;
        Ok(OffsetPage::new(items, total))
    }

    async fn quote_request_facets(
        &mut self,
        filter: &QuoteRequestFilter,
    ) -> PgResult<Vec<QuoteRequestFacet>> {
        use schema::quote_requests::dsl;

        filtered_quotes(filter)
            .select((
                dsl::status,
                dsl::request_type,
                dsl::delivery_date,
                dsl::delivery_deadline,
                dsl::created_at,
            ))
            .load(self)
            .await
            .map_err(PgError::from)
    }
}
