//! Quote request persistence.

use polyhub_core::quote::{
    DealQuote, NewQuoteRecord, ProductQuote, QuoteDetails, QuoteFacet, QuoteFilter, QuoteRequest,
    QuoteType, QuoteWithSeller, SellerResponse, StatusEntry, StatusHistory,
};
use polyhub_core::store::QuoteStore;
use polyhub_core::types::PageRequest;
use polyhub_core::{Error as CoreError, Result};
use polyhub_postgres::model::{
    NewQuoteRequest, NewQuoteStatusEntry, QuoteRequest as QuoteRow, QuoteRequestWithHistory,
    QuoteStatusEntry,
};
use polyhub_postgres::query::{QuoteRequestFacet, QuoteRequestFilter, QuoteRequestRepository};
use uuid::Uuid;

use super::convert::{
    account_summary, core_actor, core_quote_status, core_quote_type, pg_actor, pg_quote_status,
    pg_quote_type,
};
use super::{PgMarketStore, offset_pagination, store_error, total_count};

#[async_trait::async_trait]
impl QuoteStore for PgMarketStore {
    async fn insert_quote(&self, record: NewQuoteRecord) -> Result<QuoteRequest> {
        let (new_quote, initial) = new_quote_row(record);
        let mut conn = self.connection().await?;
        let created = conn
            .create_quote_request(new_quote, initial)
            .await
            .map_err(store_error)?;
        quote_from_row(created)
    }

    async fn find_quote(&self, id: Uuid) -> Result<Option<QuoteRequest>> {
        let mut conn = self.connection().await?;
        let row = conn.find_quote_request(id).await.map_err(store_error)?;
        row.map(quote_from_row).transpose()
    }

    async fn find_quote_with_seller(&self, id: Uuid) -> Result<Option<QuoteWithSeller>> {
        let mut conn = self.connection().await?;
        let Some((row, seller)) = conn
            .find_quote_request_with_seller(id)
            .await
            .map_err(store_error)?
        else {
            return Ok(None);
        };

        let Some(seller) = seller else {
            return Err(CoreError::reference_integrity()
                .with_message(format!("seller of quote request {id} no longer exists")));
        };

        Ok(Some(QuoteWithSeller {
            quote: quote_from_row(row)?,
            seller: account_summary(seller),
        }))
    }

    async fn append_status(
        &self,
        id: Uuid,
        expected_version: i64,
        entry: StatusEntry,
    ) -> Result<QuoteRequest> {
        let mut conn = self.connection().await?;
        let updated = conn
            .append_quote_status(id, expected_version, new_entry_row(entry))
            .await
            .map_err(store_error)?;
        quote_from_row(updated)
    }

    async fn save_seller_response(
        &self,
        id: Uuid,
        response: SellerResponse,
    ) -> Result<QuoteRequest> {
        let value = serde_json::to_value(&response).map_err(|e| {
            CoreError::internal()
                .with_message("seller response could not be serialized")
                .with_source(e)
        })?;

        let mut conn = self.connection().await?;
        let updated = conn
            .save_seller_response(id, value)
            .await
            .map_err(store_error)?;
        quote_from_row(updated)
    }

    async fn delete_quote(&self, id: Uuid) -> Result<bool> {
        let mut conn = self.connection().await?;
        conn.delete_quote_request(id).await.map_err(store_error)
    }

    async fn list_quotes(
        &self,
        filter: &QuoteFilter,
        page: PageRequest,
    ) -> Result<(Vec<QuoteRequest>, u64)> {
        let mut conn = self.connection().await?;
        let rows = conn
            .list_quote_requests(&row_filter(filter), offset_pagination(page))
            .await
            .map_err(store_error)?;

        let items = rows
            .items
            .into_iter()
            .map(quote_from_row)
            .collect::<Result<Vec<_>>>()?;
        Ok((items, total_count(rows.total)))
    }

    async fn quote_facets(&self, filter: &QuoteFilter) -> Result<Vec<QuoteFacet>> {
        let mut conn = self.connection().await?;
        let facets = conn
            .quote_request_facets(&row_filter(filter))
            .await
            .map_err(store_error)?;
        Ok(facets.into_iter().map(facet_from_row).collect())
    }
}

fn row_filter(filter: &QuoteFilter) -> QuoteRequestFilter {
    QuoteRequestFilter {
        request_type: filter.request_type.map(pg_quote_type),
        status: filter.status.map(pg_quote_status),
        buyer_id: filter.buyer_id,
        seller_id: filter.seller_id,
        participant_id: filter.participant_id,
        search: filter.search_text().map(str::to_owned),
        created_from: filter.created_from,
        created_to: filter.created_to,
    }
}

fn facet_from_row(facet: QuoteRequestFacet) -> QuoteFacet {
    QuoteFacet {
        status: core_quote_status(facet.status),
        request_type: core_quote_type(facet.request_type),
        delivery_date: facet.delivery_date.or(facet.delivery_deadline).map(Into::into),
        created_at: facet.created_at.into(),
    }
}

fn new_entry_row(entry: StatusEntry) -> NewQuoteStatusEntry {
    NewQuoteStatusEntry {
        status: pg_quote_status(entry.status),
        message: entry.message,
        updated_by: pg_actor(entry.updated_by),
        created_at: entry.date.into(),
    }
}

fn new_quote_row(record: NewQuoteRecord) -> (NewQuoteRequest, NewQuoteStatusEntry) {
    let mut row = match record.details {
        QuoteDetails::ProductQuote(details) => {
            let mut row =
                NewQuoteRequest::product_quote(record.buyer_id, record.seller_id, details.product_id);
            row.quantity = Some(details.quantity);
            row.uom = Some(details.uom);
            row.country = Some(details.country);
            row.destination = Some(details.destination);
            row.delivery_date = details.delivery_date.map(Into::into);
            row.grade_id = details.grade_id;
            row.incoterm_id = details.incoterm_id;
            row.packaging_type_id = details.packaging_type_id;
            row.application = details.application;
            row.price = details.price;
            row.lead_time = details.lead_time;
            row.terms = details.terms;
            row.expected_annual_volume = details.expected_annual_volume;
            row.packaging_size = details.packaging_size;
            row
        }
        QuoteDetails::DealQuote(details) => {
            let mut row =
                NewQuoteRequest::deal_quote(record.buyer_id, record.seller_id, details.best_deal_id);
            row.desired_quantity = Some(details.desired_quantity);
            row.shipping_country = Some(details.shipping_country);
            row.payment_terms = Some(details.payment_terms);
            row.delivery_deadline = Some(details.delivery_deadline.into());
            row
        }
    };

    row.status = pg_quote_status(record.initial.status);
    row.message = record.message;
    (row, new_entry_row(record.initial))
}

fn corrupt_row(id: Uuid, column: &str) -> CoreError {
    CoreError::internal().with_message(format!("quote request {id} is missing column {column}"))
}

fn details_from_row(row: &mut QuoteRow) -> Result<QuoteDetails> {
    let id = row.id;
    let details = match core_quote_type(row.request_type) {
        QuoteType::ProductQuote => QuoteDetails::ProductQuote(ProductQuote {
            product_id: row.product_id.ok_or_else(|| corrupt_row(id, "product_id"))?,
            quantity: row.quantity.take().ok_or_else(|| corrupt_row(id, "quantity"))?,
            uom: row.uom.take().ok_or_else(|| corrupt_row(id, "uom"))?,
            country: row.country.take().ok_or_else(|| corrupt_row(id, "country"))?,
            destination: row.destination.take().ok_or_else(|| corrupt_row(id, "destination"))?,
            delivery_date: row.delivery_date.map(Into::into),
            grade_id: row.grade_id,
            incoterm_id: row.incoterm_id,
            packaging_type_id: row.packaging_type_id,
            application: row.application.take(),
            price: row.price.take(),
            lead_time: row.lead_time.take(),
            terms: row.terms.take(),
            expected_annual_volume: row.expected_annual_volume.take(),
            packaging_size: row.packaging_size.take(),
        }),
        QuoteType::DealQuote => QuoteDetails::DealQuote(DealQuote {
            best_deal_id: row.best_deal_id.ok_or_else(|| corrupt_row(id, "best_deal_id"))?,
            desired_quantity: row
                .desired_quantity
                .take()
                .ok_or_else(|| corrupt_row(id, "desired_quantity"))?,
            shipping_country: row
                .shipping_country
                .take()
                .ok_or_else(|| corrupt_row(id, "shipping_country"))?,
            payment_terms: row
                .payment_terms
                .take()
                .ok_or_else(|| corrupt_row(id, "payment_terms"))?,
            delivery_deadline: row
                .delivery_deadline
                .map(Into::into)
                .ok_or_else(|| corrupt_row(id, "delivery_deadline"))?,
        }),
    };

    Ok(details)
}

fn entry_from_row(entry: QuoteStatusEntry) -> StatusEntry {
    StatusEntry::new(
        core_quote_status(entry.status),
        entry.message,
        core_actor(entry.updated_by),
        entry.created_at.into(),
    )
}

pub(super) fn quote_from_row(row: QuoteRequestWithHistory) -> Result<QuoteRequest> {
    let QuoteRequestWithHistory { quote: mut row, mut history } = row;

    history.sort_by_key(|entry| entry.position);
    let history = StatusHistory::from_entries(history.into_iter().map(entry_from_row).collect())?;

    let seller_response = row
        .seller_response
        .take()
        .map(serde_json::from_value::<SellerResponse>)
        .transpose()
        .map_err(|e| {
            CoreError::internal()
                .with_message(format!("quote request {} has an unreadable seller response", row.id))
                .with_source(e)
        })?;

    let details = details_from_row(&mut row)?;

    Ok(QuoteRequest {
        id: row.id,
        buyer_id: row.buyer_id,
        seller_id: row.seller_id,
        details,
        history,
        message: row.message,
        admin_note: row.admin_note,
        seller_response,
        version: row.version,
        created_at: row.created_at.into(),
        updated_at: row.updated_at.into(),
    })
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;
    use jiff::Timestamp;
    use polyhub_core::quote::{QuoteStatus, StatusActor};

    use super::*;

    fn initial() -> StatusEntry {
        StatusEntry::new(
            QuoteStatus::Pending,
            "Quote requested",
            StatusActor::Buyer,
            Timestamp::UNIX_EPOCH,
        )
    }

    fn stored(new_quote: NewQuoteRequest, entry: NewQuoteStatusEntry) -> QuoteRequestWithHistory {
        let id = Uuid::new_v4();
        let created_at = entry.created_at;
        QuoteRequestWithHistory {
            quote: QuoteRow {
                id,
                request_type: new_quote.request_type,
                buyer_id: new_quote.buyer_id,
                seller_id: new_quote.seller_id,
                product_id: new_quote.product_id,
                quantity: new_quote.quantity,
                uom: new_quote.uom,
                country: new_quote.country,
                destination: new_quote.destination,
                delivery_date: new_quote.delivery_date,
                grade_id: new_quote.grade_id,
                incoterm_id: new_quote.incoterm_id,
                packaging_type_id: new_quote.packaging_type_id,
                application: new_quote.application,
                price: new_quote.price,
                lead_time: new_quote.lead_time,
                terms: new_quote.terms,
                expected_annual_volume: new_quote.expected_annual_volume,
                packaging_size: new_quote.packaging_size,
                best_deal_id: new_quote.best_deal_id,
                desired_quantity: new_quote.desired_quantity,
                shipping_country: new_quote.shipping_country,
                payment_terms: new_quote.payment_terms,
                delivery_deadline: new_quote.delivery_deadline,
                status: new_quote.status,
                version: 1,
                message: new_quote.message,
                admin_note: None,
                seller_response: None,
                created_at,
                updated_at: created_at,
            },
            history: vec![QuoteStatusEntry {
                quote_id: id,
                position: 0,
                status: entry.status,
                message: entry.message,
                updated_by: entry.updated_by,
                created_at,
            }],
        }
    }

    #[test]
    fn deal_quotes_survive_the_row_mapping() -> anyhow::Result<()> {
        let details = DealQuote {
            best_deal_id: Uuid::new_v4(),
            desired_quantity: BigDecimal::from(25),
            shipping_country: "Germany".to_owned(),
            payment_terms: "Net 30".to_owned(),
            delivery_deadline: jiff::civil::date(2026, 3, 1),
        };
        let record = NewQuoteRecord {
            buyer_id: Uuid::new_v4(),
            seller_id: Uuid::new_v4(),
            details: QuoteDetails::DealQuote(details.clone()),
            initial: initial(),
            message: Some("urgent".to_owned()),
        };

        let (row, entry) = new_quote_row(record.clone());
        let quote = quote_from_row(stored(row, entry))?;

        assert_eq!(quote.details, QuoteDetails::DealQuote(details));
        assert_eq!(quote.status(), QuoteStatus::Pending);
        assert_eq!(quote.message.as_deref(), Some("urgent"));
        assert_eq!(quote.version, 1);
        Ok(())
    }

    #[test]
    fn missing_variant_columns_are_internal_errors() {
        let record = NewQuoteRecord {
            buyer_id: Uuid::new_v4(),
            seller_id: Uuid::new_v4(),
            details: QuoteDetails::DealQuote(DealQuote {
                best_deal_id: Uuid::new_v4(),
                desired_quantity: BigDecimal::from(1),
                shipping_country: "France".to_owned(),
                payment_terms: "Prepaid".to_owned(),
                delivery_deadline: jiff::civil::date(2026, 1, 1),
            }),
            initial: initial(),
            message: None,
        };

        let (row, entry) = new_quote_row(record);
        let mut stored = stored(row, entry);
        stored.quote.payment_terms = None;

        let error = quote_from_row(stored).err();
        assert_eq!(error.map(|e| e.kind()), Some(polyhub_core::ErrorKind::Internal));
    }

    #[test]
    fn facets_fall_back_to_the_deal_deadline() {
        let facet = facet_from_row(QuoteRequestFacet {
            status: polyhub_postgres::types::QuoteStatus::Pending,
            request_type: polyhub_postgres::types::QuoteType::DealQuote,
            delivery_date: None,
            delivery_deadline: Some(jiff::civil::date(2026, 5, 4).into()),
            created_at: Timestamp::UNIX_EPOCH.into(),
        });

        assert_eq!(facet.delivery_date, Some(jiff::civil::date(2026, 5, 4)));
    }
}
