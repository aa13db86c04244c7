//! Quote request lifecycle operations.

use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{
    NewQuote, NewQuoteRecord, QuoteDetails, QuoteFilter, QuotePage, QuoteRequest, QuoteStatus,
    QuoteSummary, QuoteWithSeller, RespondOutcome, SellerResponse, SellerResponseInput,
    StatusActor, StatusEntry,
};
use crate::context::utc_date;
use crate::notify::{NewNotification, NotificationKind};
use crate::types::{AccountRole, Actor, PageRequest};
use crate::{Error, MarketContext, Result, TRACING_TARGET_QUOTES};

/// Message recorded on the initial history entry.
const SUBMITTED_MESSAGE: &str = "Quote request submitted";

/// Requested status change.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    /// Target status, in wire format (e.g. `in_progress`).
    #[validate(length(min = 1, max = 32))]
    pub status: String,
    /// Note appended to the history entry.
    #[validate(length(max = 1000))]
    pub message: Option<String>,
    /// Version the caller last saw. A mismatch is reported as a conflict.
    pub version: Option<i64>,
}

/// Creation, transition, response and deletion of quote requests.
#[derive(Debug, Clone)]
pub struct QuoteRequestManager {
    ctx: MarketContext,
}

impl QuoteRequestManager {
    pub(crate) fn new(ctx: MarketContext) -> Self {
        Self { ctx }
    }

    /// Creates a quote request on behalf of the acting buyer.
    ///
    /// The seller is never taken from the payload: a product quote resolves
    /// to the product owner, a deal quote to the owner of the deal's product.
    #[tracing::instrument(skip_all, fields(buyer_id = %actor.account_id))]
    pub async fn create(&self, actor: &Actor, payload: NewQuote) -> Result<QuoteRequest> {
        if actor.role != AccountRole::Buyer {
            return Err(Error::authorization().with_message("only buyers can request quotes"));
        }

        let (details, message) = payload.into_details()?;
        let seller_id = self.resolve_seller(&details).await?;

        let record = NewQuoteRecord {
            buyer_id: actor.account_id,
            seller_id,
            details,
            initial: StatusEntry::new(
                QuoteStatus::Pending,
                SUBMITTED_MESSAGE,
                StatusActor::Buyer,
                Timestamp::now(),
            ),
            message,
        };

        let quote = self.ctx.quote_store().insert_quote(record).await?;

        tracing::info!(
            target: TRACING_TARGET_QUOTES,
            quote_id = %quote.id,
            seller_id = %quote.seller_id,
            request_type = %quote.request_type(),
            "quote request created",
        );

        let notification = NewNotification::new(
            quote.seller_id,
            NotificationKind::QuoteRequested,
            format!("You received a new {} request", describe(&quote)),
        )
        .with_related(quote.id)
        .with_redirect(redirect_to(quote.id));
        self.ctx.notify(notification).await;

        Ok(quote)
    }

    /// Appends a status change requested by a participant or an admin.
    ///
    /// The history entry is attributed from the actor's relationship to the
    /// request. The write only succeeds if nobody else changed the status
    /// since the request was read.
    #[tracing::instrument(skip_all, fields(quote_id = %id, account_id = %actor.account_id))]
    pub async fn update_status(
        &self,
        id: Uuid,
        update: StatusUpdate,
        actor: &Actor,
    ) -> Result<QuoteRequest> {
        update.validate()?;

        let quote = self.load(id).await?;
        let relationship = quote.relationship(actor).ok_or_else(|| {
            Error::authorization().with_message("only participants can change the status")
        })?;

        let next = QuoteStatus::parse_field(&update.status)?;

        if update.version.is_some_and(|seen| seen != quote.version) {
            return Err(Error::conflict().with_message(
                "the quote request was modified since it was read, reload and retry",
            ));
        }

        let current = quote.status();
        current.check_transition(next, relationship)?;

        let message = update
            .message
            .map(|m| m.trim().to_owned())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Status changed to {next}"));
        let entry = StatusEntry::new(next, message, relationship, Timestamp::now());

        let updated = self
            .ctx
            .quote_store()
            .append_status(id, quote.version, entry)
            .await?;

        tracing::info!(
            target: TRACING_TARGET_QUOTES,
            quote_id = %id,
            from = %current,
            to = %next,
            updated_by = %relationship,
            version = updated.version,
            "quote request status changed",
        );

        let recipient = match relationship {
            StatusActor::Buyer => updated.seller_id,
            StatusActor::Seller | StatusActor::Admin => updated.buyer_id,
        };
        let notification = NewNotification::new(
            recipient,
            NotificationKind::QuoteStatusChanged,
            format!(
                "{} {} is now {}",
                next.icon(),
                describe(&updated),
                next.as_ref().replace('_', " ")
            ),
        )
        .with_related(updated.id)
        .with_redirect(redirect_to(updated.id))
        .with_meta(serde_json::json!({ "status": next, "updatedBy": relationship }));
        self.ctx.notify(notification).await;

        Ok(updated)
    }

    /// Stores the resolved seller's response without changing the status.
    ///
    /// A quotation document that cannot be parsed is dropped and reported
    /// through [`RespondOutcome::document_dropped`].
    #[tracing::instrument(skip_all, fields(quote_id = %id, account_id = %actor.account_id))]
    pub async fn seller_respond(
        &self,
        id: Uuid,
        actor: &Actor,
        input: SellerResponseInput,
    ) -> Result<RespondOutcome> {
        input.validate()?;

        let quote = self.load(id).await?;
        if !actor.is(quote.seller_id) {
            return Err(Error::authorization()
                .with_message("only the seller of this quote request can respond"));
        }

        if quote.status().is_terminal() {
            return Err(Error::invalid_field(
                "status",
                "closed",
                format!("cannot respond to a quote request that is {}", quote.status()),
            ));
        }

        let mut document_dropped = false;
        let quotation_document = match input.quotation_document {
            Some(document) => match document.resolve() {
                Ok(document) => Some(document),
                Err(error) => {
                    tracing::warn!(
                        target: TRACING_TARGET_QUOTES,
                        quote_id = %id,
                        error = %error,
                        "dropping unparseable quotation document",
                    );
                    document_dropped = true;
                    None
                }
            },
            None => None,
        };

        let response = SellerResponse {
            message: input.message,
            quoted_price: input.quoted_price,
            quoted_quantity: input.quoted_quantity,
            estimated_delivery: input.estimated_delivery,
            quotation_document,
            responded_at: Timestamp::now(),
        };

        let quote = self
            .ctx
            .quote_store()
            .save_seller_response(id, response)
            .await?;

        tracing::info!(
            target: TRACING_TARGET_QUOTES,
            quote_id = %id,
            document_dropped,
            "seller responded to quote request",
        );

        let notification = NewNotification::new(
            quote.buyer_id,
            NotificationKind::QuoteResponded,
            format!("The seller responded to your {}", describe(&quote)),
        )
        .with_related(quote.id)
        .with_redirect(redirect_to(quote.id));
        self.ctx.notify(notification).await;

        Ok(RespondOutcome {
            quote,
            document_dropped,
        })
    }

    /// Hard-deletes a request. Only the owning buyer or an admin may do so.
    #[tracing::instrument(skip_all, fields(quote_id = %id, account_id = %actor.account_id))]
    pub async fn delete(&self, id: Uuid, actor: &Actor) -> Result<()> {
        let quote = self.load(id).await?;
        if !actor.is_admin() && !actor.is(quote.buyer_id) {
            return Err(Error::authorization()
                .with_message("only the requesting buyer can delete a quote request"));
        }

        if !self.ctx.quote_store().delete_quote(id).await? {
            return Err(not_found(id));
        }

        tracing::info!(target: TRACING_TARGET_QUOTES, quote_id = %id, "quote request deleted");
        Ok(())
    }

    /// Returns a request with its seller, visible to participants and admins.
    pub async fn get(&self, id: Uuid, actor: &Actor) -> Result<QuoteWithSeller> {
        let joined = self
            .ctx
            .quote_store()
            .find_quote_with_seller(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        if joined.quote.relationship(actor).is_none() {
            return Err(Error::authorization().with_message("not a participant of this quote request"));
        }

        Ok(joined)
    }

    /// Lists requests with a summary computed over the whole filtered set.
    ///
    /// Non-admin callers only see requests they participate in.
    #[tracing::instrument(skip_all, fields(account_id = %actor.account_id))]
    pub async fn list(
        &self,
        actor: &Actor,
        mut filter: QuoteFilter,
        page: PageRequest,
    ) -> Result<QuotePage> {
        if !actor.is_admin() {
            filter.participant_id = Some(actor.account_id);
        }

        let store = self.ctx.quote_store();
        let (items, total) = store.list_quotes(&filter, page).await?;
        let facets = store.quote_facets(&filter).await?;
        let summary = QuoteSummary::from_facets(&facets, utc_date(Timestamp::now()));

        tracing::debug!(
            target: TRACING_TARGET_QUOTES,
            total,
            returned = items.len(),
            "quote requests listed",
        );

        Ok(QuotePage {
            items,
            total,
            page: page.page(),
            total_pages: page.total_pages(total),
            summary,
        })
    }

    async fn load(&self, id: Uuid) -> Result<QuoteRequest> {
        self.ctx
            .quote_store()
            .find_quote(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn resolve_seller(&self, details: &QuoteDetails) -> Result<Uuid> {
        let catalog = self.ctx.catalog_store();

        match details {
            QuoteDetails::ProductQuote(quote) => catalog
                .find_product_owner(quote.product_id)
                .await?
                .map(|product| product.owner_id)
                .ok_or_else(|| {
                    Error::not_found().with_message(format!("product {} not found", quote.product_id))
                }),
            QuoteDetails::DealQuote(quote) => {
                let broken = || {
                    Error::reference_integrity()
                        .with_message("invalid best deal or missing product owner")
                };

                let deal = self
                    .ctx
                    .deal_store()
                    .find_deal(quote.best_deal_id)
                    .await?
                    .ok_or_else(broken)?;

                if !deal.is_active_at(Timestamp::now()) {
                    return Err(Error::invalid_field(
                        "bestDealId",
                        "inactive_deal",
                        "the best deal is not approved or has expired",
                    ));
                }

                catalog
                    .find_product_owner(deal.product_id)
                    .await?
                    .map(|product| product.owner_id)
                    .ok_or_else(broken)
            }
        }
    }
}

fn not_found(id: Uuid) -> Error {
    Error::not_found().with_message(format!("quote request {id} not found"))
}

fn describe(quote: &QuoteRequest) -> &'static str {
    match quote.details {
        QuoteDetails::ProductQuote(_) => "product quote",
        QuoteDetails::DealQuote(_) => "deal quote",
    }
}

fn redirect_to(id: Uuid) -> String {
    format!("/quotes/{id}")
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use jiff::ToSpan;

    use super::*;
    use crate::ErrorKind;
    use crate::deal::{BestDeal, DealDecisionInput, NewDealInput};
    use crate::mock::MemoryStore;
    use crate::notify::NotificationKind;
    use crate::quote::{DealQuoteInput, ProductQuoteInput, QuoteType};
    use crate::types::QuotationDocument;

    struct Fixture {
        store: MemoryStore,
        ctx: MarketContext,
        buyer: Actor,
        seller: Actor,
        admin: Actor,
        product_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let buyer = Actor::buyer(store.add_account(AccountRole::Buyer, "Buyer Co").await);
        let seller = Actor::seller(store.add_account(AccountRole::Seller, "Resins Ltd").await);
        let admin = Actor::admin(store.add_account(AccountRole::Admin, "Ops").await);
        let product_id = store.add_product(seller.account_id, "HDPE HD5502").await;

        Fixture {
            ctx: store.context(),
            store,
            buyer,
            seller,
            admin,
            product_id,
        }
    }

    fn decimal(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn product_payload(product_id: Uuid, delivery_in_days: Option<i64>) -> NewQuote {
        let today = utc_date(Timestamp::now());
        NewQuote::ProductQuote(ProductQuoteInput {
            product_id: Some(product_id),
            quantity: Some(decimal("12.5")),
            uom: Some("mt".to_owned()),
            country: Some("Turkey".to_owned()),
            destination: Some("Istanbul".to_owned()),
            delivery_date: delivery_in_days.map(|days| today.saturating_add(days.days())),
            message: Some("Need film grade material".to_owned()),
            ..Default::default()
        })
    }

    fn status(status: &str) -> StatusUpdate {
        StatusUpdate {
            status: status.to_owned(),
            message: None,
            version: None,
        }
    }

    async fn seller_deal(fx: &Fixture) -> anyhow::Result<BestDeal> {
        let deal = fx
            .ctx
            .best_deals()
            .create(
                &fx.seller,
                NewDealInput {
                    seller_id: None,
                    product_id: fx.product_id,
                    offer_price: decimal("980"),
                    validity: None,
                },
            )
            .await?
            .into_inner();
        Ok(deal)
    }

    async fn review(fx: &Fixture, deal_id: Uuid, status: &str) -> anyhow::Result<()> {
        let input = DealDecisionInput {
            status: status.to_owned(),
            admin_note: None,
        };
        fx.ctx.best_deals().admin_decision(deal_id, input, &fx.admin).await?;
        Ok(())
    }

    fn deal_payload(best_deal_id: Uuid) -> NewQuote {
        NewQuote::DealQuote(DealQuoteInput {
            best_deal_id: Some(best_deal_id),
            desired_quantity: Some(decimal("40")),
            shipping_country: Some("Egypt".to_owned()),
            payment_terms: Some("LC at sight".to_owned()),
            delivery_deadline: Some(utc_date(Timestamp::now()).saturating_add(45.days())),
            message: None,
        })
    }

    #[tokio::test]
    async fn deal_quote_resolves_seller_through_product_owner() -> anyhow::Result<()> {
        let fx = fixture().await;
        let deal = seller_deal(&fx).await?;
        review(&fx, deal.id, "approved").await?;

        let quote = fx
            .ctx
            .quote_requests()
            .create(&fx.buyer, deal_payload(deal.id))
            .await?;

        assert_eq!(quote.seller_id, fx.seller.account_id);
        assert_eq!(quote.request_type(), QuoteType::DealQuote);
        assert_eq!(quote.status(), QuoteStatus::Pending);
        assert_eq!(quote.history.len(), 1);
        assert_eq!(quote.history.current().updated_by, StatusActor::Buyer);
        assert_eq!(quote.details.best_deal_id(), Some(deal.id));
        assert_eq!(quote.details.product_id(), None);
        assert_eq!(quote.version, 1);

        let requested: Vec<_> = fx
            .store
            .notifications()
            .await
            .into_iter()
            .filter(|n| n.kind == NotificationKind::QuoteRequested)
            .collect();
        assert_eq!(requested.len(), 1);
        assert_eq!(requested[0].account_id, fx.seller.account_id);
        Ok(())
    }

    #[tokio::test]
    async fn deal_quotes_need_an_active_deal() -> anyhow::Result<()> {
        let fx = fixture().await;
        let quotes = fx.ctx.quote_requests();

        let pending = seller_deal(&fx).await?;
        let error = quotes
            .create(&fx.buyer, deal_payload(pending.id))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation);
        assert_eq!(error.fields[0].field, "bestDealId");

        review(&fx, pending.id, "rejected").await?;
        let error = quotes
            .create(&fx.buyer, deal_payload(pending.id))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation);

        let expired_product = fx.store.add_product(fx.seller.account_id, "LDPE 2426H").await;
        let expired = fx
            .ctx
            .best_deals()
            .create(
                &fx.seller,
                NewDealInput {
                    seller_id: None,
                    product_id: expired_product,
                    offer_price: decimal("1010"),
                    validity: Timestamp::now().checked_sub(24.hours()).ok(),
                },
            )
            .await?
            .into_inner();
        review(&fx, expired.id, "approved").await?;
        let error = quotes
            .create(&fx.buyer, deal_payload(expired.id))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation);

        assert_eq!(fx.store.quote_count().await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn broken_deal_chain_is_reference_integrity_error() -> anyhow::Result<()> {
        let fx = fixture().await;
        let payload = NewQuote::DealQuote(DealQuoteInput {
            best_deal_id: Some(Uuid::now_v7()),
            desired_quantity: Some(decimal("1")),
            shipping_country: Some("Chile".to_owned()),
            payment_terms: Some("Net 60".to_owned()),
            delivery_deadline: Some(utc_date(Timestamp::now())),
            message: None,
        });

        let error = fx
            .ctx
            .quote_requests()
            .create(&fx.buyer, payload)
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ReferenceIntegrity);
        assert_eq!(fx.store.quote_count().await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() -> anyhow::Result<()> {
        let fx = fixture().await;
        let error = fx
            .ctx
            .quote_requests()
            .create(&fx.buyer, product_payload(Uuid::now_v7(), None))
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::NotFound);
        Ok(())
    }

    #[tokio::test]
    async fn seller_accepts_and_buyer_is_notified() -> anyhow::Result<()> {
        let fx = fixture().await;
        let manager = fx.ctx.quote_requests();
        let quote = manager
            .create(&fx.buyer, product_payload(fx.product_id, Some(10)))
            .await?;

        let update = StatusUpdate {
            message: Some("ok".to_owned()),
            ..status("accepted")
        };
        let updated = manager.update_status(quote.id, update, &fx.seller).await?;

        assert_eq!(updated.status(), QuoteStatus::Accepted);
        assert_eq!(updated.history.len(), 2);
        assert_eq!(updated.history.current().status, updated.status());
        assert_eq!(updated.history.current().updated_by, StatusActor::Seller);
        assert_eq!(updated.history.current().message, "ok");
        assert_eq!(updated.version, quote.version + 1);

        let last = fx.store.notifications().await.pop().unwrap();
        assert_eq!(last.account_id, fx.buyer.account_id);
        assert_eq!(last.kind, NotificationKind::QuoteStatusChanged);
        Ok(())
    }

    #[tokio::test]
    async fn history_and_status_agree_along_the_fulfilment_path() -> anyhow::Result<()> {
        let fx = fixture().await;
        let manager = fx.ctx.quote_requests();
        let quote = manager
            .create(&fx.buyer, product_payload(fx.product_id, None))
            .await?;

        let steps = [
            ("responded", &fx.seller),
            ("negotiation", &fx.buyer),
            ("accepted", &fx.buyer),
            ("in_progress", &fx.seller),
            ("shipped", &fx.seller),
            ("delivered", &fx.admin),
            ("completed", &fx.buyer),
        ];

        for (next, actor) in steps {
            let updated = manager.update_status(quote.id, status(next), actor).await?;
            assert_eq!(updated.status().as_ref(), next);
            assert_eq!(updated.history.current().status, updated.status());
        }

        let stored = manager.get(quote.id, &fx.admin).await?;
        assert_eq!(stored.quote.history.len(), steps.len() + 1);
        assert!(stored.quote.status().is_terminal());
        Ok(())
    }

    #[tokio::test]
    async fn illegal_transitions_are_rejected() -> anyhow::Result<()> {
        let fx = fixture().await;
        let manager = fx.ctx.quote_requests();
        let quote = manager
            .create(&fx.buyer, product_payload(fx.product_id, None))
            .await?;

        let error = manager
            .update_status(quote.id, status("shipped"), &fx.seller)
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation);

        let error = manager
            .update_status(quote.id, status("responded"), &fx.buyer)
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation);

        let error = manager
            .update_status(quote.id, status("archived"), &fx.seller)
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation);

        manager
            .update_status(quote.id, status("cancelled"), &fx.buyer)
            .await?;
        let error = manager
            .update_status(quote.id, status("accepted"), &fx.admin)
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validation);

        let stored = manager.get(quote.id, &fx.buyer).await?;
        assert_eq!(stored.quote.status(), QuoteStatus::Cancelled);
        assert_eq!(stored.quote.history.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn stale_version_is_a_conflict() -> anyhow::Result<()> {
        let fx = fixture().await;
        let manager = fx.ctx.quote_requests();
        let quote = manager
            .create(&fx.buyer, product_payload(fx.product_id, None))
            .await?;

        manager
            .update_status(quote.id, status("responded"), &fx.seller)
            .await?;

        let stale = StatusUpdate {
            version: Some(quote.version),
            ..status("accepted")
        };
        let error = manager
            .update_status(quote.id, stale, &fx.buyer)
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Conflict);

        let entry = StatusEntry::new(
            QuoteStatus::Accepted,
            "late writer",
            StatusActor::Buyer,
            Timestamp::now(),
        );
        let error = fx
            .store
            .context()
            .quote_store()
            .append_status(quote.id, quote.version, entry)
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Conflict);

        let stored = manager.get(quote.id, &fx.buyer).await?;
        assert_eq!(stored.quote.status(), QuoteStatus::Responded);
        Ok(())
    }

    #[tokio::test]
    async fn outsiders_are_rejected_everywhere() -> anyhow::Result<()> {
        let fx = fixture().await;
        let outsider = Actor::buyer(fx.store.add_account(AccountRole::Buyer, "Other").await);
        let manager = fx.ctx.quote_requests();
        let quote = manager
            .create(&fx.buyer, product_payload(fx.product_id, None))
            .await?;

        let error = manager
            .update_status(quote.id, status("cancelled"), &outsider)
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Authorization);

        let response = SellerResponseInput {
            message: "We can do it".to_owned(),
            quoted_price: decimal("1100"),
            quoted_quantity: None,
            estimated_delivery: None,
            quotation_document: None,
        };
        let error = manager
            .seller_respond(quote.id, &outsider, response.clone())
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Authorization);

        let error = manager
            .seller_respond(quote.id, &fx.admin, response)
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Authorization);

        let error = manager.delete(quote.id, &outsider).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Authorization);

        let error = manager.get(quote.id, &outsider).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Authorization);

        let error = manager.delete(quote.id, &fx.seller).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Authorization);
        assert_eq!(fx.store.quote_count().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn owner_and_admin_can_delete() -> anyhow::Result<()> {
        let fx = fixture().await;
        let manager = fx.ctx.quote_requests();
        let first = manager
            .create(&fx.buyer, product_payload(fx.product_id, None))
            .await?;
        let second = manager
            .create(&fx.buyer, product_payload(fx.product_id, None))
            .await?;

        manager.delete(first.id, &fx.buyer).await?;
        manager.delete(second.id, &fx.admin).await?;
        assert_eq!(fx.store.quote_count().await, 0);

        let error = manager.delete(first.id, &fx.buyer).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);
        Ok(())
    }

    #[tokio::test]
    async fn unparseable_document_is_dropped_and_flagged() -> anyhow::Result<()> {
        let fx = fixture().await;
        let manager = fx.ctx.quote_requests();
        let quote = manager
            .create(&fx.buyer, product_payload(fx.product_id, None))
            .await?;

        let input = SellerResponseInput {
            message: "Offer attached".to_owned(),
            quoted_price: decimal("1250.00"),
            quoted_quantity: Some(decimal("12.5")),
            estimated_delivery: Some("3 weeks".to_owned()),
            quotation_document: Some(QuotationDocument::Serialized("{broken".to_owned())),
        };
        let outcome = manager.seller_respond(quote.id, &fx.seller, input).await?;

        assert!(outcome.document_dropped);
        let response = outcome.quote.seller_response.as_ref().unwrap();
        assert_eq!(response.message, "Offer attached");
        assert!(response.quotation_document.is_none());
        assert_eq!(outcome.quote.status(), QuoteStatus::Pending);
        assert_eq!(outcome.quote.version, quote.version);

        let raw = r#"{"id":"doc-9","name":"offer.pdf","type":"application/pdf","fileUrl":"https://files/doc-9"}"#;
        let input = SellerResponseInput {
            message: "Corrected offer".to_owned(),
            quoted_price: decimal("1200"),
            quoted_quantity: None,
            estimated_delivery: None,
            quotation_document: Some(QuotationDocument::Serialized(raw.to_owned())),
        };
        let outcome = manager.seller_respond(quote.id, &fx.seller, input).await?;

        assert!(!outcome.document_dropped);
        let document = outcome
            .quote
            .seller_response
            .and_then(|r| r.quotation_document)
            .unwrap();
        assert_eq!(document.id, "doc-9");
        Ok(())
    }

    #[tokio::test]
    async fn notification_failures_do_not_fail_the_operation() -> anyhow::Result<()> {
        let fx = fixture().await;
        fx.store.fail_notifications(true);

        let quote = fx
            .ctx
            .quote_requests()
            .create(&fx.buyer, product_payload(fx.product_id, None))
            .await?;

        assert_eq!(quote.status(), QuoteStatus::Pending);
        assert!(fx.store.notifications().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn summary_covers_the_filtered_set() -> anyhow::Result<()> {
        let fx = fixture().await;
        let manager = fx.ctx.quote_requests();

        for days in [Some(3), Some(12), Some(25), None, Some(90)] {
            manager
                .create(&fx.buyer, product_payload(fx.product_id, days))
                .await?;
        }
        let rejected = manager
            .create(&fx.buyer, product_payload(fx.product_id, Some(2)))
            .await?;
        manager
            .update_status(rejected.id, status("rejected"), &fx.seller)
            .await?;

        let filter = QuoteFilter {
            status: Some(QuoteStatus::Pending),
            ..Default::default()
        };
        let page = manager
            .list(&fx.buyer, filter, PageRequest::new(1, 2))
            .await?;

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.summary.total, 5);
        assert_eq!(page.summary.by_status[&QuoteStatus::Pending], 5);
        assert_eq!(page.summary.by_status[&QuoteStatus::Rejected], 0);
        assert_eq!(page.summary.by_type[&QuoteType::ProductQuote], 5);
        assert_eq!(page.summary.by_priority[&crate::quote::Priority::Urgent], 1);
        assert_eq!(page.summary.by_priority[&crate::quote::Priority::High], 1);
        assert_eq!(page.summary.by_priority[&crate::quote::Priority::Medium], 1);
        assert_eq!(page.summary.by_priority[&crate::quote::Priority::Normal], 2);
        Ok(())
    }

    #[tokio::test]
    async fn listing_is_scoped_to_participants() -> anyhow::Result<()> {
        let fx = fixture().await;
        let other = Actor::buyer(fx.store.add_account(AccountRole::Buyer, "Other").await);
        let manager = fx.ctx.quote_requests();

        manager
            .create(&fx.buyer, product_payload(fx.product_id, None))
            .await?;
        manager
            .create(&other, product_payload(fx.product_id, None))
            .await?;

        let mine = manager
            .list(&fx.buyer, QuoteFilter::default(), PageRequest::default())
            .await?;
        assert_eq!(mine.total, 1);

        let sellers = manager
            .list(&fx.seller, QuoteFilter::default(), PageRequest::default())
            .await?;
        assert_eq!(sellers.total, 2);

        let search = QuoteFilter {
            search: Some("FILM GRADE".to_owned()),
            ..Default::default()
        };
        let everything = manager
            .list(&fx.admin, search, PageRequest::default())
            .await?;
        assert_eq!(everything.total, 2);
        Ok(())
    }
}
