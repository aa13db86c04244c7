//! Best deal lifecycle operations.

use std::str::FromStr;

use jiff::Timestamp;
use uuid::Uuid;
use validator::Validate;

use super::{
    BestDeal, CreateOutcome, DealChanges, DealDecisionInput, DealEditInput, DealFilter,
    DealStatus, DecisionOutcome, NewDealInput, NewDealRecord,
};
use crate::notify::{NewNotification, NotificationKind};
use crate::types::{AccountRole, Actor, PageRequest};
use crate::{Error, MarketContext, Result, TRACING_TARGET_DEALS};

/// One page of deals.
#[derive(Debug, Clone)]
pub struct DealPage {
    pub items: Vec<BestDeal>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u64,
}

/// Creation, admin decision, owner edits and listing of best deals.
#[derive(Debug, Clone)]
pub struct BestDealManager {
    ctx: MarketContext,
}

impl BestDealManager {
    pub(crate) fn new(ctx: MarketContext) -> Self {
        Self { ctx }
    }

    /// Creates a pending deal, or returns the seller's existing deal on the
    /// same product unchanged.
    #[tracing::instrument(skip_all, fields(account_id = %actor.account_id))]
    pub async fn create(
        &self,
        actor: &Actor,
        input: NewDealInput,
    ) -> Result<CreateOutcome<BestDeal>> {
        let seller_id = match actor.role {
            AccountRole::Seller => match input.seller_id {
                Some(seller_id) if seller_id != actor.account_id => {
                    return Err(Error::authorization()
                        .with_message("sellers can only create deals for themselves"));
                }
                _ => actor.account_id,
            },
            AccountRole::Admin => input.seller_id.ok_or_else(|| {
                Error::invalid_field(
                    "sellerId",
                    "required",
                    "sellerId is required when an admin creates a deal",
                )
            })?,
            AccountRole::Buyer | AccountRole::Expert => {
                return Err(
                    Error::authorization().with_message("only sellers and admins can create deals")
                );
            }
        };

        input.validate()?;

        let product = self
            .ctx
            .catalog_store()
            .find_product_owner(input.product_id)
            .await?
            .ok_or_else(|| {
                Error::not_found().with_message(format!("product {} not found", input.product_id))
            })?;

        if product.owner_id != seller_id {
            return Err(Error::authorization()
                .with_message("best deals can only be offered by the product owner"));
        }

        let store = self.ctx.deal_store();
        if let Some(existing) = store.find_deal_for(input.product_id, seller_id).await? {
            tracing::debug!(
                target: TRACING_TARGET_DEALS,
                deal_id = %existing.id,
                "deal already exists for product and seller",
            );
            return Ok(CreateOutcome::AlreadyExisted(existing));
        }

        let deal = store
            .insert_deal(NewDealRecord {
                product_id: input.product_id,
                seller_id,
                created_by: actor.account_id,
                offer_price: input.offer_price,
                validity: input.validity,
            })
            .await?;

        tracing::info!(
            target: TRACING_TARGET_DEALS,
            deal_id = %deal.id,
            product_id = %deal.product_id,
            seller_id = %deal.seller_id,
            "best deal created",
        );

        Ok(CreateOutcome::Created(deal))
    }

    /// Approves or rejects a deal. Repeating the stored decision writes nothing.
    #[tracing::instrument(skip_all, fields(deal_id = %id, account_id = %actor.account_id))]
    pub async fn admin_decision(
        &self,
        id: Uuid,
        input: DealDecisionInput,
        actor: &Actor,
    ) -> Result<DecisionOutcome> {
        if !actor.is_admin() {
            return Err(Error::authorization().with_message("only admins can review deals"));
        }

        input.validate()?;

        let status = match DealStatus::from_str(input.status.trim()) {
            Ok(status @ (DealStatus::Approved | DealStatus::Rejected)) => status,
            _ => {
                return Err(Error::invalid_field(
                    "status",
                    "invalid_decision",
                    "status must be either 'approved' or 'rejected'",
                ));
            }
        };

        let deal = self.load(id).await?;
        let admin_note = input.admin_note.filter(|note| !note.trim().is_empty());

        if deal.status == status && deal.admin_note == admin_note {
            tracing::debug!(target: TRACING_TARGET_DEALS, deal_id = %id, "decision unchanged");
            return Ok(DecisionOutcome {
                deal,
                changed: false,
            });
        }

        let changes = DealChanges {
            status: Some(status),
            admin_note: Some(admin_note),
            ..Default::default()
        };
        let deal = self.ctx.deal_store().update_deal(id, changes).await?;

        tracing::info!(
            target: TRACING_TARGET_DEALS,
            deal_id = %id,
            status = %deal.status,
            "best deal reviewed",
        );

        let mut message = format!("Your best deal was {}", deal.status);
        if let Some(note) = &deal.admin_note {
            message.push_str(": ");
            message.push_str(note);
        }
        let notification =
            NewNotification::new(deal.seller_id, NotificationKind::DealDecision, message)
                .with_related(deal.id)
                .with_redirect(format!("/deals/{}", deal.id));
        self.ctx.notify(notification).await;

        Ok(DecisionOutcome {
            deal,
            changed: true,
        })
    }

    /// Updates price and validity. Only the owner or an admin may edit.
    ///
    /// With [`MarketPolicy::reset_deal_status_on_edit`](crate::MarketPolicy)
    /// enabled, a reviewed deal goes back to `pending` and loses its admin note.
    #[tracing::instrument(skip_all, fields(deal_id = %id, account_id = %actor.account_id))]
    pub async fn edit(&self, id: Uuid, input: DealEditInput, actor: &Actor) -> Result<BestDeal> {
        input.validate()?;

        let deal = self.load(id).await?;
        if !actor.is_admin() && !deal.is_owned_by(actor) {
            return Err(Error::authorization().with_message("only the deal owner can edit it"));
        }

        let mut changes = DealChanges {
            offer_price: Some(input.offer_price),
            validity: Some(input.validity),
            ..Default::default()
        };

        let reset = self.ctx.policy().reset_deal_status_on_edit && deal.status != DealStatus::Pending;
        if reset {
            changes.status = Some(DealStatus::Pending);
            changes.admin_note = Some(None);
        }

        let deal = self.ctx.deal_store().update_deal(id, changes).await?;

        tracing::info!(
            target: TRACING_TARGET_DEALS,
            deal_id = %id,
            status_reset = reset,
            "best deal edited",
        );

        Ok(deal)
    }

    /// Deletes a deal. Only the owner or an admin may delete.
    #[tracing::instrument(skip_all, fields(deal_id = %id, account_id = %actor.account_id))]
    pub async fn delete(&self, id: Uuid, actor: &Actor) -> Result<()> {
        let deal = self.load(id).await?;
        if !actor.is_admin() && !deal.is_owned_by(actor) {
            return Err(Error::authorization().with_message("only the deal owner can delete it"));
        }

        if !self.ctx.deal_store().delete_deal(id).await? {
            return Err(not_found(id));
        }

        tracing::info!(target: TRACING_TARGET_DEALS, deal_id = %id, "best deal deleted");
        Ok(())
    }

    /// Loads a deal the actor may read. Hidden deals report as missing.
    pub async fn get(&self, id: Uuid, actor: &Actor) -> Result<BestDeal> {
        let deal = self.load(id).await?;
        if !deal.is_visible_to(actor) {
            return Err(not_found(id));
        }

        Ok(deal)
    }

    /// Lists deals matching `filter`, limited to those the actor may read.
    pub async fn list(
        &self,
        filter: DealFilter,
        page: PageRequest,
        actor: &Actor,
    ) -> Result<DealPage> {
        match filter.visible_to(actor) {
            Some(filter) => self.page(filter, page).await,
            None => Ok(DealPage {
                items: Vec::new(),
                total: 0,
                page: page.page(),
                total_pages: page.total_pages(0),
            }),
        }
    }

    /// Approved deals whose validity is unset or not yet passed.
    pub async fn active(&self, page: PageRequest) -> Result<DealPage> {
        self.page(DealFilter::active(Timestamp::now()), page).await
    }

    async fn page(&self, filter: DealFilter, page: PageRequest) -> Result<DealPage> {
        let (items, total) = self.ctx.deal_store().list_deals(&filter, page).await?;

        Ok(DealPage {
            items,
            total,
            page: page.page(),
            total_pages: page.total_pages(total),
        })
    }

    async fn load(&self, id: Uuid) -> Result<BestDeal> {
        self.ctx
            .deal_store()
            .find_deal(id)
            .await?
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: Uuid) -> Error {
    Error::not_found().with_message(format!("best deal {id} not found"))
}
