//! Best deal handlers.
//!
//! Sellers propose deals on their own products, administrators approve or
//! reject them, and approved deals within their validity are listed
//! publicly. Every rule is enforced by [`BestDealManager`].
//!
//! [`BestDealManager`]: polyhub_core::deal::BestDealManager

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use polyhub_core::MarketContext;
use polyhub_core::deal::{DealDecisionInput, DealEditInput, DealPage, NewDealInput};
use polyhub_core::types::PageRequest;
use validator::Validate;

use super::request::{DealPathParams, DealQuery, Pagination};
use super::response::{BestDeal, DealCreated, DealDecision, ErrorResponse, Page};
use crate::extract::{AuthState, Json, Path, Query};
use crate::handler::Result;
use crate::service::ServiceState;

/// Tracing target for best deal operations.
const TRACING_TARGET: &str = "polyhub_server::handler::deals";

fn deal_page(page: DealPage) -> Page<BestDeal> {
    let items = page.items.into_iter().map(BestDeal::from).collect();
    Page::new(items, page.total, page.page, page.total_pages)
}

/// Creates a pending deal, or returns the caller's existing one.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn create_deal(
    State(market): State<MarketContext>,
    auth_state: AuthState,
    Json(request): Json<NewDealInput>,
) -> Result<(StatusCode, Json<DealCreated>)> {
    let outcome = market
        .best_deals()
        .create(&auth_state.actor(), request)
        .await?;

    let status = if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    let response = DealCreated::from(outcome);
    tracing::info!(
        target: TRACING_TARGET,
        deal_id = %response.deal.id,
        created = response.created,
        "deal create handled",
    );

    Ok((status, Json(response)))
}

fn create_deal_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create best deal")
        .description(
            "Sellers create deals for themselves; administrators must name the seller. \
             A seller holds at most one deal per product: repeating the request returns \
             the existing deal with `created: false` and status 200.",
        )
        .response::<201, Json<DealCreated>>()
        .response::<200, Json<DealCreated>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Approves or rejects a deal.
#[tracing::instrument(skip_all, fields(deal_id = %path_params.deal_id))]
async fn decide_deal(
    State(market): State<MarketContext>,
    auth_state: AuthState,
    Path(path_params): Path<DealPathParams>,
    Json(request): Json<DealDecisionInput>,
) -> Result<(StatusCode, Json<DealDecision>)> {
    let outcome = market
        .best_deals()
        .admin_decision(path_params.deal_id, request, &auth_state.actor())
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        admin_id = %auth_state.account_id,
        changed = outcome.changed,
        "deal decision handled",
    );

    Ok((StatusCode::OK, Json(outcome.into())))
}

fn decide_deal_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Decide best deal")
        .description(
            "Sets the deal to `approved` or `rejected` with an optional note. Repeating \
             the stored decision changes nothing and reports `changed: false`. \
             Requires an administrator.",
        )
        .response::<200, Json<DealDecision>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Changes the price or validity of a deal.
#[tracing::instrument(skip_all, fields(deal_id = %path_params.deal_id))]
async fn edit_deal(
    State(market): State<MarketContext>,
    auth_state: AuthState,
    Path(path_params): Path<DealPathParams>,
    Json(request): Json<DealEditInput>,
) -> Result<(StatusCode, Json<BestDeal>)> {
    let deal = market
        .best_deals()
        .edit(path_params.deal_id, request, &auth_state.actor())
        .await?;

    Ok((StatusCode::OK, Json(deal.into())))
}

fn edit_deal_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Edit best deal")
        .description(
            "Only the seller, the creator or an administrator may edit. Depending on \
             server policy, an approved or rejected deal returns to review.",
        )
        .response::<200, Json<BestDeal>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Deletes a deal.
#[tracing::instrument(skip_all, fields(deal_id = %path_params.deal_id))]
async fn delete_deal(
    State(market): State<MarketContext>,
    auth_state: AuthState,
    Path(path_params): Path<DealPathParams>,
) -> Result<StatusCode> {
    market
        .best_deals()
        .delete(path_params.deal_id, &auth_state.actor())
        .await?;

    tracing::info!(target: TRACING_TARGET, "deal deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn delete_deal_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete best deal")
        .description("Only the seller, the creator or an administrator may delete.")
        .response::<204, ()>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Retrieves a deal visible to the caller.
#[tracing::instrument(skip_all, fields(deal_id = %path_params.deal_id))]
async fn get_deal(
    State(market): State<MarketContext>,
    auth_state: AuthState,
    Path(path_params): Path<DealPathParams>,
) -> Result<(StatusCode, Json<BestDeal>)> {
    let deal = market
        .best_deals()
        .get(path_params.deal_id, &auth_state.actor())
        .await?;

    Ok((StatusCode::OK, Json(deal.into())))
}

fn get_deal_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get best deal")
        .description(
            "Pending and rejected deals are only visible to their seller, their \
             creator and administrators; other callers receive 404.",
        )
        .response::<200, Json<BestDeal>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Lists deals the caller may read.
#[tracing::instrument(skip_all)]
async fn list_deals(
    State(market): State<MarketContext>,
    auth_state: AuthState,
    Query(pagination): Query<Pagination>,
    Query(query): Query<DealQuery>,
) -> Result<(StatusCode, Json<Page<BestDeal>>)> {
    pagination.validate()?;

    let page = market
        .best_deals()
        .list(query.into(), PageRequest::from(pagination), &auth_state.actor())
        .await?;

    Ok((StatusCode::OK, Json(deal_page(page))))
}

fn list_deals_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List best deals")
        .description(
            "Filters by seller, product and status, newest first. Callers other than \
             administrators see approved deals only, unless they filter on their own \
             `sellerId`.",
        )
        .response::<200, Json<Page<BestDeal>>>()
        .response::<400, Json<ErrorResponse>>()
}

/// Lists approved deals that have not expired.
#[tracing::instrument(skip_all)]
async fn list_active_deals(
    State(market): State<MarketContext>,
    Query(pagination): Query<Pagination>,
) -> Result<(StatusCode, Json<Page<BestDeal>>)> {
    pagination.validate()?;

    let page = market
        .best_deals()
        .active(PageRequest::from(pagination))
        .await?;

    tracing::debug!(
        target: TRACING_TARGET,
        total = page.total,
        "active deals listed",
    );

    Ok((StatusCode::OK, Json(deal_page(page))))
}

fn list_active_deals_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List active best deals")
        .description("Approved deals whose validity is unset or not yet passed.")
        .response::<200, Json<Page<BestDeal>>>()
        .response::<400, Json<ErrorResponse>>()
}

/// Returns best deal routes that require authentication.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/deals",
            get_with(list_deals, list_deals_docs).post_with(create_deal, create_deal_docs),
        )
        .api_route(
            "/deals/{dealId}",
            get_with(get_deal, get_deal_docs)
                .patch_with(edit_deal, edit_deal_docs)
                .delete_with(delete_deal, delete_deal_docs),
        )
        .api_route(
            "/deals/{dealId}/decision",
            post_with(decide_deal, decide_deal_docs),
        )
        .with_path_items(|item| item.tag("Best Deals"))
}

/// Returns best deal routes open to anonymous callers.
pub fn public_routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/deals/active",
            get_with(list_active_deals, list_active_deals_docs),
        )
        .with_path_items(|item| item.tag("Best Deals"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use bigdecimal::BigDecimal;
    use polyhub_core::mock::MemoryStore;
    use polyhub_core::types::AccountRole;
    use serde_json::{Value, json};

    use crate::handler::test::{TestMarket, bearer};

    #[tokio::test]
    async fn seller_creates_deal_once() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;
        let seller = market.store.add_account(AccountRole::Seller, "Seller").await;
        let product = market.store.add_product(seller, "HDPE 5502").await;
        let token = bearer(&market, seller, AccountRole::Seller)?;

        let request = json!({ "productId": product, "offerPrice": "1250.50" });

        let response = market
            .server
            .post("/deals")
            .authorization_bearer(&token)
            .json(&request)
            .await;
        response.assert_status(StatusCode::CREATED);
        let first: Value = response.json();
        assert_eq!(first["created"], json!(true));
        assert_eq!(first["deal"]["status"], json!("pending"));

        let response = market
            .server
            .post("/deals")
            .authorization_bearer(&token)
            .json(&request)
            .await;
        response.assert_status_ok();
        let second: Value = response.json();
        assert_eq!(second["created"], json!(false));
        assert_eq!(second["deal"]["id"], first["deal"]["id"]);
        Ok(())
    }

    #[tokio::test]
    async fn admin_decision_is_idempotent() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;
        let admin = market.store.add_account(AccountRole::Admin, "Admin").await;
        let seller = market.store.add_account(AccountRole::Seller, "Seller").await;
        let product = market.store.add_product(seller, "PP Homo").await;

        let seller_token = bearer(&market, seller, AccountRole::Seller)?;
        let admin_token = bearer(&market, admin, AccountRole::Admin)?;

        let created: Value = market
            .server
            .post("/deals")
            .authorization_bearer(&seller_token)
            .json(&json!({ "productId": product, "offerPrice": BigDecimal::from(900).to_string() }))
            .await
            .json();
        let deal_id = created["deal"]["id"].as_str().unwrap_or_default().to_owned();

        let decision = json!({ "status": "rejected", "adminNote": "price too high" });
        let path = format!("/deals/{deal_id}/decision");

        let response = market
            .server
            .post(&path)
            .authorization_bearer(&admin_token)
            .json(&decision)
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["changed"], json!(true));
        assert_eq!(body["deal"]["adminNote"], json!("price too high"));

        let writes = market.store.deal_writes().await;
        let response = market
            .server
            .post(&path)
            .authorization_bearer(&admin_token)
            .json(&decision)
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["changed"], json!(false));
        assert_eq!(market.store.deal_writes().await, writes);

        let response = market
            .server
            .post(&path)
            .authorization_bearer(&seller_token)
            .json(&decision)
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
        Ok(())
    }

    #[tokio::test]
    async fn active_deals_are_public() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;
        let store: &MemoryStore = &market.store;
        let admin = store.add_account(AccountRole::Admin, "Admin").await;
        let seller = store.add_account(AccountRole::Seller, "Seller").await;
        let approved_product = store.add_product(seller, "LDPE Film").await;
        let pending_product = store.add_product(seller, "PVC Resin").await;

        let seller_token = bearer(&market, seller, AccountRole::Seller)?;
        let admin_token = bearer(&market, admin, AccountRole::Admin)?;

        let mut ids = Vec::new();
        for product in [approved_product, pending_product] {
            let created: Value = market
                .server
                .post("/deals")
                .authorization_bearer(&seller_token)
                .json(&json!({ "productId": product, "offerPrice": "10" }))
                .await
                .json();
            ids.push(created["deal"]["id"].as_str().unwrap_or_default().to_owned());
        }

        market
            .server
            .post(&format!("/deals/{}/decision", ids[0]))
            .authorization_bearer(&admin_token)
            .json(&json!({ "status": "approved" }))
            .await
            .assert_status_ok();

        let response = market.server.get("/deals/active").await;
        response.assert_status_ok();
        let page: Value = response.json();
        assert_eq!(page["total"], json!(1));
        assert_eq!(page["items"][0]["id"], json!(ids[0]));
        assert_eq!(page["items"][0]["isActive"], json!(true));
        Ok(())
    }

    #[tokio::test]
    async fn rejected_deals_are_hidden_from_other_accounts() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;
        let store: &MemoryStore = &market.store;
        let admin = store.add_account(AccountRole::Admin, "Admin").await;
        let seller = store.add_account(AccountRole::Seller, "Seller").await;
        let buyer = store.add_account(AccountRole::Buyer, "Buyer").await;
        let product = store.add_product(seller, "ABS Natural").await;

        let seller_token = bearer(&market, seller, AccountRole::Seller)?;
        let admin_token = bearer(&market, admin, AccountRole::Admin)?;
        let buyer_token = bearer(&market, buyer, AccountRole::Buyer)?;

        let created: Value = market
            .server
            .post("/deals")
            .authorization_bearer(&seller_token)
            .json(&json!({ "productId": product, "offerPrice": "700" }))
            .await
            .json();
        let deal_id = created["deal"]["id"].as_str().unwrap_or_default().to_owned();
        let path = format!("/deals/{deal_id}");

        market
            .server
            .post(&format!("{path}/decision"))
            .authorization_bearer(&admin_token)
            .json(&json!({ "status": "rejected", "adminNote": "margin too thin" }))
            .await
            .assert_status_ok();

        market
            .server
            .get(&path)
            .authorization_bearer(&buyer_token)
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let response = market
            .server
            .get("/deals")
            .add_query_param("status", "rejected")
            .authorization_bearer(&buyer_token)
            .await;
        response.assert_status_ok();
        let page: Value = response.json();
        assert_eq!(page["total"], json!(0));

        let response = market
            .server
            .get("/deals")
            .authorization_bearer(&buyer_token)
            .await;
        let page: Value = response.json();
        assert_eq!(page["total"], json!(0));

        let response = market
            .server
            .get(&path)
            .authorization_bearer(&seller_token)
            .await;
        response.assert_status_ok();
        let deal: Value = response.json();
        assert_eq!(deal["adminNote"], json!("margin too thin"));

        let response = market
            .server
            .get("/deals")
            .add_query_param("sellerId", seller)
            .authorization_bearer(&seller_token)
            .await;
        let page: Value = response.json();
        assert_eq!(page["total"], json!(1));

        let response = market
            .server
            .get("/deals")
            .authorization_bearer(&admin_token)
            .await;
        let page: Value = response.json();
        assert_eq!(page["total"], json!(1));
        Ok(())
    }

    #[tokio::test]
    async fn deals_require_a_token() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;
        market
            .server
            .get("/deals")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }
}
