//! Quote request handlers.
//!
//! Buyers open product or deal quotes, the resolved seller responds, and
//! both sides move the request through its status table. Request bodies
//! are validated by [`QuoteRequestManager`] so the same rules hold for
//! every caller of `polyhub-core`.
//!
//! [`QuoteRequestManager`]: polyhub_core::quote::QuoteRequestManager

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use polyhub_core::MarketContext;
use polyhub_core::quote::{NewQuote, SellerResponseInput, StatusUpdate};
use polyhub_core::types::PageRequest;
use validator::Validate;

use super::request::{Pagination, QuotePathParams, QuoteQuery};
use super::response::{ErrorResponse, QuoteRequest, QuoteRequestsPage, QuoteResponded};
use crate::extract::{AuthState, Json, Path, Query};
use crate::handler::Result;
use crate::service::ServiceState;

/// Tracing target for quote request operations.
const TRACING_TARGET: &str = "polyhub_server::handler::quotes";

/// Opens a quote request addressed to the resolved seller.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn create_quote(
    State(market): State<MarketContext>,
    auth_state: AuthState,
    Json(request): Json<NewQuote>,
) -> Result<(StatusCode, Json<QuoteRequest>)> {
    let quote = market
        .quote_requests()
        .create(&auth_state.actor(), request)
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        quote_id = %quote.id,
        "quote request opened",
    );

    Ok((StatusCode::CREATED, Json(quote.into())))
}

fn create_quote_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Create quote request")
        .description(
            "Buyers request a quote on a catalog product (`product_quote`) or on an \
             active best deal (`deal_quote`). The seller is resolved from the product \
             or the deal and receives a notification.",
        )
        .response::<201, Json<QuoteRequest>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Lists the quote requests visible to the caller.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn list_quotes(
    State(market): State<MarketContext>,
    auth_state: AuthState,
    Query(pagination): Query<Pagination>,
    Query(query): Query<QuoteQuery>,
) -> Result<(StatusCode, Json<QuoteRequestsPage>)> {
    pagination.validate()?;
    query.validate()?;

    let page = market
        .quote_requests()
        .list(
            &auth_state.actor(),
            query.into_filter(),
            PageRequest::from(pagination),
        )
        .await?;

    Ok((StatusCode::OK, Json(page.into())))
}

fn list_quotes_docs(op: TransformOperation) -> TransformOperation {
    op.summary("List quote requests")
        .description(
            "Newest first, with counts by status, type and priority over the whole \
             filtered set. Buyers and sellers only see requests they take part in.",
        )
        .response::<200, Json<QuoteRequestsPage>>()
        .response::<400, Json<ErrorResponse>>()
}

/// Retrieves a quote request with its seller.
#[tracing::instrument(skip_all, fields(quote_id = %path_params.quote_id))]
async fn get_quote(
    State(market): State<MarketContext>,
    auth_state: AuthState,
    Path(path_params): Path<QuotePathParams>,
) -> Result<(StatusCode, Json<QuoteRequest>)> {
    let quote = market
        .quote_requests()
        .get(path_params.quote_id, &auth_state.actor())
        .await?;

    Ok((StatusCode::OK, Json(quote.into())))
}

fn get_quote_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get quote request")
        .response::<200, Json<QuoteRequest>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Moves a quote request to a new status.
#[tracing::instrument(skip_all, fields(quote_id = %path_params.quote_id))]
async fn update_quote_status(
    State(market): State<MarketContext>,
    auth_state: AuthState,
    Path(path_params): Path<QuotePathParams>,
    Json(request): Json<StatusUpdate>,
) -> Result<(StatusCode, Json<QuoteRequest>)> {
    let quote = market
        .quote_requests()
        .update_status(path_params.quote_id, request, &auth_state.actor())
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %auth_state.account_id,
        status = %quote.status(),
        version = quote.version,
        "quote request status updated",
    );

    Ok((StatusCode::OK, Json(quote.into())))
}

fn update_quote_status_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update quote request status")
        .description(
            "Appends a status entry. Illegal transitions and statuses the caller may \
             not set are rejected with 400. Sending the last seen `version` turns a \
             concurrent change into 409.",
        )
        .response::<200, Json<QuoteRequest>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Stores the seller's quotation.
#[tracing::instrument(skip_all, fields(quote_id = %path_params.quote_id))]
async fn respond_to_quote(
    State(market): State<MarketContext>,
    auth_state: AuthState,
    Path(path_params): Path<QuotePathParams>,
    Json(request): Json<SellerResponseInput>,
) -> Result<(StatusCode, Json<QuoteResponded>)> {
    let outcome = market
        .quote_requests()
        .seller_respond(path_params.quote_id, &auth_state.actor(), request)
        .await?;

    if outcome.document_dropped {
        tracing::warn!(
            target: TRACING_TARGET,
            "seller response saved without its quotation document",
        );
    }

    Ok((StatusCode::OK, Json(outcome.into())))
}

fn respond_to_quote_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Respond to quote request")
        .description(
            "Only the resolved seller may respond, and not once the request is closed. \
             The status is left unchanged.",
        )
        .response::<200, Json<QuoteResponded>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Deletes a quote request.
#[tracing::instrument(skip_all, fields(quote_id = %path_params.quote_id))]
async fn delete_quote(
    State(market): State<MarketContext>,
    auth_state: AuthState,
    Path(path_params): Path<QuotePathParams>,
) -> Result<StatusCode> {
    market
        .quote_requests()
        .delete(path_params.quote_id, &auth_state.actor())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

fn delete_quote_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Delete quote request")
        .description("Only the requesting buyer or an administrator may delete.")
        .response::<204, ()>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns routes for the quote request lifecycle.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/quotes",
            get_with(list_quotes, list_quotes_docs).post_with(create_quote, create_quote_docs),
        )
        .api_route(
            "/quotes/{quoteId}",
            get_with(get_quote, get_quote_docs).delete_with(delete_quote, delete_quote_docs),
        )
        .api_route(
            "/quotes/{quoteId}/status",
            patch_with(update_quote_status, update_quote_status_docs),
        )
        .api_route(
            "/quotes/{quoteId}/response",
            post_with(respond_to_quote, respond_to_quote_docs),
        )
        .with_path_items(|item| item.tag("Quote Requests"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use polyhub_core::types::AccountRole;
    use serde_json::{Value, json};
    use uuid::Uuid;

    use crate::handler::test::{TestMarket, bearer};

    struct Parties {
        buyer: String,
        seller: String,
        outsider: String,
        product_id: Uuid,
    }

    async fn parties(market: &TestMarket) -> anyhow::Result<Parties> {
        let buyer = market.store.add_account(AccountRole::Buyer, "Buyer").await;
        let seller = market.store.add_account(AccountRole::Seller, "Seller").await;
        let outsider = market.store.add_account(AccountRole::Buyer, "Outsider").await;
        let product_id = market.store.add_product(seller, "HDPE Pipe Grade").await;

        Ok(Parties {
            buyer: bearer(market, buyer, AccountRole::Buyer)?,
            seller: bearer(market, seller, AccountRole::Seller)?,
            outsider: bearer(market, outsider, AccountRole::Buyer)?,
            product_id,
        })
    }

    async fn open_quote(market: &TestMarket, parties: &Parties) -> Value {
        market
            .server
            .post("/quotes")
            .authorization_bearer(&parties.buyer)
            .json(&json!({
                "requestType": "product_quote",
                "productId": parties.product_id,
                "quantity": "20",
                "uom": "MT",
                "country": "India",
                "destination": "Nhava Sheva",
                "message": "Need pricing for Q3",
            }))
            .await
            .json()
    }

    #[tokio::test]
    async fn buyer_opens_product_quote() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;
        let parties = parties(&market).await?;

        let response = market
            .server
            .post("/quotes")
            .authorization_bearer(&parties.buyer)
            .json(&json!({
                "requestType": "product_quote",
                "productId": parties.product_id,
                "quantity": "5",
                "uom": "MT",
                "country": "Germany",
                "destination": "Hamburg",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let quote: Value = response.json();
        assert_eq!(quote["status"], json!("pending"));
        assert_eq!(quote["requestType"], json!("product_quote"));
        assert_eq!(quote["unifiedShippingLocation"], json!("Germany"));
        assert_eq!(quote["statusHistory"].as_array().map(Vec::len), Some(1));
        assert_eq!(market.store.notifications().await.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn sellers_cannot_request_quotes() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;
        let parties = parties(&market).await?;

        market
            .server
            .post("/quotes")
            .authorization_bearer(&parties.seller)
            .json(&json!({
                "requestType": "product_quote",
                "productId": parties.product_id,
                "quantity": "5",
                "uom": "MT",
                "country": "Germany",
                "destination": "Hamburg",
            }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
        assert_eq!(market.store.quote_count().await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn missing_fields_are_reported() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;
        let parties = parties(&market).await?;

        let response = market
            .server
            .post("/quotes")
            .authorization_bearer(&parties.buyer)
            .json(&json!({ "requestType": "deal_quote" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(market.store.quote_count().await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn status_flow_and_stale_version() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;
        let parties = parties(&market).await?;
        let quote = open_quote(&market, &parties).await;
        let path = format!("/quotes/{}/status", quote["id"].as_str().unwrap_or_default());
        let version = quote["version"].clone();

        let response = market
            .server
            .patch(&path)
            .authorization_bearer(&parties.seller)
            .json(&json!({ "status": "responded", "version": version }))
            .await;
        response.assert_status_ok();
        let updated: Value = response.json();
        assert_eq!(updated["status"], json!("responded"));
        assert_eq!(updated["statusHistory"][1]["updatedBy"], json!("seller"));

        market
            .server
            .patch(&path)
            .authorization_bearer(&parties.buyer)
            .json(&json!({ "status": "accepted", "version": version }))
            .await
            .assert_status(StatusCode::CONFLICT);

        market
            .server
            .patch(&path)
            .authorization_bearer(&parties.buyer)
            .json(&json!({ "status": "shipped" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        market
            .server
            .patch(&path)
            .authorization_bearer(&parties.outsider)
            .json(&json!({ "status": "cancelled" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
        Ok(())
    }

    #[tokio::test]
    async fn seller_response_keeps_status() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;
        let parties = parties(&market).await?;
        let quote = open_quote(&market, &parties).await;
        let path = format!("/quotes/{}/response", quote["id"].as_str().unwrap_or_default());

        let response = market
            .server
            .post(&path)
            .authorization_bearer(&parties.seller)
            .json(&json!({
                "message": "Ex-works price",
                "quotedPrice": "1180",
                "quotationDocument": "not a document",
            }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["documentDropped"], json!(true));
        assert_eq!(body["quote"]["status"], json!("pending"));
        assert_eq!(body["quote"]["sellerResponse"]["message"], json!("Ex-works price"));

        market
            .server
            .post(&path)
            .authorization_bearer(&parties.buyer)
            .json(&json!({ "message": "x", "quotedPrice": "1" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
        Ok(())
    }

    #[tokio::test]
    async fn listing_is_scoped_to_participants() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;
        let parties = parties(&market).await?;
        open_quote(&market, &parties).await;
        open_quote(&market, &parties).await;

        let page: Value = market
            .server
            .get("/quotes")
            .authorization_bearer(&parties.seller)
            .await
            .json();
        assert_eq!(page["total"], json!(2));
        assert_eq!(page["summary"]["byStatus"]["pending"], json!(2));

        let page: Value = market
            .server
            .get("/quotes")
            .authorization_bearer(&parties.outsider)
            .await
            .json();
        assert_eq!(page["total"], json!(0));
        Ok(())
    }

    #[tokio::test]
    async fn only_the_buyer_deletes() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;
        let parties = parties(&market).await?;
        let quote = open_quote(&market, &parties).await;
        let path = format!("/quotes/{}", quote["id"].as_str().unwrap_or_default());

        market
            .server
            .delete(&path)
            .authorization_bearer(&parties.seller)
            .await
            .assert_status(StatusCode::FORBIDDEN);

        market
            .server
            .delete(&path)
            .authorization_bearer(&parties.buyer)
            .await
            .assert_status(StatusCode::NO_CONTENT);

        market
            .server
            .get(&path)
            .authorization_bearer(&parties.buyer)
            .await
            .assert_status_not_found();
        Ok(())
    }
}
