//! Admin dashboard handler.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use polyhub_core::MarketContext;
use polyhub_core::dashboard::DashboardSnapshot;

use super::response::ErrorResponse;
use crate::extract::{AuthState, Json};
use crate::handler::Result;
use crate::service::ServiceState;

/// Returns marketplace rollups, served from cache while fresh.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.account_id))]
async fn get_dashboard(
    State(market): State<MarketContext>,
    auth_state: AuthState,
) -> Result<(StatusCode, Json<DashboardSnapshot>)> {
    let snapshot = market.dashboard().snapshot(&auth_state.actor()).await?;
    Ok((StatusCode::OK, Json(snapshot)))
}

fn get_dashboard_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get dashboard")
        .description(
            "Quote and deal counts by status and type plus a monthly histogram. \
             Computed at most once per cache period. Requires an administrator.",
        )
        .response::<200, Json<DashboardSnapshot>>()
        .response::<403, Json<ErrorResponse>>()
}

/// Returns the admin dashboard route.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/dashboard", get_with(get_dashboard, get_dashboard_docs))
        .with_path_items(|item| item.tag("Dashboard"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use polyhub_core::types::AccountRole;
    use serde_json::{Value, json};

    use crate::handler::test::{TestMarket, bearer};

    #[tokio::test]
    async fn dashboard_is_admin_only() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;
        let seller = market.store.add_account(AccountRole::Seller, "Seller").await;
        let token = bearer(&market, seller, AccountRole::Seller)?;

        market
            .server
            .get("/dashboard")
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::FORBIDDEN);
        Ok(())
    }

    #[tokio::test]
    async fn dashboard_is_cached() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;
        let admin = market.store.add_account(AccountRole::Admin, "Admin").await;
        let seller = market.store.add_account(AccountRole::Seller, "Seller").await;
        let product = market.store.add_product(seller, "ABS Natural").await;
        let admin_token = bearer(&market, admin, AccountRole::Admin)?;
        let seller_token = bearer(&market, seller, AccountRole::Seller)?;

        let first: Value = market
            .server
            .get("/dashboard")
            .authorization_bearer(&admin_token)
            .await
            .json();
        assert_eq!(first["totalDeals"], json!(0));
        assert_eq!(first["monthly"].as_array().map(Vec::len), Some(12));

        market
            .server
            .post("/deals")
            .authorization_bearer(&seller_token)
            .json(&json!({ "productId": product, "offerPrice": "75" }))
            .await
            .assert_status(StatusCode::CREATED);

        let cached: Value = market
            .server
            .get("/dashboard")
            .authorization_bearer(&admin_token)
            .await
            .json();
        assert_eq!(cached["totalDeals"], json!(0));
        assert_eq!(cached["generatedAt"], first["generatedAt"]);

        market.store.clear_cache().await;
        let fresh: Value = market
            .server
            .get("/dashboard")
            .authorization_bearer(&admin_token)
            .await
            .json();
        assert_eq!(fresh["totalDeals"], json!(1));
        assert_eq!(fresh["dealsByStatus"]["pending"], json!(1));
        Ok(())
    }
}
