//! Account profile handlers.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use polyhub_postgres::PgClient;
use polyhub_postgres::query::AccountRepository;
use uuid::Uuid;

use super::request::{AccountPathParams, UpdateAccount, UpdateVerification};
use super::response::{Account, ErrorResponse};
use crate::extract::{AuthState, Json, Path, PgPool, ValidateJson};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for account operations.
const TRACING_TARGET: &str = "polyhub_server::handler::accounts";

fn account_not_found(account_id: Uuid) -> Error<'static> {
    ErrorKind::NotFound
        .with_resource("account")
        .with_message("Account not found")
        .with_context(format!("Account ID: {account_id}"))
}

/// Retrieves the authenticated account.
#[tracing::instrument(skip_all, fields(account_id = %auth_claims.account_id))]
async fn get_own_account(
    AuthState(auth_claims): AuthState,
    PgPool(mut conn): PgPool,
) -> Result<(StatusCode, Json<Account>)> {
    let Some(account) = conn.find_account_by_id(auth_claims.account_id).await? else {
        return Err(account_not_found(auth_claims.account_id));
    };

    Ok((StatusCode::OK, Json(account.into())))
}

fn get_own_account_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get own account")
        .description("Returns the profile of the authenticated account.")
        .response::<200, Json<Account>>()
        .response::<401, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Updates the authenticated account's profile.
#[tracing::instrument(skip_all, fields(account_id = %auth_claims.account_id))]
async fn update_own_account(
    State(pg_client): State<PgClient>,
    AuthState(auth_claims): AuthState,
    ValidateJson(request): ValidateJson<UpdateAccount>,
) -> Result<(StatusCode, Json<Account>)> {
    let mut conn = pg_client.get_connection().await?;
    let account = conn
        .update_account(auth_claims.account_id, request.into_model())
        .await?;

    tracing::info!(target: TRACING_TARGET, "account updated");
    Ok((StatusCode::OK, Json(account.into())))
}

fn update_own_account_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Update own account")
        .description("Changes the display name or company of the authenticated account.")
        .response::<200, Json<Account>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Retrieves any account. Admin only.
#[tracing::instrument(skip_all, fields(account_id = %path_params.account_id))]
async fn get_account(
    State(pg_client): State<PgClient>,
    auth_state: AuthState,
    Path(path_params): Path<AccountPathParams>,
) -> Result<(StatusCode, Json<Account>)> {
    auth_state.authorize_admin()?;

    let mut conn = pg_client.get_connection().await?;

    let Some(account) = conn.find_account_by_id(path_params.account_id).await? else {
        return Err(account_not_found(path_params.account_id));
    };

    Ok((StatusCode::OK, Json(account.into())))
}

fn get_account_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get account")
        .description("Returns any account. Requires an administrator.")
        .response::<200, Json<Account>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Sets the verification status of an account. Admin only.
#[tracing::instrument(skip_all, fields(account_id = %path_params.account_id))]
async fn update_verification(
    State(pg_client): State<PgClient>,
    auth_state: AuthState,
    Path(path_params): Path<AccountPathParams>,
    ValidateJson(request): ValidateJson<UpdateVerification>,
) -> Result<(StatusCode, Json<Account>)> {
    auth_state.authorize_admin()?;

    let mut conn = pg_client.get_connection().await?;

    if conn.find_account_by_id(path_params.account_id).await?.is_none() {
        return Err(account_not_found(path_params.account_id));
    }

    let account = conn
        .set_verification_status(path_params.account_id, request.verification_status)
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        admin_id = %auth_state.account_id,
        verification_status = %account.verification_status,
        "verification status changed",
    );

    Ok((StatusCode::OK, Json(account.into())))
}

fn update_verification_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Set verification status")
        .description("Approves, rejects or verifies an account. Requires an administrator.")
        .response::<200, Json<Account>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<404, Json<ErrorResponse>>()
}

/// Returns routes for account management.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/accounts/me",
            get_with(get_own_account, get_own_account_docs)
                .patch_with(update_own_account, update_own_account_docs),
        )
        .api_route("/accounts/{accountId}", get_with(get_account, get_account_docs))
        .api_route(
            "/accounts/{accountId}/verification",
            patch_with(update_verification, update_verification_docs),
        )
        .with_path_items(|item| item.tag("Accounts"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use polyhub_core::types::AccountRole;
    use serde_json::{Value, json};
    use uuid::Uuid;

    use crate::handler::test::{TestMarket, bearer};

    #[tokio::test]
    async fn own_account_requires_a_token() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;
        market
            .server
            .get("/accounts/me")
            .await
            .assert_status_unauthorized();
        market
            .server
            .patch("/accounts/me")
            .json(&json!({ "displayName": "Acme" }))
            .await
            .assert_status_unauthorized();
        Ok(())
    }

    #[tokio::test]
    async fn other_accounts_are_admin_only() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;
        let account_id = Uuid::now_v7();

        for role in [AccountRole::Buyer, AccountRole::Seller, AccountRole::Expert] {
            let token = bearer(&market, Uuid::now_v7(), role)?;

            market
                .server
                .get(&format!("/accounts/{account_id}"))
                .authorization_bearer(&token)
                .await
                .assert_status(StatusCode::FORBIDDEN);

            market
                .server
                .patch(&format!("/accounts/{account_id}/verification"))
                .authorization_bearer(&token)
                .json(&json!({ "verificationStatus": "verified" }))
                .await
                .assert_status(StatusCode::FORBIDDEN);
        }
        Ok(())
    }

    #[tokio::test]
    async fn unknown_verification_status_is_rejected() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;
        let token = bearer(&market, Uuid::now_v7(), AccountRole::Admin)?;

        let response = market
            .server
            .patch(&format!("/accounts/{}/verification", Uuid::now_v7()))
            .authorization_bearer(&token)
            .json(&json!({ "verificationStatus": "golden" }))
            .await;
        response.assert_status_bad_request();
        Ok(())
    }

    #[tokio::test]
    async fn profile_updates_are_validated() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;
        let token = bearer(&market, Uuid::now_v7(), AccountRole::Seller)?;

        let response = market
            .server
            .patch("/accounts/me")
            .authorization_bearer(&token)
            .json(&json!({ "displayName": "x" }))
            .await;
        response.assert_status_bad_request();

        let body: Value = response.json();
        assert_eq!(body["name"], json!("validation_failed"));
        assert_eq!(body["validation"][0]["field"], json!("displayName"));
        Ok(())
    }
}
