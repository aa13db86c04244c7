//! Registration and login handlers.
//!
//! Both endpoints answer with a bearer token. Tokens are stateless: nothing
//! is stored server-side and logout is left to the client.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use jiff::Timestamp;
use polyhub_postgres::PgClient;
use polyhub_postgres::model::Account as AccountModel;
use polyhub_postgres::query::AccountRepository;
use polyhub_postgres::types::AccountRole;

use super::request::{Login, Signup, normalized_email};
use super::response::{AuthToken, ErrorResponse};
use crate::extract::{AuthClaims, Json, ValidateJson};
use crate::handler::{ErrorKind, Result};
use crate::service::{PasswordHasher, ServiceState, SessionKeys, core_role};

/// Tracing target for authentication operations.
const TRACING_TARGET: &str = "polyhub_server::handler::authentication";

/// Signs a fresh token for `account`.
fn issue_token(session_keys: &SessionKeys, account: AccountModel) -> Result<AuthToken> {
    let auth_claims = AuthClaims::new(
        account.id,
        core_role(account.role),
        Timestamp::now(),
        session_keys.token_ttl(),
    );

    let access_token = auth_claims.encode(session_keys)?;
    Ok(AuthToken::bearer(
        access_token,
        auth_claims.expires_at(),
        account.into(),
    ))
}

/// Registers an account and logs it in.
#[tracing::instrument(skip_all)]
async fn signup(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    State(session_keys): State<SessionKeys>,
    ValidateJson(request): ValidateJson<Signup>,
) -> Result<(StatusCode, Json<AuthToken>)> {
    if request.role == AccountRole::Admin {
        return Err(ErrorKind::Forbidden
            .with_message("Administrator accounts cannot be self-registered")
            .with_resource("account"));
    }

    let new_account = request.to_model();
    let password_hash = password_hasher.hash_password(&request.password)?;

    let mut conn = pg_client.get_connection().await?;
    let account = conn.create_account(new_account, password_hash).await?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %account.id,
        role = %account.role,
        "account registered",
    );

    let token = issue_token(&session_keys, account)?;
    Ok((StatusCode::CREATED, Json(token)))
}

fn signup_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Register an account")
        .description(
            "Creates a buyer, seller or expert account and returns a session token. \
             Email addresses are compared case-insensitively.",
        )
        .response::<201, Json<AuthToken>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<403, Json<ErrorResponse>>()
        .response::<409, Json<ErrorResponse>>()
}

/// Verifies credentials and issues a token.
#[tracing::instrument(skip_all)]
async fn login(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    State(session_keys): State<SessionKeys>,
    ValidateJson(request): ValidateJson<Login>,
) -> Result<(StatusCode, Json<AuthToken>)> {
    let email_address = normalized_email(&request.email_address);

    let mut conn = pg_client.get_connection().await?;
    let Some((account, credential)) = conn.find_credential_by_email(&email_address).await? else {
        password_hasher.verify_dummy_password(&request.password);
        tracing::warn!(
            target: TRACING_TARGET,
            account_exists = false,
            "login failed",
        );

        return Err(ErrorKind::Unauthorized
            .with_message("Invalid email address or password")
            .with_resource("authentication"));
    };

    if let Err(error) = password_hasher.verify_password(&request.password, &credential.password_hash)
    {
        tracing::warn!(
            target: TRACING_TARGET,
            account_id = %account.id,
            account_exists = true,
            "login failed",
        );
        return Err(error);
    }

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %account.id,
        "login successful",
    );

    let token = issue_token(&session_keys, account)?;
    Ok((StatusCode::OK, Json(token)))
}

fn login_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Log in")
        .description("Checks the email and password and returns a session token.")
        .response::<200, Json<AuthToken>>()
        .response::<400, Json<ErrorResponse>>()
        .response::<401, Json<ErrorResponse>>()
}

/// Returns routes for registration and login.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/auth/signup", post_with(signup, signup_docs))
        .api_route("/auth/login", post_with(login, login_docs))
        .with_path_items(|item| item.tag("Authentication"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::handler::test::TestMarket;

    #[tokio::test]
    async fn administrators_cannot_self_register() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;

        let response = market
            .server
            .post("/auth/signup")
            .json(&json!({
                "displayName": "Platform Ops",
                "emailAddress": "ops@polyhub.test",
                "password": "polymer123",
                "role": "admin",
            }))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);

        let body: Value = response.json();
        assert_eq!(body["resource"], json!("account"));
        Ok(())
    }

    #[tokio::test]
    async fn signup_reports_each_invalid_field() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;

        let response = market
            .server
            .post("/auth/signup")
            .json(&json!({
                "displayName": "Acme Buyer",
                "emailAddress": "not-an-email",
                "password": "polymers",
            }))
            .await;
        response.assert_status_bad_request();

        let body: Value = response.json();
        let fields: Vec<_> = body["validation"]
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(|detail| detail["field"].as_str())
            .collect();
        assert_eq!(fields, vec!["emailAddress", "password"]);
        Ok(())
    }

    #[tokio::test]
    async fn login_needs_an_email_address() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;

        market
            .server
            .post("/auth/login")
            .json(&json!({ "emailAddress": "buyer", "password": "polymer123" }))
            .await
            .assert_status_bad_request();

        market
            .server
            .post("/auth/login")
            .json(&json!({ "emailAddress": "buyer@acme.test" }))
            .await
            .assert_status_bad_request();
        Ok(())
    }
}
