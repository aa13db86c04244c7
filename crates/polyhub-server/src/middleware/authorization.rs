//! Role gate middleware.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::TRACING_TARGET_AUTHORIZATION;
use crate::extract::AuthState;

/// Requires the authenticated account to be an administrator.
///
/// Includes the token check of [`require_authentication`], so it can be
/// layered on its own.
///
/// [`require_authentication`]: super::require_authentication
pub async fn require_admin(auth_state: AuthState, request: Request, next: Next) -> Response {
    if let Err(error) = auth_state.authorize_admin() {
        tracing::warn!(
            target: TRACING_TARGET_AUTHORIZATION,
            account_id = %auth_state.account_id,
            path = %request.uri().path(),
            "admin route refused",
        );
        return error.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::routing::get;
    use axum_test::TestServer;
    use jiff::Timestamp;
    use polyhub_core::mock::MemoryStore;
    use polyhub_core::types::AccountRole;
    use polyhub_postgres::{PgClient, PgConfig};
    use uuid::Uuid;

    use crate::extract::AuthClaims;
    use crate::middleware::RouterAuthExt;
    use crate::service::{ServiceState, SessionKeys, SessionKeysConfig};

    #[tokio::test]
    async fn admin_gate() -> anyhow::Result<()> {
        let keys = SessionKeys::from_config(&SessionKeysConfig::new(
            "polyhub-test-secret-at-least-32-bytes-long",
        ))?;
        let postgres = PgClient::new(PgConfig::new("postgres://polyhub@localhost/polyhub"))?;
        let state = ServiceState::from_parts(postgres, MemoryStore::new().context(), keys.clone());

        let app = Router::new()
            .route("/admin", get(|| async { "ok" }))
            .with_admin_authentication(state.clone())
            .with_state(state);
        let server = TestServer::new(app)?;

        let token = |role| {
            AuthClaims::new(Uuid::now_v7(), role, Timestamp::now(), keys.token_ttl()).encode(&keys)
        };

        server.get("/admin").await.assert_status_unauthorized();
        server
            .get("/admin")
            .authorization_bearer(token(AccountRole::Seller)?)
            .await
            .assert_status_forbidden();
        server
            .get("/admin")
            .authorization_bearer(token(AccountRole::Admin)?)
            .await
            .assert_status_ok();
        Ok(())
    }
}
