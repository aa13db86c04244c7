//! Authentication middleware for private routes.

use axum::Router;
use axum::extract::Request;
use axum::middleware::{Next, from_fn_with_state};
use axum::response::Response;

use crate::extract::AuthState;
use crate::service::ServiceState;

/// Extension trait for `axum::`[`Router`] to require a session token.
pub trait RouterAuthExt<S> {
    /// Requires a valid session token on every route.
    fn with_authentication(self, state: ServiceState) -> Self;

    /// Requires a valid session token of an administrator on every route.
    fn with_admin_authentication(self, state: ServiceState) -> Self;
}

impl<S> RouterAuthExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_authentication(self, state: ServiceState) -> Self {
        self.layer(from_fn_with_state(state, require_authentication))
    }

    fn with_admin_authentication(self, state: ServiceState) -> Self {
        self.layer(from_fn_with_state(state, super::require_admin))
    }
}

/// Rejects the request unless it carries a valid bearer token.
///
/// Missing, malformed, forged and expired tokens are all answered with 401
/// before the handler runs. The decoded claims are cached in the request
/// extensions, so handlers extracting [`AuthState`] do not decode twice.
pub async fn require_authentication(
    AuthState(_): AuthState,
    request: Request,
    next: Next,
) -> Response {
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use axum::routing::get;
    use axum_test::TestServer;
    use jiff::{SignedDuration, Timestamp};
    use polyhub_core::mock::MemoryStore;
    use polyhub_core::types::AccountRole;
    use polyhub_postgres::{PgClient, PgConfig};
    use uuid::Uuid;

    use super::*;
    use crate::extract::AuthClaims;
    use crate::service::{SessionKeys, SessionKeysConfig};

    #[tokio::test]
    async fn tokens_are_checked_before_the_handler() -> anyhow::Result<()> {
        let keys = SessionKeys::from_config(&SessionKeysConfig::new(
            "polyhub-test-secret-at-least-32-bytes-long",
        ))?;
        let postgres = PgClient::new(PgConfig::new("postgres://polyhub@localhost/polyhub"))?;
        let state = ServiceState::from_parts(postgres, MemoryStore::new().context(), keys.clone());

        let app = Router::new()
            .route("/me", get(|| async { "ok" }))
            .with_authentication(state.clone())
            .with_state(state);
        let server = TestServer::new(app)?;

        let buyer = Uuid::now_v7();
        let fresh = AuthClaims::new(buyer, AccountRole::Buyer, Timestamp::now(), keys.token_ttl())
            .encode(&keys)?;
        let issued = Timestamp::now()
            .checked_sub(keys.token_ttl())?
            .checked_sub(SignedDuration::from_mins(5))?;
        let stale = AuthClaims::new(buyer, AccountRole::Buyer, issued, keys.token_ttl())
            .encode(&keys)?;

        server.get("/me").await.assert_status_unauthorized();
        server
            .get("/me")
            .authorization_bearer(stale)
            .await
            .assert_status_unauthorized();
        server
            .get("/me")
            .authorization_bearer(fresh)
            .await
            .assert_text("ok");
        Ok(())
    }
}
