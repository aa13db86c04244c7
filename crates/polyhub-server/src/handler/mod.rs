//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! ```rust,no_run
//! use polyhub_server::handler::{CustomRoutes, routes};
//! use polyhub_server::service::{ServiceConfig, ServiceState};
//!
//! # async fn example(config: ServiceConfig) -> anyhow::Result<()> {
//! let state = ServiceState::from_config(&config).await?;
//! let router = routes(CustomRoutes::new(), state.clone());
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod accounts;
mod authentication;
mod catalog;
mod dashboard;
mod deals;
mod error;
mod monitors;
mod notifications;
mod quotes;
mod utility;

pub mod request;
pub mod response;

use aide::axum::ApiRouter;
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::utility::{CustomRoutes, RouterMapFn};
use crate::middleware::require_authentication;
use crate::service::ServiceState;

#[inline]
async fn fallback() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns an [`ApiRouter`] with all routes that require a session token.
fn private_routes(additional_routes: Option<ApiRouter<ServiceState>>) -> ApiRouter<ServiceState> {
    let mut router = ApiRouter::new()
        .merge(accounts::routes())
        .merge(catalog::routes())
        .merge(deals::routes())
        .merge(quotes::routes())
        .merge(notifications::routes())
        .merge(dashboard::routes());

    if let Some(additional) = additional_routes {
        router = router.merge(additional);
    }

    router
}

/// Returns an [`ApiRouter`] with all routes open to anonymous callers.
fn public_routes(additional_routes: Option<ApiRouter<ServiceState>>) -> ApiRouter<ServiceState> {
    let mut router = ApiRouter::new()
        .merge(authentication::routes())
        .merge(catalog::public_routes())
        .merge(deals::public_routes())
        .merge(monitors::routes());

    if let Some(additional) = additional_routes {
        router = router.merge(additional);
    }

    router
}

/// Returns an [`ApiRouter`] with every marketplace route.
pub fn routes(mut routes: CustomRoutes, state: ServiceState) -> ApiRouter<ServiceState> {
    let require_authentication = from_fn_with_state(state, require_authentication);

    let private_router = private_routes(routes.private_routes.take());
    let private_router = routes
        .map_private(private_router)
        .route_layer(require_authentication);

    let public_router = public_routes(routes.public_routes.take());
    let public_router = routes.map_public(public_router);

    ApiRouter::new()
        .merge(private_router)
        .merge(public_router)
        .fallback(fallback)
}

#[cfg(test)]
pub(crate) mod test {
    use aide::axum::ApiRouter;
    use axum::Router;
    use axum_test::TestServer;
    use jiff::Timestamp;
    use polyhub_core::mock::MemoryStore;
    use polyhub_core::types::AccountRole;
    use polyhub_postgres::{PgClient, PgConfig};
    use uuid::Uuid;

    use crate::extract::AuthClaims;
    use crate::handler::{CustomRoutes, routes};
    use crate::service::{ServiceState, SessionKeys, SessionKeysConfig};

    const TEST_SECRET: &str = "polyhub-test-secret-at-least-32-bytes-long";

    /// HTTP server over the in-memory marketplace.
    ///
    /// The Postgres pool is created lazily and never reached by the
    /// marketplace routes.
    pub struct TestMarket {
        pub server: TestServer,
        pub store: MemoryStore,
        pub session_keys: SessionKeys,
    }

    impl TestMarket {
        pub async fn new() -> anyhow::Result<Self> {
            let store = MemoryStore::new();
            let session_keys = SessionKeys::from_config(&SessionKeysConfig::new(TEST_SECRET))?;
            let postgres = PgClient::new(PgConfig::new("postgres://polyhub@localhost/polyhub"))?;

            let state = ServiceState::from_parts(postgres, store.context(), session_keys.clone());
            let app: Router = routes(CustomRoutes::new(), state.clone())
                .with_state(state)
                .into();
            let server = TestServer::new(app)?;

            Ok(Self {
                server,
                store,
                session_keys,
            })
        }
    }

    /// Signs a token for `account_id` with the given role.
    pub fn bearer(market: &TestMarket, account_id: Uuid, role: AccountRole) -> anyhow::Result<String> {
        let claims = AuthClaims::new(
            account_id,
            role,
            Timestamp::now(),
            market.session_keys.token_ttl(),
        );
        Ok(claims.encode(&market.session_keys)?)
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;
        market.server.get("/no-such-route").await.assert_status_not_found();
        Ok(())
    }

    #[tokio::test]
    async fn private_routes_reject_bad_tokens() -> anyhow::Result<()> {
        let market = TestMarket::new().await?;

        market
            .server
            .get("/quotes")
            .await
            .assert_status_unauthorized();

        market
            .server
            .get("/quotes")
            .authorization_bearer("not-a-token")
            .await
            .assert_status_unauthorized();
        Ok(())
    }

    async fn ping() -> &'static str {
        "pong"
    }

    #[tokio::test]
    async fn custom_public_routes_are_merged() -> anyhow::Result<()> {
        use aide::axum::routing::get;

        let store = MemoryStore::new();
        let session_keys = SessionKeys::from_config(&SessionKeysConfig::new(TEST_SECRET))?;
        let postgres = PgClient::new(PgConfig::new("postgres://polyhub@localhost/polyhub"))?;
        let state = ServiceState::from_parts(postgres, store.context(), session_keys);

        let custom = CustomRoutes::new()
            .add_public_routes(ApiRouter::new().api_route("/ping", get(ping)));
        let app: Router = routes(custom, state.clone()).with_state(state).into();
        let server = TestServer::new(app)?;

        server.get("/ping").await.assert_text("pong");
        Ok(())
    }

    fn nest_under_partner(routes: ApiRouter<ServiceState>) -> ApiRouter<ServiceState> {
        ApiRouter::new().nest("/partner", routes)
    }

    #[tokio::test]
    async fn custom_private_routes_are_mapped_and_guarded() -> anyhow::Result<()> {
        use aide::axum::routing::get;

        let market_keys = SessionKeys::from_config(&SessionKeysConfig::new(TEST_SECRET))?;
        let postgres = PgClient::new(PgConfig::new("postgres://polyhub@localhost/polyhub"))?;
        let state =
            ServiceState::from_parts(postgres, MemoryStore::new().context(), market_keys.clone());

        let custom = CustomRoutes::new()
            .add_private_routes(ApiRouter::new().api_route("/ping", get(ping)))
            .with_private_map(nest_under_partner)
            .with_public_map(|routes| routes);
        let app: Router = routes(custom, state.clone()).with_state(state).into();
        let server = TestServer::new(app)?;

        let token = AuthClaims::new(
            Uuid::now_v7(),
            AccountRole::Seller,
            Timestamp::now(),
            market_keys.token_ttl(),
        )
        .encode(&market_keys)?;

        server.get("/partner/ping").await.assert_status_unauthorized();
        server
            .get("/partner/ping")
            .authorization_bearer(token)
            .await
            .assert_text("pong");
        Ok(())
    }
}
