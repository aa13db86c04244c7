//! OpenAPI document generation with the Scalar API reference.
//!
//! The document is assembled by [`aide`] from the `*_docs` transforms every
//! handler module registers next to its routes.

use aide::axum::ApiRouter;
use aide::openapi::{Contact, Info, License, OpenApi};
use aide::scalar::Scalar;
use axum::routing::{Router, get};
use axum::{Extension, Json};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Paths the OpenAPI document and the Scalar UI are served on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct OpenApiConfig {
    /// Path which exposes the OpenAPI JSON document.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "OPENAPI_JSON_PATH", default_value = "/api/openapi.json")
    )]
    pub open_api_json: String,

    /// Path which exposes the Scalar API reference UI.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "OPENAPI_SCALAR_PATH", default_value = "/api/scalar")
    )]
    pub scalar_ui: String,
}

impl Default for OpenApiConfig {
    fn default() -> Self {
        Self {
            open_api_json: "/api/openapi.json".to_owned(),
            scalar_ui: "/api/scalar".to_owned(),
        }
    }
}

/// Extension trait for [`ApiRouter`] to serve its OpenAPI document.
pub trait RouterOpenApiExt<S> {
    /// Finishes the router with the PolymersHub API info.
    fn with_open_api(self, config: OpenApiConfig) -> Router<S>;

    /// Finishes the router with custom API info.
    fn with_open_api_info(self, config: OpenApiConfig, info: Info) -> Router<S>;
}

impl<S> RouterOpenApiExt<S> for ApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_open_api(self, config: OpenApiConfig) -> Router<S> {
        let info = Info {
            title: "PolymersHub API".to_owned(),
            summary: Some("B2B polymer marketplace".to_owned()),
            description: Some(
                "Catalog browsing, quote requests between buyers and sellers, \
                 admin-reviewed best deals, notifications and the admin dashboard."
                    .to_owned(),
            ),
            contact: Some(Contact {
                name: Some("PolymersHub".to_owned()),
                ..Contact::default()
            }),
            license: Some(License {
                name: "MIT".to_owned(),
                identifier: Some("MIT".to_owned()),
                ..License::default()
            }),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            ..Info::default()
        };

        self.with_open_api_info(config, info)
    }

    fn with_open_api_info(self, config: OpenApiConfig, info: Info) -> Router<S> {
        async fn serve_openapi(Extension(api): Extension<OpenApi>) -> Json<OpenApi> {
            Json(api)
        }

        let mut api = OpenApi {
            info,
            ..OpenApi::default()
        };

        let scalar = Scalar::new(&config.open_api_json);
        let router = self
            .route(&config.scalar_ui, scalar.axum_route())
            .route(&config.open_api_json, get(serve_openapi));

        router.finish_api(&mut api).layer(Extension(api))
    }
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use polyhub_core::mock::MemoryStore;
    use polyhub_postgres::{PgClient, PgConfig};
    use serde_json::Value;

    use super::*;
    use crate::handler::{CustomRoutes, routes};
    use crate::service::{ServiceState, SessionKeys, SessionKeysConfig};

    #[tokio::test]
    async fn document_lists_marketplace_routes() -> anyhow::Result<()> {
        let keys = SessionKeys::from_config(&SessionKeysConfig::new(
            "polyhub-test-secret-at-least-32-bytes-long",
        ))?;
        let postgres = PgClient::new(PgConfig::new("postgres://polyhub@localhost/polyhub"))?;
        let state = ServiceState::from_parts(postgres, MemoryStore::new().context(), keys);

        let app = routes(CustomRoutes::new(), state.clone())
            .with_open_api(OpenApiConfig::default())
            .with_state(state);
        let server = TestServer::new(app)?;

        let document: Value = server.get("/api/openapi.json").await.json();
        assert_eq!(document["info"]["title"], "PolymersHub API");
        for path in ["/quotes", "/quotes/{quoteId}/status", "/deals/active", "/dashboard"] {
            assert!(document["paths"][path].is_object(), "missing {path}");
        }
        Ok(())
    }
}
