//! Application state and dependency injection.

mod config;
mod security;
mod store;

use polyhub_core::MarketContext;
use polyhub_postgres::PgClient;

pub use crate::service::config::{ServiceConfig, ServiceConfigBuilder};
pub use crate::service::security::{PasswordHasher, SessionKeys, SessionKeysConfig};
pub use crate::service::store::{
    PgMarketStore, SnapshotCache, core_role, core_verification, pg_role,
};
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    // External services:
    pub postgres: PgClient,

    // Internal services:
    pub market: MarketContext,
    pub password_hasher: PasswordHasher,
    pub session_keys: SessionKeys,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Connects to the database, applies migrations and derives the
    /// session keys.
    pub async fn from_config(service_config: &ServiceConfig) -> Result<Self> {
        let session_keys = service_config.load_session_keys()?;
        let postgres = service_config.connect_postgres().await?;
        let market = service_config.build_market(postgres.clone());

        tracing::info!(
            target: crate::TRACING_TARGET_SERVICE,
            policy = ?market.policy(),
            "service state initialized",
        );

        Ok(Self::from_parts(postgres, market, session_keys))
    }

    /// Assembles state from already constructed services.
    pub fn from_parts(postgres: PgClient, market: MarketContext, session_keys: SessionKeys) -> Self {
        Self {
            postgres,
            market,
            password_hasher: PasswordHasher::new(),
            session_keys,
        }
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

// External services:
impl_di!(postgres: PgClient);

// Internal services:
impl_di!(market: MarketContext);
impl_di!(password_hasher: PasswordHasher);
impl_di!(session_keys: SessionKeys);
