//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Authentication and role gates for private routes
//! - Security: CORS, response headers, body limits
//! - Observability: request ids, tracing spans, request timing
//! - Recovery: panics and timeouts
//! - OpenAPI documentation with the Scalar UI
//!
//! ```rust,no_run
//! use aide::axum::ApiRouter;
//! use axum::Router;
//! use polyhub_server::middleware::{
//!     OpenApiConfig, RouterObservabilityExt, RouterOpenApiExt, RouterRecoveryExt,
//!     RouterSecurityExt,
//! };
//!
//! let app: Router<()> = ApiRouter::new()
//!     .with_open_api(OpenApiConfig::default())
//!     .with_default_security()
//!     .with_observability()
//!     .with_default_recovery();
//! ```

mod authentication;
mod authorization;
mod observability;
mod recovery;
mod security;
mod specification;

pub use authentication::{RouterAuthExt, require_authentication};
pub use authorization::require_admin;
pub use observability::{RouterObservabilityExt, track_request_timing};
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{
    CorsConfig, DEFAULT_MAX_BODY_SIZE, FrameOptions, ReferrerPolicy, RouterSecurityExt,
    SecurityHeadersConfig,
};
pub use specification::{OpenApiConfig, RouterOpenApiExt};
