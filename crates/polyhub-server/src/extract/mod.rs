//! Request extractors used by the HTTP handlers.
//!
//! - [`AuthHeader`], [`AuthClaims`] and [`AuthState`] handle session tokens.
//! - [`Json`], [`ValidateJson`], [`Path`] and [`Query`] wrap axum's own
//!   extractors with API-shaped rejections.
//! - [`PgPool`] checks a connection out of the database pool.

pub mod auth;
pub mod reject;

mod pg_connection;

pub use crate::extract::auth::{AuthClaims, AuthHeader, AuthState};
pub use crate::extract::pg_connection::PgPool;
pub use crate::extract::reject::{Json, Path, Query, ValidateJson};
