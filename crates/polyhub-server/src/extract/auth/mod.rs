//! Session token extraction and caller identity.
//!
//! [`AuthHeader`] validates the bearer token, [`AuthState`] turns its claims
//! into the [`Actor`] every marketplace operation is evaluated against.
//!
//! [`Actor`]: polyhub_core::types::Actor

mod auth_state;
mod jwt_header;

pub use self::auth_state::AuthState;
pub use self::jwt_header::{AuthClaims, AuthHeader};
