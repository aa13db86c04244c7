//! Authenticated caller extractor.

use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use derive_more::Deref;
use polyhub_core::types::{AccountRole, Actor};

use super::{AuthClaims, AuthHeader};
use crate::TRACING_TARGET_AUTHORIZATION;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::SessionKeys;

/// Verified identity of the caller.
///
/// Built from the token alone: the role is the one recorded when the token
/// was issued. Marketplace rules themselves live in `polyhub-core`; the
/// checks here only gate admin-only and seller-only endpoints.
#[derive(Debug, Clone, Deref, PartialEq, Eq)]
pub struct AuthState(pub AuthClaims);

impl AuthState {
    #[inline]
    #[must_use]
    pub const fn from_verified_claims(auth_claims: AuthClaims) -> Self {
        Self(auth_claims)
    }

    /// Returns `Forbidden` unless the caller is an admin.
    pub fn authorize_admin(&self) -> Result<()> {
        if self.role == AccountRole::Admin {
            return Ok(());
        }

        tracing::debug!(
            target: TRACING_TARGET_AUTHORIZATION,
            account_id = %self.account_id,
            role = %self.role,
            "Admin access denied"
        );
        Err(ErrorKind::Forbidden.with_message("Administrator access required"))
    }

    /// Returns `Forbidden` unless the caller may list products.
    pub fn authorize_seller(&self) -> Result<()> {
        if matches!(self.role, AccountRole::Seller | AccountRole::Admin) {
            return Ok(());
        }

        tracing::debug!(
            target: TRACING_TARGET_AUTHORIZATION,
            account_id = %self.account_id,
            role = %self.role,
            "Seller access denied"
        );
        Err(ErrorKind::Forbidden.with_message("Seller access required"))
    }

    #[inline]
    pub fn actor(&self) -> Actor {
        self.0.actor()
    }
}

impl<S> FromRequestParts<S> for AuthState
where
    S: Sync + Send,
    SessionKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = AuthHeader::from_request_parts(parts, state).await?;
        Ok(Self::from_verified_claims(auth_header.into_auth_claims()))
    }
}

impl<S> OptionalFromRequestParts<S> for AuthState
where
    S: Sync + Send,
    SessionKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        match <Self as FromRequestParts<S>>::from_request_parts(parts, state).await {
            Ok(auth_state) => Ok(Some(auth_state)),
            Err(error) if error.kind() == ErrorKind::MissingAuthToken => Ok(None),
            Err(error) => Err(error),
        }
    }
}

impl aide::OperationInput for AuthState {}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use uuid::Uuid;

    use super::*;

    fn state(role: AccountRole) -> AuthState {
        AuthState(AuthClaims::new(
            Uuid::new_v4(),
            role,
            Timestamp::now(),
            SignedDuration::from_mins(5),
        ))
    }

    #[test]
    fn admin_gate() {
        assert!(state(AccountRole::Admin).authorize_admin().is_ok());
        assert!(state(AccountRole::Seller).authorize_admin().is_err());
    }

    #[test]
    fn seller_gate_admits_admins() {
        assert!(state(AccountRole::Seller).authorize_seller().is_ok());
        assert!(state(AccountRole::Admin).authorize_seller().is_ok());
        assert!(state(AccountRole::Buyer).authorize_seller().is_err());
        assert!(state(AccountRole::Expert).authorize_seller().is_err());
    }
}
