//! Bearer token extraction and HS256 claim handling.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejectionReason;
use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use jsonwebtoken::{Header, Validation, decode, encode};
use polyhub_core::types::{AccountRole, Actor};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::SessionKeys;

/// Validated bearer token of the current request.
///
/// Only checks the token itself: signature, issuer, audience and expiry.
/// The result is cached in the request extensions.
#[must_use]
#[derive(Debug, Clone)]
pub struct AuthHeader {
    auth_claims: AuthClaims,
}

impl AuthHeader {
    #[inline]
    pub const fn new(claims: AuthClaims) -> Self {
        Self {
            auth_claims: claims,
        }
    }

    #[inline]
    pub const fn as_auth_claims(&self) -> &AuthClaims {
        &self.auth_claims
    }

    #[inline]
    pub fn into_auth_claims(self) -> AuthClaims {
        self.auth_claims
    }
}

impl<S> FromRequestParts<S> for AuthHeader
where
    S: Sync + Send,
    SessionKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth_header) = parts.extensions.get::<Self>() {
            return Ok(auth_header.clone());
        }

        type AuthBearerHeader = TypedHeader<Authorization<Bearer>>;
        let session_keys = SessionKeys::from_ref(state);

        match AuthBearerHeader::from_request_parts(parts, state).await {
            Ok(TypedHeader(bearer)) => {
                let claims = AuthClaims::decode(bearer.token(), &session_keys)?;
                let auth_header = Self::new(claims);
                parts.extensions.insert(auth_header.clone());
                Ok(auth_header)
            }
            Err(rejection) => Err(match rejection.reason() {
                TypedHeaderRejectionReason::Missing => ErrorKind::MissingAuthToken
                    .with_message("Authentication required")
                    .with_resource("authentication"),
                TypedHeaderRejectionReason::Error(_) => ErrorKind::MalformedAuthToken
                    .with_message("Authorization header must contain a Bearer token")
                    .with_resource("authentication"),
                _ => ErrorKind::InternalServerError
                    .with_message("Authentication processing failed")
                    .with_resource("authentication"),
            }),
        }
    }
}

impl aide::OperationInput for AuthHeader {}

/// Claims carried by a session token.
///
/// | Claim | Field        | Meaning                          |
/// |-------|--------------|----------------------------------|
/// | `iss` | `issued_by`  | always `polyhub`                 |
/// | `aud` | `audience`   | always `polyhub:server`          |
/// | `sub` | `account_id` | account the token represents     |
/// | `role`| `role`       | account role at issue time       |
/// | `iat` | `issued_at`  | issue time, seconds since epoch  |
/// | `exp` | `expires_at` | expiry time, seconds since epoch |
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AuthClaims {
    #[serde(rename = "iss")]
    issued_by: String,
    #[serde(rename = "aud")]
    audience: String,

    #[serde(rename = "sub")]
    pub account_id: Uuid,
    pub role: AccountRole,

    #[serde(rename = "iat")]
    pub issued_at: i64,
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl AuthClaims {
    const JWT_AUDIENCE: &str = "polyhub:server";
    const JWT_ISSUER: &str = "polyhub";

    /// Creates claims valid for `ttl` starting at `issued_at`.
    pub fn new(account_id: Uuid, role: AccountRole, issued_at: Timestamp, ttl: SignedDuration) -> Self {
        let issued_at = issued_at.as_second();
        Self {
            issued_by: Self::JWT_ISSUER.to_owned(),
            audience: Self::JWT_AUDIENCE.to_owned(),
            account_id,
            role,
            issued_at,
            expires_at: issued_at.saturating_add(ttl.as_secs()),
        }
    }

    /// Returns the caller identity the claims describe.
    #[inline]
    pub fn actor(&self) -> Actor {
        Actor::new(self.account_id, self.role)
    }

    /// Expiry as a timestamp.
    pub fn expires_at(&self) -> Timestamp {
        Timestamp::from_second(self.expires_at).unwrap_or(Timestamp::MIN)
    }

    #[inline]
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Timestamp::now().as_second()
    }

    /// Signs the claims into a compact token.
    pub fn encode(&self, session_keys: &SessionKeys) -> Result<String> {
        let header = Header::new(SessionKeys::ALGORITHM);
        encode(&header, self, session_keys.encoding_key()).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_AUTHENTICATION,
                error = %e,
                account_id = %self.account_id,
                "Failed to encode session token"
            );
            ErrorKind::InternalServerError
                .with_message("Authentication token generation failed")
                .with_resource("authentication")
        })
    }

    /// Verifies a compact token and returns its claims.
    pub fn decode(token: &str, session_keys: &SessionKeys) -> Result<Self> {
        let mut validation = Validation::new(SessionKeys::ALGORITHM);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_audience(&[Self::JWT_AUDIENCE]);
        validation.set_issuer(&[Self::JWT_ISSUER]);
        validation.set_required_spec_claims(&["iss", "aud", "sub", "iat", "exp"]);

        let claims = decode::<Self>(token, session_keys.decoding_key(), &validation)?.claims;

        if claims.is_expired() {
            tracing::debug!(
                target: TRACING_TARGET_AUTHENTICATION,
                account_id = %claims.account_id,
                "Session token expired"
            );
            return Err(ErrorKind::TokenExpired.with_resource("authentication"));
        }

        tracing::trace!(
            target: TRACING_TARGET_AUTHENTICATION,
            account_id = %claims.account_id,
            role = %claims.role,
            "Session token verified"
        );

        Ok(claims)
    }
}

impl From<JwtError> for Error<'static> {
    fn from(error: JwtError) -> Self {
        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            error = %error,
            "Session token rejected"
        );

        let error = match error.kind() {
            JwtErrorKind::ExpiredSignature => ErrorKind::TokenExpired.into_error(),
            JwtErrorKind::InvalidSignature
            | JwtErrorKind::InvalidAudience
            | JwtErrorKind::InvalidIssuer => ErrorKind::Unauthorized
                .with_message("Authentication token verification failed"),
            JwtErrorKind::MissingRequiredClaim(claim) => ErrorKind::MalformedAuthToken
                .with_message("Authentication token is incomplete")
                .with_context(format!("missing claim: {claim}")),
            JwtErrorKind::InvalidToken
            | JwtErrorKind::InvalidAlgorithm
            | JwtErrorKind::Base64(_)
            | JwtErrorKind::Json(_)
            | JwtErrorKind::Utf8(_) => {
                ErrorKind::MalformedAuthToken.with_message("Authentication token is malformed")
            }
            _ => ErrorKind::InternalServerError
                .with_message("Authentication processing failed"),
        };

        error.with_resource("authentication")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::SessionKeysConfig;

    fn keys() -> anyhow::Result<SessionKeys> {
        let config = SessionKeysConfig::new("jwt-header-tests-secret-of-sufficient-size");
        Ok(SessionKeys::from_config(&config)?)
    }

    #[test]
    fn claims_round_trip() -> anyhow::Result<()> {
        let keys = keys()?;
        let account_id = Uuid::new_v4();
        let claims = AuthClaims::new(
            account_id,
            AccountRole::Seller,
            Timestamp::now(),
            SignedDuration::from_mins(10),
        );

        let token = claims.encode(&keys)?;
        let decoded = AuthClaims::decode(&token, &keys)?;

        assert_eq!(decoded, claims);
        assert_eq!(decoded.actor(), Actor::seller(account_id));
        Ok(())
    }

    #[test]
    fn expired_token_is_rejected() -> anyhow::Result<()> {
        let keys = keys()?;
        let issued_at = Timestamp::now() - SignedDuration::from_hours(2);
        let claims = AuthClaims::new(
            Uuid::new_v4(),
            AccountRole::Buyer,
            issued_at,
            SignedDuration::from_hours(1),
        );

        let token = claims.encode(&keys)?;
        let Err(error) = AuthClaims::decode(&token, &keys) else {
            anyhow::bail!("expired token should be rejected");
        };
        assert_eq!(error.kind(), ErrorKind::TokenExpired);
        Ok(())
    }

    #[test]
    fn foreign_secret_is_rejected() -> anyhow::Result<()> {
        let other = SessionKeys::from_config(&SessionKeysConfig::new(
            "another-secret-entirely-of-sufficient-size",
        ))?;
        let claims = AuthClaims::new(
            Uuid::new_v4(),
            AccountRole::Admin,
            Timestamp::now(),
            SignedDuration::from_mins(5),
        );

        let token = claims.encode(&other)?;
        let Err(error) = AuthClaims::decode(&token, &keys()?) else {
            anyhow::bail!("token signed with another secret should be rejected");
        };
        assert_eq!(error.kind(), ErrorKind::Unauthorized);
        Ok(())
    }

    #[test]
    fn garbage_is_malformed() -> anyhow::Result<()> {
        let Err(error) = AuthClaims::decode("not-a-token", &keys()?) else {
            anyhow::bail!("garbage should be rejected");
        };
        assert_eq!(error.kind(), ErrorKind::MalformedAuthToken);
        Ok(())
    }
}
