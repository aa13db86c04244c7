//! Shared-secret keys for signing HS256 session tokens.

use std::fmt;
use std::sync::Arc;

#[cfg(any(test, feature = "config"))]
use clap::Args;
use jiff::SignedDuration;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const TRACING_TARGET: &str = "polyhub_server::service::session_keys";

/// Minimum accepted length of the signing secret, in bytes.
const MIN_SECRET_LEN: usize = 32;

/// Configuration for session token signing.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
pub struct SessionKeysConfig {
    /// Shared secret used to sign and verify session tokens.
    #[cfg_attr(any(test, feature = "config"), arg(long, env = "AUTH_SECRET"))]
    pub auth_secret: String,

    /// Lifetime of an issued session token, in seconds.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "AUTH_TOKEN_TTL_SECS", default_value_t = 86_400)
    )]
    #[serde(default = "SessionKeysConfig::default_token_ttl_secs")]
    pub token_ttl_secs: u64,
}

impl SessionKeysConfig {
    /// Creates a configuration with the default token lifetime.
    pub fn new(auth_secret: impl Into<String>) -> Self {
        Self {
            auth_secret: auth_secret.into(),
            token_ttl_secs: Self::default_token_ttl_secs(),
        }
    }

    fn default_token_ttl_secs() -> u64 {
        86_400
    }
}

impl fmt::Debug for SessionKeysConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeysConfig")
            .field("auth_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

/// Signing and verification keys for session tokens.
///
/// Cloning is cheap; the keys live behind an [`Arc`].
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<SessionKeysInner>,
}

struct SessionKeysInner {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    token_ttl: SignedDuration,
}

impl SessionKeys {
    /// Signature algorithm of every issued token.
    pub const ALGORITHM: Algorithm = Algorithm::HS256;

    /// Builds the keys from configuration and checks they round-trip.
    pub fn from_config(config: &SessionKeysConfig) -> Result<Self> {
        if config.auth_secret.len() < MIN_SECRET_LEN {
            return Err(Error::config(format!(
                "AUTH_SECRET must be at least {MIN_SECRET_LEN} bytes long"
            )));
        }

        if config.token_ttl_secs == 0 {
            return Err(Error::config("AUTH_TOKEN_TTL_SECS must be positive"));
        }

        let secret = config.auth_secret.as_bytes();
        let token_ttl = i64::try_from(config.token_ttl_secs)
            .map(SignedDuration::from_secs)
            .map_err(|_| Error::config("AUTH_TOKEN_TTL_SECS is out of range"))?;

        let keys = Self {
            inner: Arc::new(SessionKeysInner {
                decoding_key: DecodingKey::from_secret(secret),
                encoding_key: EncodingKey::from_secret(secret),
                token_ttl,
            }),
        };

        keys.validate_keys()?;

        tracing::info!(
            target: TRACING_TARGET,
            token_ttl_secs = config.token_ttl_secs,
            "Session keys loaded",
        );

        Ok(keys)
    }

    #[inline]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.inner.decoding_key
    }

    #[inline]
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.inner.encoding_key
    }

    /// Lifetime given to newly issued tokens.
    #[inline]
    pub fn token_ttl(&self) -> SignedDuration {
        self.inner.token_ttl
    }

    /// Signs and verifies a throwaway token to prove the keys match.
    pub fn validate_keys(&self) -> Result<()> {
        use jsonwebtoken::{Header, Validation, decode, encode};

        #[derive(Debug, Serialize, Deserialize)]
        struct SelfCheckClaims {
            sub: String,
            exp: i64,
        }

        let claims = SelfCheckClaims {
            sub: "self-check".to_owned(),
            exp: jiff::Timestamp::now().as_second() + 300,
        };

        let token = encode(&Header::new(Self::ALGORITHM), &claims, self.encoding_key())
            .map_err(|e| {
                tracing::error!(target: TRACING_TARGET, error = %e, "key validation failed during encoding");
                Error::auth("key validation encoding failed").with_source(e)
            })?;

        decode::<SelfCheckClaims>(&token, self.decoding_key(), &Validation::new(Self::ALGORITHM))
            .map_err(|e| {
                tracing::error!(target: TRACING_TARGET, error = %e, "key validation failed during decoding");
                Error::auth("key validation decoding failed").with_source(e)
            })?;

        Ok(())
    }
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys")
            .field("token_ttl", &self.inner.token_ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_valid_secret() -> anyhow::Result<()> {
        let config = SessionKeysConfig::new("a-test-secret-that-is-long-enough-for-hs256");
        let keys = SessionKeys::from_config(&config)?;

        assert_eq!(keys.token_ttl(), SignedDuration::from_hours(24));
        keys.validate_keys()?;
        Ok(())
    }

    #[test]
    fn reject_short_secret() {
        let config = SessionKeysConfig::new("short");
        assert!(SessionKeys::from_config(&config).is_err());
    }

    #[test]
    fn reject_zero_ttl() {
        let mut config = SessionKeysConfig::new("a-test-secret-that-is-long-enough-for-hs256");
        config.token_ttl_secs = 0;
        assert!(SessionKeys::from_config(&config).is_err());
    }

    #[test]
    fn debug_hides_secret() {
        let config = SessionKeysConfig::new("a-test-secret-that-is-long-enough-for-hs256");
        assert!(!format!("{config:?}").contains("long-enough"));
    }
}
