//! CORS, security headers, compression and body limits.

use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{self, HeaderName, HeaderValue};
use axum::http::Method;
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;

/// Largest accepted request body: 1MB.
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Tracing target for security configuration.
const TRACING_TARGET: &str = "polyhub_server::middleware::security";

/// Frontend dev servers allowed when no origin is configured.
const DEV_ORIGINS: [&str; 3] = [
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "http://localhost:5173",
];

/// Extension trait for `axum::`[`Router`] to apply security middleware.
pub trait RouterSecurityExt<S> {
    /// Layers CORS, security headers, response compression and body limits.
    fn with_security(self, cors: &CorsConfig, headers: &SecurityHeadersConfig) -> Self;

    /// Same as [`with_security`] with development CORS origins.
    ///
    /// [`with_security`]: RouterSecurityExt::with_security
    fn with_default_security(self) -> Self;
}

impl<S> RouterSecurityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_security(self, cors: &CorsConfig, headers: &SecurityHeadersConfig) -> Self {
        let router = headers
            .response_headers()
            .into_iter()
            .fold(self, |router, (name, value)| {
                router.layer(SetResponseHeaderLayer::overriding(name, value))
            });

        router
            .layer(cors.layer())
            .layer(CompressionLayer::new())
            .layer(RequestBodyLimitLayer::new(DEFAULT_MAX_BODY_SIZE))
            .layer(DefaultBodyLimit::max(DEFAULT_MAX_BODY_SIZE))
    }

    fn with_default_security(self) -> Self {
        self.with_security(&CorsConfig::default(), &SecurityHeadersConfig::default())
    }
}

/// Browser origins allowed to call the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct CorsConfig {
    /// Allowed origins. Local frontend dev servers when empty.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "cors-allowed-origins",
            env = "CORS_ALLOWED_ORIGINS",
            value_delimiter = ','
        )
    )]
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// How long browsers may cache a preflight answer, in seconds.
    #[cfg_attr(
        feature = "config",
        arg(long = "cors-max-age", env = "CORS_MAX_AGE", default_value_t = 3600)
    )]
    pub max_age_seconds: u64,

    #[cfg_attr(
        feature = "config",
        arg(
            long = "cors-allow-credentials",
            env = "CORS_ALLOW_CREDENTIALS",
            default_value_t = true,
            action = clap::ArgAction::Set
        )
    )]
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age_seconds: 3600,
            allow_credentials: true,
        }
    }
}

impl CorsConfig {
    /// Parsed origins. Entries that are not valid header values are dropped
    /// with a warning.
    pub fn origins(&self) -> Vec<HeaderValue> {
        if self.allowed_origins.is_empty() {
            return DEV_ORIGINS.into_iter().map(HeaderValue::from_static).collect();
        }

        self.allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(target: TRACING_TARGET, %origin, "invalid CORS origin skipped");
                    None
                }
            })
            .collect()
    }

    fn layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(self.origins())
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
            .expose_headers([header::AUTHORIZATION])
            .allow_credentials(self.allow_credentials)
            .max_age(Duration::from_secs(self.max_age_seconds))
    }
}

/// Headers set on every response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct SecurityHeadersConfig {
    pub hsts_max_age_seconds: u64,
    pub hsts_include_subdomains: bool,
    /// Omitted from responses when `None`.
    pub content_security_policy: Option<String>,
    pub frame_options: FrameOptions,
    pub referrer_policy: ReferrerPolicy,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            hsts_max_age_seconds: 31_536_000,
            hsts_include_subdomains: true,
            // Scalar loads its bundle from jsdelivr.
            content_security_policy: Some(
                "default-src 'self'; \
                 script-src 'self' 'unsafe-inline' https://cdn.jsdelivr.net; \
                 style-src 'self' 'unsafe-inline' https://cdn.jsdelivr.net; \
                 img-src 'self' data:; \
                 connect-src 'self'; \
                 frame-ancestors 'none'"
                    .to_owned(),
            ),
            frame_options: FrameOptions::Deny,
            referrer_policy: ReferrerPolicy::StrictOriginWhenCrossOrigin,
        }
    }
}

impl SecurityHeadersConfig {
    /// Header name and value pairs. Values that fail to encode are skipped.
    pub fn response_headers(&self) -> Vec<(HeaderName, HeaderValue)> {
        let mut headers = vec![
            (
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static(self.frame_options.into()),
            ),
            (
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ),
            (
                header::REFERRER_POLICY,
                HeaderValue::from_static(self.referrer_policy.into()),
            ),
        ];

        let mut hsts = format!("max-age={}", self.hsts_max_age_seconds);
        if self.hsts_include_subdomains {
            hsts.push_str("; includeSubDomains");
        }

        let dynamic = [
            (header::STRICT_TRANSPORT_SECURITY, Some(hsts)),
            (
                header::CONTENT_SECURITY_POLICY,
                self.content_security_policy.clone(),
            ),
        ];

        for (name, value) in dynamic {
            let Some(value) = value else { continue };
            match HeaderValue::try_from(value) {
                Ok(value) => headers.push((name, value)),
                Err(error) => {
                    tracing::warn!(target: TRACING_TARGET, header = %name, %error, "invalid header skipped");
                }
            }
        }

        headers
    }
}

/// X-Frame-Options header values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum FrameOptions {
    Deny,
    SameOrigin,
}

/// Referrer-Policy header values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ReferrerPolicy {
    NoReferrer,
    Origin,
    StrictOriginWhenCrossOrigin,
}

#[cfg(test)]
mod tests {
    use axum::routing::get;
    use axum_test::TestServer;

    use super::*;

    #[test]
    fn configured_origins_skip_invalid_values() {
        let cors = CorsConfig {
            allowed_origins: vec!["https://polymershub.com".into(), "bad\norigin".into()],
            ..CorsConfig::default()
        };
        assert_eq!(cors.origins().len(), 1);
        assert_eq!(CorsConfig::default().origins().len(), DEV_ORIGINS.len());
    }

    #[test]
    fn header_values_render() {
        let config = SecurityHeadersConfig {
            content_security_policy: None,
            frame_options: FrameOptions::SameOrigin,
            referrer_policy: ReferrerPolicy::NoReferrer,
            ..SecurityHeadersConfig::default()
        };

        let headers = config.response_headers();
        assert_eq!(headers.len(), 4);
        assert!(headers.contains(&(header::X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN"))));
        assert!(headers.contains(&(header::REFERRER_POLICY, HeaderValue::from_static("no-referrer"))));
    }

    #[tokio::test]
    async fn security_headers_are_set() -> anyhow::Result<()> {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .with_default_security();
        let server = TestServer::new(app)?;

        let response = server.get("/").await;
        response.assert_status_ok();
        response.assert_header("x-frame-options", "DENY");
        response.assert_header("x-content-type-options", "nosniff");
        response.assert_header("referrer-policy", "strict-origin-when-cross-origin");
        response.assert_header(
            "strict-transport-security",
            "max-age=31536000; includeSubDomains",
        );
        Ok(())
    }
}
