#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for quote request lifecycle operations.
pub const TRACING_TARGET_QUOTES: &str = "polyhub_core::quotes";

/// Tracing target for best deal lifecycle operations.
pub const TRACING_TARGET_DEALS: &str = "polyhub_core::deals";

/// Tracing target for notification side effects.
pub const TRACING_TARGET_NOTIFY: &str = "polyhub_core::notify";

/// Tracing target for dashboard rollups and cache access.
pub const TRACING_TARGET_DASHBOARD: &str = "polyhub_core::dashboard";

mod context;
mod error;

pub mod dashboard;
pub mod deal;
pub mod notify;
pub mod quote;
pub mod store;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

pub use context::{MarketContext, MarketPolicy};
pub use error::{BoxedError, Error, ErrorKind, FieldError, Result, camel_case};
