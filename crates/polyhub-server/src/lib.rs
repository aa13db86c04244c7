#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for token validation and account resolution.
pub const TRACING_TARGET_AUTHENTICATION: &str = "polyhub_server::authentication";

/// Tracing target for role checks performed by handlers.
pub const TRACING_TARGET_AUTHORIZATION: &str = "polyhub_server::authorization";

/// Tracing target for service state construction.
pub const TRACING_TARGET_SERVICE: &str = "polyhub_server::service";

mod error;

pub mod extract;
pub mod handler;
pub mod middleware;
pub mod service;

pub use crate::error::{BoxedError, Error, ErrorKind, Result};
