//! [`CustomRoutes`] for extending the built-in API.

mod custom_routes;

pub use custom_routes::{CustomRoutes, RouterMapFn};
