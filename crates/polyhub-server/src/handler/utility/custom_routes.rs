//! Extra routes merged into the marketplace API by embedders.

use aide::axum::ApiRouter;

use crate::service::ServiceState;

/// Transformation applied to a router before it is merged.
pub type RouterMapFn = fn(ApiRouter<ServiceState>) -> ApiRouter<ServiceState>;

/// Routes and hooks merged into the router built by [`routes`].
///
/// Private routes sit behind the same token check as the built-in
/// marketplace endpoints; public routes do not.
///
/// ```rust
/// use polyhub_server::handler::CustomRoutes;
///
/// let custom = CustomRoutes::new();
/// assert!(custom.is_empty());
/// ```
///
/// [`routes`]: crate::handler::routes
#[derive(Default, Clone)]
pub struct CustomRoutes {
    /// Additional routes that require a session token.
    pub private_routes: Option<ApiRouter<ServiceState>>,
    /// Additional routes open to anonymous callers.
    pub public_routes: Option<ApiRouter<ServiceState>>,
    /// Applied to all private routes before the token check is layered.
    pub private_map: Option<RouterMapFn>,
    /// Applied to all public routes.
    pub public_map: Option<RouterMapFn>,
}

impl CustomRoutes {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds private routes, merging with any already configured.
    pub fn add_private_routes(mut self, routes: ApiRouter<ServiceState>) -> Self {
        self.private_routes = match self.private_routes.take() {
            Some(existing) => Some(existing.merge(routes)),
            None => Some(routes),
        };
        self
    }

    /// Adds public routes, merging with any already configured.
    pub fn add_public_routes(mut self, routes: ApiRouter<ServiceState>) -> Self {
        self.public_routes = match self.public_routes.take() {
            Some(existing) => Some(existing.merge(routes)),
            None => Some(routes),
        };
        self
    }

    pub fn with_private_map(mut self, f: RouterMapFn) -> Self {
        self.private_map = Some(f);
        self
    }

    pub fn with_public_map(mut self, f: RouterMapFn) -> Self {
        self.public_map = Some(f);
        self
    }

    /// Returns true if no extra routes are configured.
    pub fn is_empty(&self) -> bool {
        self.private_routes.is_none() && self.public_routes.is_none()
    }

    pub(crate) fn map_private(&self, routes: ApiRouter<ServiceState>) -> ApiRouter<ServiceState> {
        match self.private_map {
            Some(f) => f(routes),
            None => routes,
        }
    }

    pub(crate) fn map_public(&self, routes: ApiRouter<ServiceState>) -> ApiRouter<ServiceState> {
        match self.public_map {
            Some(f) => f(routes),
            None => routes,
        }
    }
}
