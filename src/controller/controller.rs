// HTTP controller trait for route registration.

use axum::Router;

/// Trait for adding routes to the HTTP server.
pub trait Controller: Send + Sync {
    /// Adds routes to the router. Paths are absolute, prefix included:
    /// ```rust
    /// # use axum::{Router, routing::get};
    /// # async fn handler() -> &'static str { "ok" }
    /// let router: Router<()> = Router::new().route("/api/devices", get(handler));
    /// # drop(router);
    /// ```
    fn add_route(&self, router: Router) -> Router;
}
