// Request spans for every routed call.

use axum::Router;
use tower_http::trace::TraceLayer;

#[derive(Default)]
pub struct TraceMiddleware;

impl TraceMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl super::middleware::Middleware for TraceMiddleware {
    fn apply(&self, router: Router) -> Router {
        router.layer(TraceLayer::new_for_http())
    }
}
