//! Panic recovery middleware.
//

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, HeaderValue, Response, StatusCode},
    Router,
};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::error;

use crate::metrics;

/// Turns a handler panic into a 500 JSON response.
fn recover(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let reason = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };

    metrics::add_panics(1);
    error!(
        component = "http",
        event = "panic_recovered",
        reason = reason,
        "handler panicked"
    );

    let mut resp = Response::new(Body::from(r#"{"detail":"internal server error"}"#));
    *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    resp
}

/// PanicRecoverMiddleware recovers from panics in HTTP handlers.
#[derive(Default)]
pub struct PanicRecoverMiddleware;

impl PanicRecoverMiddleware {
    /// Creates a new panic recovery middleware.
    pub fn new() -> Self {
        Self
    }
}

impl super::middleware::Middleware for PanicRecoverMiddleware {
    fn apply(&self, router: Router) -> Router {
        router.layer(CatchPanicLayer::custom(recover))
    }
}
