//! Response cache introspection and invalidation.

use axum::{
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::cache::{CacheStatus, CacheStore};
use crate::http::Controller;

#[derive(Debug, Serialize)]
struct ClearResponse {
    status: &'static str,
    deleted_entries: usize,
}

#[derive(Clone)]
pub struct CacheController {
    prefix: String,
    cache: Arc<dyn CacheStore>,
}

impl CacheController {
    pub fn new(prefix: &str, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            prefix: prefix.to_string(),
            cache,
        }
    }

    fn status(&self) -> Json<CacheStatus> {
        Json(self.cache.status())
    }

    fn clear(&self) -> Json<ClearResponse> {
        Json(ClearResponse {
            status: "cleared",
            deleted_entries: self.cache.clear(),
        })
    }
}

impl Controller for CacheController {
    fn add_route(&self, router: Router) -> Router {
        let status = self.clone();
        let clear = self.clone();

        router
            .route(
                &format!("{}/cache/status", self.prefix),
                get(move || {
                    let controller = status.clone();
                    async move { controller.status() }
                }),
            )
            .route(
                &format!("{}/cache/clear", self.prefix),
                delete(move || {
                    let controller = clear.clone();
                    async move { controller.clear() }
                }),
            )
    }
}
