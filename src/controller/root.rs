// Package api provides the API info endpoint.

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::http::Controller;

pub const API_MESSAGE: &str = "HP PrintOS Dashboard API";

#[derive(Debug, Serialize)]
struct Info {
    message: &'static str,
    version: &'static str,
}

/// RootController answers on the bare prefix with the API name and version.
pub struct RootController {
    prefix: String,
}

impl RootController {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    async fn info() -> Json<Info> {
        Json(Info {
            message: API_MESSAGE,
            version: env!("CARGO_PKG_VERSION"),
        })
    }
}

impl Controller for RootController {
    fn add_route(&self, router: Router) -> Router {
        if self.prefix.is_empty() {
            return router.route("/", get(Self::info));
        }
        router
            .route(&self.prefix, get(Self::info))
            .route(&format!("{}/", self.prefix), get(Self::info))
    }
}
