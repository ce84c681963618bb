//! Device registry endpoints.

use axum::{
    extract::{Path, Query},
    routing::get,
    Json, Router,
};
use std::collections::HashMap;

use crate::http::{AppError, Controller, Params};
use crate::model::{Device, DevicePerformance, DeviceStatusDetail};
use crate::service::Services;

#[derive(Clone)]
pub struct DevicesController {
    prefix: String,
    services: Services,
}

impl DevicesController {
    pub fn new(prefix: &str, services: Services) -> Self {
        Self {
            prefix: prefix.to_string(),
            services,
        }
    }

    async fn list(&self) -> Json<Vec<Device>> {
        Json(self.services.registry.list().await)
    }

    async fn status(&self, id: String) -> Result<Json<DeviceStatusDetail>, AppError> {
        Ok(Json(self.services.registry.status(&id).await?))
    }

    fn performance(&self, id: String, params: Params) -> Result<Json<DevicePerformance>, AppError> {
        let filter = params.job_filter();
        Ok(Json(self.services.registry.performance(&id, &filter)?))
    }
}

impl Controller for DevicesController {
    fn add_route(&self, router: Router) -> Router {
        let list = self.clone();
        let status = self.clone();
        let performance = self.clone();

        router
            .route(
                &format!("{}/devices", self.prefix),
                get(move || {
                    let controller = list.clone();
                    async move { controller.list().await }
                }),
            )
            .route(
                &format!("{}/devices/:id/status", self.prefix),
                get(move |Path(id): Path<String>| {
                    let controller = status.clone();
                    async move { controller.status(id).await }
                }),
            )
            .route(
                &format!("{}/devices/:id/performance", self.prefix),
                get(
                    move |Path(id): Path<String>, Query(raw): Query<HashMap<String, String>>| {
                        let controller = performance.clone();
                        async move { controller.performance(id, raw.into()) }
                    },
                ),
            )
    }
}
