//! Sync history, background sync control and full data refresh.

use axum::{
    extract::Query,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::collections::HashMap;

use crate::http::{AppError, Controller, Params};
use crate::model::{LogPage, RefreshOutcome, SyncLogEntry, SyncStatus};
use crate::service::{Services, DEFAULT_LOG_LIMIT};

#[derive(Debug, Serialize)]
struct ToggleResponse {
    status: &'static str,
    running: bool,
}

#[derive(Clone)]
pub struct SyncController {
    prefix: String,
    services: Services,
}

impl SyncController {
    pub fn new(prefix: &str, services: Services) -> Self {
        Self {
            prefix: prefix.to_string(),
            services,
        }
    }

    fn status(&self) -> Json<SyncStatus> {
        Json(self.services.background.status(DEFAULT_LOG_LIMIT))
    }

    fn log(&self, params: Params) -> Json<LogPage<SyncLogEntry>> {
        Json(LogPage {
            logs: self.services.ingest.sync_log(params.log_limit()),
        })
    }

    fn start(&self) -> Json<ToggleResponse> {
        let status = if self.services.background.start() {
            "started"
        } else {
            "already_running"
        };
        Json(ToggleResponse {
            status,
            running: true,
        })
    }

    fn stop(&self) -> Json<ToggleResponse> {
        let status = if self.services.background.stop() {
            "stopped"
        } else {
            "not_running"
        };
        Json(ToggleResponse {
            status,
            running: false,
        })
    }

    async fn refresh(&self, params: Params) -> Result<Json<RefreshOutcome>, AppError> {
        Ok(Json(self.services.ingest.refresh(&params.scope()).await?))
    }
}

impl Controller for SyncController {
    fn add_route(&self, router: Router) -> Router {
        let status = self.clone();
        let log = self.clone();
        let start = self.clone();
        let stop = self.clone();
        let refresh = self.clone();

        router
            .route(
                &format!("{}/sync/status", self.prefix),
                get(move || {
                    let controller = status.clone();
                    async move { controller.status() }
                }),
            )
            .route(
                &format!("{}/sync/log", self.prefix),
                get(move |Query(raw): Query<HashMap<String, String>>| {
                    let controller = log.clone();
                    async move { controller.log(raw.into()) }
                }),
            )
            .route(
                &format!("{}/sync/start", self.prefix),
                post(move || {
                    let controller = start.clone();
                    async move { controller.start() }
                }),
            )
            .route(
                &format!("{}/sync/stop", self.prefix),
                post(move || {
                    let controller = stop.clone();
                    async move { controller.stop() }
                }),
            )
            .route(
                &format!("{}/data/refresh", self.prefix),
                post(move |Query(raw): Query<HashMap<String, String>>| {
                    let controller = refresh.clone();
                    async move { controller.refresh(raw.into()).await }
                }),
            )
    }
}
