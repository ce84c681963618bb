//! Job listing, sync, import and import history endpoints.

use axum::{
    extract::Query,
    routing::{get, post},
    Json, Router,
};
use std::collections::HashMap;

use crate::http::{AppError, Controller, Params};
use crate::model::{ImportLogEntry, LogPage};
use crate::service::{ImportOutcome, ImportRequest, JobPage, Services, SyncOutcome};

#[derive(Clone)]
pub struct JobsController {
    prefix: String,
    services: Services,
}

impl JobsController {
    pub fn new(prefix: &str, services: Services) -> Self {
        Self {
            prefix: prefix.to_string(),
            services,
        }
    }

    fn list(&self, params: Params) -> Json<JobPage> {
        let filter = params.job_filter();
        Json(
            self.services
                .store
                .list(&filter, params.page(), params.limit()),
        )
    }

    async fn sync(&self, params: Params) -> Result<Json<SyncOutcome>, AppError> {
        Ok(Json(self.services.ingest.sync(&params.scope()).await?))
    }

    fn import(&self, request: ImportRequest) -> Json<ImportOutcome> {
        Json(self.services.ingest.import(request))
    }

    fn import_log(&self, params: Params) -> Json<LogPage<ImportLogEntry>> {
        Json(LogPage {
            logs: self.services.ingest.import_log(params.log_limit()),
        })
    }
}

impl Controller for JobsController {
    fn add_route(&self, router: Router) -> Router {
        let list = self.clone();
        let sync = self.clone();
        let import = self.clone();
        let import_log = self.clone();

        router
            .route(
                &format!("{}/jobs", self.prefix),
                get(move |Query(raw): Query<HashMap<String, String>>| {
                    let controller = list.clone();
                    async move { controller.list(raw.into()) }
                }),
            )
            .route(
                &format!("{}/jobs/sync", self.prefix),
                post(move |Query(raw): Query<HashMap<String, String>>| {
                    let controller = sync.clone();
                    async move { controller.sync(raw.into()).await }
                }),
            )
            .route(
                &format!("{}/jobs/import", self.prefix),
                post(move |Json(request): Json<ImportRequest>| {
                    let controller = import.clone();
                    async move { controller.import(request) }
                }),
            )
            .route(
                &format!("{}/import/log", self.prefix),
                get(move |Query(raw): Query<HashMap<String, String>>| {
                    let controller = import_log.clone();
                    async move { controller.import_log(raw.into()) }
                }),
            )
    }
}
