//! Click report, trend and CSV export endpoints.

use axum::{
    extract::Query,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::collections::HashMap;

use crate::http::{Controller, Params};
use crate::model::{ClicksReport, TrendPoint};
use crate::service::Services;

const EXPORT_FILENAME: &str = "clicks_export.csv";

#[derive(Clone)]
pub struct ClicksController {
    prefix: String,
    services: Services,
}

impl ClicksController {
    pub fn new(prefix: &str, services: Services) -> Self {
        Self {
            prefix: prefix.to_string(),
            services,
        }
    }

    fn report(&self, params: Params) -> Json<ClicksReport> {
        Json(self.services.stats.clicks_report(&params.job_filter()))
    }

    fn trend(&self, params: Params) -> Json<Vec<TrendPoint>> {
        Json(
            self.services
                .stats
                .clicks_trend(&params.job_filter(), params.resolution()),
        )
    }

    fn export(&self, params: Params) -> impl IntoResponse {
        let body = self.services.export.export(&params.job_filter());
        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{EXPORT_FILENAME}\""),
                ),
            ],
            body,
        )
    }
}

impl Controller for ClicksController {
    fn add_route(&self, router: Router) -> Router {
        let report = self.clone();
        let trend = self.clone();
        let export = self.clone();

        router
            .route(
                &format!("{}/clicks/report", self.prefix),
                get(move |Query(raw): Query<HashMap<String, String>>| {
                    let controller = report.clone();
                    async move { controller.report(raw.into()) }
                }),
            )
            .route(
                &format!("{}/clicks/trend", self.prefix),
                get(move |Query(raw): Query<HashMap<String, String>>| {
                    let controller = trend.clone();
                    async move { controller.trend(raw.into()) }
                }),
            )
            .route(
                &format!("{}/clicks/export", self.prefix),
                get(move |Query(raw): Query<HashMap<String, String>>| {
                    let controller = export.clone();
                    async move { controller.export(raw.into()) }
                }),
            )
    }
}
