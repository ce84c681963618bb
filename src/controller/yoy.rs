//! Year-over-year comparison endpoints.

use axum::{extract::Query, routing::get, Json, Router};
use std::collections::HashMap;

use crate::http::{AppError, Controller, Params};
use crate::model::{YoYComparison, YoYTrend};
use crate::service::Services;

#[derive(Clone)]
pub struct YoYController {
    prefix: String,
    services: Services,
}

impl YoYController {
    pub fn new(prefix: &str, services: Services) -> Self {
        Self {
            prefix: prefix.to_string(),
            services,
        }
    }

    fn compare(&self, params: Params) -> Result<Json<YoYComparison>, AppError> {
        let cmp = self
            .services
            .comparator
            .compare(&params.scope(), params.date_range())?;
        Ok(Json(cmp))
    }

    fn trend(&self, params: Params) -> Result<Json<YoYTrend>, AppError> {
        let trend = self.services.comparator.trend(
            &params.scope(),
            params.year("current_year"),
            params.year("previous_year"),
        )?;
        Ok(Json(trend))
    }
}

impl Controller for YoYController {
    fn add_route(&self, router: Router) -> Router {
        let compare = self.clone();
        let trend = self.clone();

        router
            .route(
                &format!("{}/clicks/yoy", self.prefix),
                get(move |Query(raw): Query<HashMap<String, String>>| {
                    let controller = compare.clone();
                    async move { controller.compare(raw.into()) }
                }),
            )
            .route(
                &format!("{}/clicks/yoy/trend", self.prefix),
                get(move |Query(raw): Query<HashMap<String, String>>| {
                    let controller = trend.clone();
                    async move { controller.trend(raw.into()) }
                }),
            )
    }
}
