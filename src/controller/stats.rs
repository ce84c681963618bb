//! Statistics overview endpoint.

use axum::{extract::Query, routing::get, Json, Router};
use std::collections::HashMap;

use crate::http::{Controller, Params};
use crate::model::StatsOverview;
use crate::service::Services;

#[derive(Clone)]
pub struct StatsController {
    prefix: String,
    services: Services,
}

impl StatsController {
    pub fn new(prefix: &str, services: Services) -> Self {
        Self {
            prefix: prefix.to_string(),
            services,
        }
    }

    fn overview(&self, params: Params) -> Json<StatsOverview> {
        Json(self.services.stats.overview(&params.job_filter()))
    }
}

impl Controller for StatsController {
    fn add_route(&self, router: Router) -> Router {
        let controller = self.clone();
        router.route(
            &format!("{}/stats/overview", self.prefix),
            get(move |Query(raw): Query<HashMap<String, String>>| {
                let controller = controller.clone();
                async move { controller.overview(raw.into()) }
            }),
        )
    }
}
