//! Availability and technical health analysis.

use axum::{extract::Query, routing::get, Json, Router};
use std::collections::HashMap;

use crate::http::{AppError, Controller, Params};
use crate::model::AvailabilityReport;
use crate::service::Services;

#[derive(Clone)]
pub struct AnalysisController {
    prefix: String,
    services: Services,
}

impl AnalysisController {
    pub fn new(prefix: &str, services: Services) -> Self {
        Self {
            prefix: prefix.to_string(),
            services,
        }
    }

    async fn availability(&self, params: Params) -> Result<Json<AvailabilityReport>, AppError> {
        let report = self
            .services
            .availability
            .analyze(&params.scope(), params.date_range())
            .await?;
        Ok(Json(report))
    }
}

impl Controller for AnalysisController {
    fn add_route(&self, router: Router) -> Router {
        let availability = self.clone();

        router.route(
            &format!("{}/analysis/availability", self.prefix),
            get(move |Query(raw): Query<HashMap<String, String>>| {
                let controller = availability.clone();
                async move { controller.availability(raw.into()).await }
            }),
        )
    }
}
