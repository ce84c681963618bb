//! Client-facing error taxonomy and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::time::Duration;
use tracing::error;

use crate::upstream::SourceError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("device {0} not found")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("data source did not answer within {0:?}")]
    UpstreamTimeout(Duration),
    #[error("data source failed: {0}")]
    Upstream(String),
    #[error("aggregation failed: {0}")]
    Aggregation(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Aggregation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the client. Server-side failures get a fixed text.
    pub fn detail(&self) -> String {
        match self {
            AppError::NotFound(_) | AppError::Validation(_) => self.to_string(),
            AppError::UpstreamTimeout(_) => "data source timed out".to_string(),
            AppError::Upstream(_) => "data source unavailable".to_string(),
            AppError::Aggregation(_) => "internal aggregation error".to_string(),
        }
    }
}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Timeout(after) => AppError::UpstreamTimeout(after),
            SourceError::UnknownDevice(id) => AppError::NotFound(id),
            SourceError::Unavailable(reason) => AppError::Upstream(reason),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                component = "http",
                event = "request_failed",
                status = status.as_u16(),
                error = %self,
                "request failed"
            );
        }
        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}
