// HTTP server wiring for the dashboard application.

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::{Config, ConfigTrait};
use crate::controller;
use crate::http::{Controller, Middleware};
use crate::middleware::{PanicRecoverMiddleware, TraceMiddleware};
use crate::service::Services;

/// Wraps the HTTP server and tracks whether it is serving.
pub struct AppServer {
    server: crate::http::HttpServer,
    is_server_alive: AtomicBool,
}

impl AppServer {
    pub fn new(ctx: CancellationToken, cfg: &Config, services: &Services) -> Arc<Self> {
        let server = crate::http::HttpServer::new(
            ctx,
            cfg.clone(),
            Self::controllers(cfg, services),
            Self::middlewares(),
        );
        Arc::new(Self {
            server,
            is_server_alive: AtomicBool::new(false),
        })
    }

    /// Returns true while the server loop is running.
    pub fn is_alive(&self) -> bool {
        self.is_server_alive.load(Ordering::Relaxed)
    }

    pub async fn bind(&self) -> Result<TcpListener> {
        self.server.bind().await
    }

    /// Serves until shutdown (blocking call).
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        self.is_server_alive.store(true, Ordering::Relaxed);
        let result = self.server.serve(listener).await;
        self.is_server_alive.store(false, Ordering::Relaxed);
        result
    }

    /// Returns all HTTP controllers for the server.
    fn controllers(cfg: &Config, services: &Services) -> Vec<Box<dyn Controller>> {
        let prefix = cfg.prefix();
        vec![
            // Healthcheck probe endpoint
            Box::new(controller::LivenessProbeController::new()),
            // Metrics endpoint
            Box::new(controller::PrometheusMetricsController::new(prefix)),
            // API name and version
            Box::new(controller::RootController::new(prefix)),
            // Device list, status and performance
            Box::new(controller::DevicesController::new(prefix, services.clone())),
            // Job listing, sync, import and import history
            Box::new(controller::JobsController::new(prefix, services.clone())),
            // Sync history, background sync and data refresh
            Box::new(controller::SyncController::new(prefix, services.clone())),
            // Aggregate overview
            Box::new(controller::StatsController::new(prefix, services.clone())),
            // Click report, trend and CSV export
            Box::new(controller::ClicksController::new(prefix, services.clone())),
            // Year-over-year comparison and monthly trend
            Box::new(controller::YoYController::new(prefix, services.clone())),
            // Availability and technical health
            Box::new(controller::AnalysisController::new(prefix, services.clone())),
            // Cache status and clear
            Box::new(controller::CacheController::new(prefix, services.cache.clone())),
        ]
    }

    /// Returns the request middlewares for the server; the first one is outermost.
    fn middlewares() -> Vec<Box<dyn Middleware>> {
        vec![
            // Request spans
            Box::new(TraceMiddleware::new()),
            // Panic recovery
            Box::new(PanicRecoverMiddleware::new()),
        ]
    }
}
