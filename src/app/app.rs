// Main dashboard application implementation.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::cache::{CacheStore, ResponseCache, Sweeper};
use crate::config::{Config, ConfigTrait};
use crate::model::{DeviceScope, SyncTrigger};
use crate::service::Services;
use crate::shared::time::{Clock, SystemClock};
use crate::shutdown::GracefulShutdown;
use crate::upstream::{DeviceSource, FixtureSource};

use super::server::AppServer;

const DEFAULT_JOBS_PER_DEVICE: usize = 400;
const DEFAULT_SEED: u64 = 2024;

/// Encapsulates the entire dashboard application state.
#[derive(Clone)]
pub struct App {
    cfg: Config,
    shutdown_token: CancellationToken,
    services: Services,
    server: Arc<AppServer>,
}

impl App {
    /// Creates the application over the seeded fixture feed and the system clock.
    pub fn new(shutdown_token: CancellationToken, cfg: Config) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let (jobs_per_device, seed) = match cfg.mock() {
            Some(mock) if !mock.enabled => (0, DEFAULT_SEED),
            Some(mock) => (
                mock.jobs_per_device.unwrap_or(DEFAULT_JOBS_PER_DEVICE),
                mock.seed.unwrap_or(DEFAULT_SEED),
            ),
            None => (DEFAULT_JOBS_PER_DEVICE, DEFAULT_SEED),
        };
        let source = Arc::new(FixtureSource::new(
            cfg.devices(),
            jobs_per_device,
            seed,
            clock.today(),
        ));
        Self::with_source(shutdown_token, cfg, source, clock)
    }

    /// Creates the application over an arbitrary data source and clock.
    pub fn with_source(
        shutdown_token: CancellationToken,
        cfg: Config,
        source: Arc<dyn DeviceSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache: Arc<dyn CacheStore> = Arc::new(ResponseCache::new(&cfg, clock.clone()));
        let services = Services::new(&cfg, source, cache, clock, shutdown_token.clone());
        let server = AppServer::new(shutdown_token.clone(), &cfg, &services);

        Self {
            cfg,
            shutdown_token,
            services,
            server,
        }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Returns true while the HTTP server is serving.
    pub fn is_alive(&self) -> bool {
        self.server.is_alive()
    }

    /// Initial ingestion of every configured device. A failing device is
    /// logged and skipped.
    pub async fn bootstrap(&self) {
        for id in self.services.registry.ids() {
            let scope = DeviceScope::Device(id.to_string());
            if let Err(e) = self.services.ingest.sync_as(&scope, SyncTrigger::Bootstrap).await {
                warn!(
                    component = "app",
                    event = "bootstrap_sync_failed",
                    device_id = id,
                    error = %e,
                    "initial sync failed"
                );
            }
        }
    }

    /// Binds the listener, ingests the initial data and serves in the
    /// background. Returns the bound address.
    pub async fn serve(&self, gsh: Arc<GracefulShutdown>) -> Result<SocketAddr> {
        let listener = self.server.bind().await?;
        let addr = listener
            .local_addr()
            .context("failed to read bound address")?;

        self.bootstrap().await;

        if let Some(interval) = self.cfg.cache_sweep_interval() {
            gsh.add(1);
            let sweeper = Sweeper::new(
                self.shutdown_token.clone(),
                self.services.cache.clone(),
                interval,
            )
            .spawn();
            let gsh = gsh.clone();
            tokio::task::spawn(async move {
                if let Err(e) = sweeper.await {
                    warn!(
                        component = "app",
                        event = "sweeper_failed",
                        error = %e,
                        "cache sweeper ended abnormally"
                    );
                }
                gsh.done();
            });
        }

        if self.cfg.auto_sync() {
            self.services.background.start();
        }

        gsh.add(1);
        let server = self.server.clone();
        let app = self.clone();
        tokio::task::spawn(async move {
            if let Err(e) = server.serve(listener).await {
                error!(
                    component = "app",
                    scope = "server",
                    event = "serve_failed",
                    error = %e,
                    "server failed to serve"
                );
            }
            app.close();
            gsh.done();
        });

        info!(
            component = "app",
            event = "started",
            addr = %addr,
            "application lifecycle"
        );
        Ok(addr)
    }

    /// Cancels every background task.
    pub fn close(&self) {
        self.shutdown_token.cancel();
        info!(
            component = "app",
            event = "stopped",
            "application lifecycle"
        );
    }
}
