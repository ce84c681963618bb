// Integration test harness: one dashboard server per test on an ephemeral port.

use chrono::{TimeZone, Utc};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::app::App;
use crate::config::{self, Config, ConfigTrait};
use crate::shared::time::{Clock, ManualClock};
use crate::shutdown::GracefulShutdown;
use crate::upstream::{DeviceSource, FixtureSource};

/// A running dashboard bound to 127.0.0.1 with a pinned clock
/// (2025-06-15 12:00 UTC) and the seeded fixture feed.
pub struct DashboardServer {
    addr: SocketAddr,
    prefix: String,
    shutdown_token: CancellationToken,
    pub clock: Arc<ManualClock>,
    pub source: Option<Arc<FixtureSource>>,
}

impl DashboardServer {
    pub async fn start() -> Self {
        Self::start_with(config::new_test_config()).await
    }

    pub async fn start_with(cfg: Config) -> Self {
        let clock = pinned_clock();
        let jobs = cfg
            .mock()
            .and_then(|m| m.jobs_per_device)
            .unwrap_or(120);
        let seed = cfg.mock().and_then(|m| m.seed).unwrap_or(42);
        let source = Arc::new(FixtureSource::new(cfg.devices(), jobs, seed, clock.today()));

        let mut server = Self::start_with_source(cfg, source.clone(), clock).await;
        server.source = Some(source);
        server
    }

    pub async fn start_with_source(
        cfg: Config,
        source: Arc<dyn DeviceSource>,
        clock: Arc<ManualClock>,
    ) -> Self {
        let prefix = cfg.prefix().to_string();
        let shutdown_token = CancellationToken::new();
        let gsh = Arc::new(GracefulShutdown::new(shutdown_token.clone()));
        let app = App::with_source(shutdown_token.clone(), cfg, source, clock.clone());
        let addr = app.serve(gsh).await.expect("dashboard server starts");

        Self {
            addr,
            prefix,
            shutdown_token,
            clock,
            source: None,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.addr.port(), path)
    }

    /// URL under the API prefix.
    pub fn api(&self, path: &str) -> String {
        self.url(&format!("{}{}", self.prefix, path))
    }

    pub fn fixture(&self) -> &FixtureSource {
        self.source.as_deref().expect("server runs on the fixture feed")
    }
}

impl Drop for DashboardServer {
    fn drop(&mut self) {
        self.shutdown_token.cancel();
    }
}

pub fn pinned_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap(),
    ))
}
