//! Periodic sync of every device, switched on and off at runtime.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::model::{DeviceScope, SyncStatus, SyncTrigger};

use super::ingest::JobIngest;

/// BackgroundSync runs a sync of all devices every `interval` while started.
/// The worker holds a child of the application shutdown token, so it also
/// ends with the application.
pub struct BackgroundSync {
    shutdown_token: CancellationToken,
    ingest: Arc<JobIngest>,
    interval: Duration,
    worker: Mutex<Option<CancellationToken>>,
}

impl BackgroundSync {
    pub fn new(shutdown_token: CancellationToken, ingest: Arc<JobIngest>, interval: Duration) -> Self {
        Self {
            shutdown_token,
            ingest,
            interval,
            worker: Mutex::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .lock()
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }

    /// Spawns the worker; the first run starts right away. Returns false when
    /// it was already running.
    pub fn start(&self) -> bool {
        let mut worker = self.worker.lock();
        if worker.as_ref().is_some_and(|token| !token.is_cancelled()) {
            return false;
        }

        let token = self.shutdown_token.child_token();
        *worker = Some(token.clone());

        let ingest = self.ingest.clone();
        let interval = self.interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            info!(
                component = "sync",
                event = "background_started",
                interval_ms = interval.as_millis() as u64,
                "background sync started"
            );

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        info!(component = "sync", event = "background_stopped", "background sync stopped");
                        return;
                    }
                    _ = ticker.tick() => {
                        // failed devices are in the sync log; the next tick retries them
                        match ingest.refresh_as(&DeviceScope::All, SyncTrigger::Background).await {
                            Ok(outcome) if outcome.status != "success" => warn!(
                                component = "sync",
                                event = "background_run_partial",
                                message = %outcome.message,
                                "background sync run incomplete"
                            ),
                            Ok(_) => {}
                            Err(err) => warn!(
                                component = "sync",
                                event = "background_run_failed",
                                error = %err,
                                "background sync run failed"
                            ),
                        }
                    }
                }
            }
        });
        true
    }

    /// Cancels the worker. Returns false when it was not running.
    pub fn stop(&self) -> bool {
        match self.worker.lock().take() {
            Some(token) if !token.is_cancelled() => {
                token.cancel();
                true
            }
            _ => false,
        }
    }

    pub fn status(&self, limit: usize) -> SyncStatus {
        SyncStatus {
            running: self.is_running(),
            interval_seconds: self.interval.as_secs(),
            recent_logs: self.ingest.sync_log(limit),
        }
    }
}
