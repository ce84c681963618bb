//! Background removal of expired cache entries.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::store::CacheStore;

/// Sweeper periodically drops expired entries until the shutdown token fires.
/// Reads already ignore expired entries; this only bounds memory.
pub struct Sweeper {
    shutdown_token: CancellationToken,
    cache: Arc<dyn CacheStore>,
    interval: Duration,
}

impl Sweeper {
    pub fn new(
        shutdown_token: CancellationToken,
        cache: Arc<dyn CacheStore>,
        interval: Duration,
    ) -> Self {
        Self {
            shutdown_token,
            cache,
            interval,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            // first tick completes immediately
            ticker.tick().await;

            info!(
                component = "cache",
                event = "sweeper_started",
                interval_ms = self.interval.as_millis() as u64,
                "cache sweeper started"
            );

            loop {
                tokio::select! {
                    _ = self.shutdown_token.cancelled() => {
                        info!(component = "cache", event = "sweeper_stopped", "cache sweeper stopped");
                        return;
                    }
                    _ = ticker.tick() => {
                        let removed = self.cache.sweep();
                        if removed > 0 {
                            debug!(
                                component = "cache",
                                event = "swept",
                                removed = removed,
                                "expired entries removed"
                            );
                        }
                    }
                }
            }
        })
    }
}
