// Package upstream provides the device data source interface.

use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

use crate::metrics;
use crate::model::{DailyHealth, Job, PressSnapshot};

#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    #[error("data source timed out after {0:?}")]
    Timeout(Duration),
    #[error("unknown device {0}")]
    UnknownDevice(String),
    #[error("data source unavailable: {0}")]
    Unavailable(String),
}

/// DeviceSource defines the interface for the external press data feed.
#[async_trait::async_trait]
pub trait DeviceSource: Send + Sync {
    /// Returns up to `limit` jobs of the device with a marker greater than
    /// `after_marker`, in ascending marker order.
    async fn fetch_jobs(
        &self,
        device_id: &str,
        after_marker: Option<u64>,
        limit: usize,
    ) -> Result<Vec<Job>, SourceError>;

    /// Returns the live state of the press.
    async fn press_snapshot(&self, device_id: &str) -> Result<PressSnapshot, SourceError>;

    /// Returns the daily health counters between `from` and `to` inclusive,
    /// oldest first. Days the press was not scheduled have no record.
    async fn fetch_health(
        &self,
        device_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyHealth>, SourceError>;
}

/// Bounds every call of the wrapped source by a deadline.
pub struct TimeoutSource {
    inner: Arc<dyn DeviceSource>,
    timeout: Duration,
}

impl TimeoutSource {
    pub fn new(inner: Arc<dyn DeviceSource>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    fn elapsed(&self, device_id: &str, call: &'static str) -> SourceError {
        metrics::add_upstream_timeouts(1);
        warn!(
            component = "upstream",
            event = "timeout",
            device_id = device_id,
            call = call,
            timeout_ms = self.timeout.as_millis() as u64,
            "data source call timed out"
        );
        SourceError::Timeout(self.timeout)
    }
}

#[async_trait::async_trait]
impl DeviceSource for TimeoutSource {
    async fn fetch_jobs(
        &self,
        device_id: &str,
        after_marker: Option<u64>,
        limit: usize,
    ) -> Result<Vec<Job>, SourceError> {
        timeout(
            self.timeout,
            self.inner.fetch_jobs(device_id, after_marker, limit),
        )
        .await
        .map_err(|_| self.elapsed(device_id, "fetch_jobs"))?
    }

    async fn press_snapshot(&self, device_id: &str) -> Result<PressSnapshot, SourceError> {
        timeout(self.timeout, self.inner.press_snapshot(device_id))
            .await
            .map_err(|_| self.elapsed(device_id, "press_snapshot"))?
    }

    async fn fetch_health(
        &self,
        device_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyHealth>, SourceError> {
        timeout(self.timeout, self.inner.fetch_health(device_id, from, to))
            .await
            .map_err(|_| self.elapsed(device_id, "fetch_health"))?
    }
}
