//! Incremental job sync from the data source, plus bulk import.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;
use crate::http::AppError;
use crate::metrics;
use crate::model::{
    DeviceScope, ImportLogEntry, Job, RefreshOutcome, RefreshResult, RefreshStatus, SyncLogEntry,
    SyncTrigger,
};
use crate::shared::time::{since, Clock};
use crate::upstream::DeviceSource;

use super::history::LogRing;
use super::jobs::JobStore;
use super::registry::DeviceRegistry;

#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    pub status: &'static str,
    pub jobs_synced: u64,
    pub last_marker: Option<u64>,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportRequest {
    #[serde(default)]
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub status: &'static str,
    pub imported: u64,
    pub skipped: u64,
}

/// JobIngest pulls new jobs into the store and keeps cached figures of the
/// touched devices from going stale. Every device sync and every import is
/// recorded in a bounded log.
pub struct JobIngest {
    registry: Arc<DeviceRegistry>,
    store: Arc<JobStore>,
    source: Arc<dyn DeviceSource>,
    cache: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    batch: usize,
    sync_log: LogRing<SyncLogEntry>,
    import_log: LogRing<ImportLogEntry>,
}

impl JobIngest {
    pub fn new(
        registry: Arc<DeviceRegistry>,
        store: Arc<JobStore>,
        source: Arc<dyn DeviceSource>,
        cache: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
        batch: usize,
    ) -> Self {
        Self {
            registry,
            store,
            source,
            cache,
            clock,
            batch: batch.max(1),
            sync_log: LogRing::default(),
            import_log: LogRing::default(),
        }
    }

    /// Syncs one device, or every configured device for the `all` scope.
    pub async fn sync(&self, scope: &DeviceScope) -> Result<SyncOutcome, AppError> {
        self.sync_as(scope, SyncTrigger::Manual).await
    }

    /// Same as `sync`, recording `trigger` in the sync log. The first failing
    /// device ends the run; devices synced before it keep their jobs.
    pub async fn sync_as(&self, scope: &DeviceScope, trigger: SyncTrigger) -> Result<SyncOutcome, AppError> {
        let ids = self.registry.resolve(scope)?;

        let mut jobs_synced = 0;
        let mut last_marker = None;
        for id in &ids {
            let (synced, marker) = self.sync_device(id, trigger).await?;
            jobs_synced += synced;
            last_marker = last_marker.max(marker);
        }

        let message = match scope {
            DeviceScope::All => format!("synced {jobs_synced} new jobs from {} devices", ids.len()),
            DeviceScope::Device(id) => format!("synced {jobs_synced} new jobs from device {id}"),
        };
        Ok(SyncOutcome {
            status: "success",
            jobs_synced,
            last_marker,
            message,
        })
    }

    /// Syncs every device of the scope. Unlike `sync`, a failing device does
    /// not end the run; its error is reported in its own result.
    pub async fn refresh(&self, scope: &DeviceScope) -> Result<RefreshOutcome, AppError> {
        self.refresh_as(scope, SyncTrigger::Refresh).await
    }

    pub async fn refresh_as(&self, scope: &DeviceScope, trigger: SyncTrigger) -> Result<RefreshOutcome, AppError> {
        let ids = self.registry.resolve(scope)?;

        let mut results = Vec::with_capacity(ids.len());
        for id in &ids {
            let result = match self.sync_device(id, trigger).await {
                Ok((jobs_synced, last_marker)) => RefreshResult {
                    device_id: id.clone(),
                    device_name: self.device_name(id),
                    status: RefreshStatus::Synced,
                    jobs_synced,
                    last_marker,
                    error: None,
                },
                Err(err) => RefreshResult {
                    device_id: id.clone(),
                    device_name: self.device_name(id),
                    status: RefreshStatus::Error,
                    jobs_synced: 0,
                    last_marker: self.store.last_marker(id),
                    error: Some(err.detail()),
                },
            };
            results.push(result);
        }

        let total_synced: u64 = results.iter().map(|r| r.jobs_synced).sum();
        let failed = results
            .iter()
            .filter(|r| r.status == RefreshStatus::Error)
            .count();
        let (status, message) = if failed == 0 {
            (
                "success",
                format!("refreshed {} devices, {total_synced} new jobs", results.len()),
            )
        } else {
            (
                "partial",
                format!(
                    "refreshed {} of {} devices, {total_synced} new jobs",
                    results.len() - failed,
                    results.len()
                ),
            )
        };

        Ok(RefreshOutcome {
            status,
            total_synced,
            results,
            message,
        })
    }

    async fn sync_device(&self, device_id: &str, trigger: SyncTrigger) -> Result<(u64, Option<u64>), AppError> {
        let started = self.clock.now();
        let mut synced = 0u64;
        let fetched = self.fetch_new(device_id, &mut synced).await;

        // batches stored before a failure are visible, so cached figures go either way
        if synced > 0 {
            metrics::add_jobs_synced(synced);
            self.cache.invalidate_device(device_id);
        }
        let last_marker = self.store.last_marker(device_id);

        match fetched {
            Ok(()) => {
                self.store.mark_synced(device_id, self.clock.now());
                info!(
                    component = "ingest",
                    event = "synced",
                    device_id = device_id,
                    jobs_synced = synced,
                    last_marker = last_marker,
                    took_ms = since(self.clock.as_ref(), started).as_millis() as u64,
                    "device synced"
                );
                self.record(device_id, trigger, synced, last_marker, None);
                Ok((synced, last_marker))
            }
            Err(err) => {
                warn!(
                    component = "ingest",
                    event = "sync_failed",
                    device_id = device_id,
                    jobs_synced = synced,
                    last_marker = last_marker,
                    error = %err,
                    "device sync failed"
                );
                self.record(device_id, trigger, synced, last_marker, Some(err.detail()));
                Err(err)
            }
        }
    }

    /// Fetches batches until the feed is drained, storing each one as it
    /// arrives. `synced` counts the stored jobs even when a later batch fails.
    async fn fetch_new(&self, device_id: &str, synced: &mut u64) -> Result<(), AppError> {
        let mut after = self.store.last_marker(device_id);

        loop {
            let cursor = after;
            let jobs = self.source.fetch_jobs(device_id, cursor, self.batch).await?;
            let fetched = jobs.len();
            if let Some(last) = jobs.last() {
                after = after.max(Some(last.marker));
            }

            let (accepted, rejected): (Vec<Job>, Vec<Job>) = jobs
                .into_iter()
                .filter(|j| j.press_id == device_id)
                .partition(Job::within_bounds);
            if !rejected.is_empty() {
                warn!(
                    component = "ingest",
                    event = "jobs_rejected",
                    device_id = device_id,
                    rejected = rejected.len(),
                    "jobs with out-of-range counts dropped"
                );
            }
            *synced += self.store.insert_many(accepted) as u64;

            debug!(
                component = "ingest",
                event = "batch",
                device_id = device_id,
                fetched = fetched,
                "job batch fetched"
            );
            // a short batch, or one that did not move the cursor, ends the feed
            if fetched < self.batch || after == cursor {
                return Ok(());
            }
        }
    }

    /// Stores pushed jobs. Jobs of unknown devices, jobs with out-of-range
    /// counts and already known `(press_id, marker)` pairs are skipped.
    pub fn import(&self, request: ImportRequest) -> ImportOutcome {
        let received = request.jobs.len() as u64;
        let accepted: Vec<Job> = request
            .jobs
            .into_iter()
            .filter(|j| self.registry.get(&j.press_id).is_some() && j.within_bounds())
            .collect();

        let mut touched: Vec<String> = accepted.iter().map(|j| j.press_id.clone()).collect();
        touched.sort_unstable();
        touched.dedup();

        let imported = self.store.insert_many(accepted) as u64;
        if imported > 0 {
            for device_id in &touched {
                self.cache.invalidate_device(device_id);
            }
        }

        let skipped = received - imported;
        info!(
            component = "ingest",
            event = "imported",
            imported = imported,
            skipped = skipped,
            "jobs imported"
        );
        self.import_log.push(ImportLogEntry {
            timestamp: self.clock.now(),
            total_jobs: received,
            imported,
            skipped,
        });
        ImportOutcome {
            status: "success",
            imported,
            skipped,
        }
    }

    /// Latest device syncs, newest first.
    pub fn sync_log(&self, limit: usize) -> Vec<SyncLogEntry> {
        self.sync_log.recent(limit)
    }

    /// Latest imports, newest first.
    pub fn import_log(&self, limit: usize) -> Vec<ImportLogEntry> {
        self.import_log.recent(limit)
    }

    fn device_name(&self, device_id: &str) -> String {
        self.registry
            .get(device_id)
            .map(|d| d.name.clone())
            .unwrap_or_default()
    }

    fn record(
        &self,
        device_id: &str,
        trigger: SyncTrigger,
        jobs_synced: u64,
        last_marker: Option<u64>,
        error: Option<String>,
    ) {
        self.sync_log.push(SyncLogEntry {
            timestamp: self.clock.now(),
            device_id: device_id.to_string(),
            device_name: self.device_name(device_id),
            trigger,
            jobs_synced,
            last_marker,
            error,
        });
    }
}
