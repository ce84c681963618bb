//! Dashboard services: device registry, job store and ingestion, aggregates,
//! CSV export, the year-over-year comparator and availability analysis.

pub mod availability;
pub mod background;
pub mod calendar;
pub mod comparator;
pub mod export;
pub mod history;
pub mod ingest;
pub mod jobs;
pub mod registry;
pub mod stats;

#[cfg(test)]
mod comparator_test;
#[cfg(test)]
mod registry_test;

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::cache::CacheStore;
use crate::config::{Config, ConfigTrait};
use crate::shared::time::Clock;
use crate::upstream::{DeviceSource, TimeoutSource};

// Re-export main types
pub use availability::AvailabilityAnalyzer;
pub use background::BackgroundSync;
pub use comparator::{DateRange, YoYComparator};
pub use export::CsvExporter;
pub use history::{LogRing, DEFAULT_LOG_LIMIT, LOG_CAPACITY};
pub use ingest::{ImportOutcome, ImportRequest, JobIngest, SyncOutcome};
pub use jobs::{JobPage, JobStore, JobTotals};
pub use registry::DeviceRegistry;
pub use stats::StatsAggregator;

/// Services shares one job store, data source and cache between every
/// component that reads or writes them.
#[derive(Clone)]
pub struct Services {
    pub registry: Arc<DeviceRegistry>,
    pub store: Arc<JobStore>,
    pub ingest: Arc<JobIngest>,
    pub stats: Arc<StatsAggregator>,
    pub export: Arc<CsvExporter>,
    pub comparator: Arc<YoYComparator>,
    pub availability: Arc<AvailabilityAnalyzer>,
    pub background: Arc<BackgroundSync>,
    pub cache: Arc<dyn CacheStore>,
}

impl Services {
    /// Wires the services. Every data source call is bounded by the
    /// configured upstream timeout; the background sync ends with
    /// `shutdown_token`.
    pub fn new(
        cfg: &Config,
        source: Arc<dyn DeviceSource>,
        cache: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
        shutdown_token: CancellationToken,
    ) -> Self {
        let source: Arc<dyn DeviceSource> =
            Arc::new(TimeoutSource::new(source, cfg.upstream_timeout()));
        let store = Arc::new(JobStore::new());
        let registry = Arc::new(DeviceRegistry::new(
            cfg.devices().to_vec(),
            source.clone(),
            store.clone(),
        ));
        let ingest = Arc::new(JobIngest::new(
            registry.clone(),
            store.clone(),
            source.clone(),
            cache.clone(),
            clock.clone(),
            cfg.sync_batch(),
        ));
        let comparator = Arc::new(YoYComparator::new(
            registry.clone(),
            store.clone(),
            cache.clone(),
            clock.clone(),
            cfg.locale(),
        ));
        let availability = Arc::new(AvailabilityAnalyzer::new(
            registry.clone(),
            store.clone(),
            source,
            clock,
        ));
        let background = Arc::new(BackgroundSync::new(
            shutdown_token,
            ingest.clone(),
            cfg.sync_interval(),
        ));

        Self {
            registry,
            stats: Arc::new(StatsAggregator::new(store.clone())),
            export: Arc::new(CsvExporter::new(store.clone())),
            store,
            ingest,
            comparator,
            availability,
            background,
            cache,
        }
    }
}
