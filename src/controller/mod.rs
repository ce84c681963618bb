// HTTP API controllers for the dashboard endpoints.

pub mod analysis;
pub mod cache;
pub mod clicks;
pub mod controller;
pub mod devices;
pub mod jobs;
pub mod metrics;
pub mod probe;
pub mod root;
pub mod stats;
pub mod sync;
pub mod yoy;

// Re-export controller types for convenience
pub use analysis::AnalysisController;
pub use cache::CacheController;
pub use clicks::ClicksController;
pub use devices::DevicesController;
pub use jobs::JobsController;
pub use metrics::{init_prometheus_exporter, PrometheusMetricsController};
pub use probe::LivenessProbeController;
pub use root::RootController;
pub use stats::StatsController;
pub use sync::SyncController;
pub use yoy::YoYController;
