//! Domain types exchanged over the HTTP API.

pub mod availability;
pub mod clicks;
pub mod device;
pub mod history;
pub mod job;
pub mod stats;
pub mod yoy;


// Re-export main types
pub use availability::{
    Availability, AvailabilityReport, DailyHealth, DailyIssues, DailyRestarts, DailyValue,
    RateSummary, Restarts, TechnicalIssues,
};
pub use clicks::{CategoryBreakdown, ClicksReport, Resolution, TrendPoint};
pub use device::{
    Device, DevicePerformance, DeviceStatus, DeviceStatusDetail, PressSnapshot, PressState,
};
pub use history::{
    ImportLogEntry, LogPage, RefreshOutcome, RefreshResult, RefreshStatus, SyncLogEntry,
    SyncStatus, SyncTrigger,
};
pub use job::{ClickCategory, DeviceScope, Job, JobFilter, JobStatus, ALL_DEVICES, MAX_JOB_COUNT};
pub use stats::{percentage, round1, StatsOverview};
pub use yoy::{MonthEntry, Period, Source, TrendDirection, YoYComparison, YoYTrend};
