// Package model provides sync and import history types.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// What started a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncTrigger {
    Bootstrap,
    Manual,
    Background,
    Refresh,
}

/// One device sync, successful or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncLogEntry {
    pub timestamp: DateTime<Utc>,
    pub device_id: String,
    pub device_name: String,
    pub trigger: SyncTrigger,
    pub jobs_synced: u64,
    pub last_marker: Option<u64>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportLogEntry {
    pub timestamp: DateTime<Utc>,
    pub total_jobs: u64,
    pub imported: u64,
    pub skipped: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogPage<T> {
    pub logs: Vec<T>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncStatus {
    pub running: bool,
    pub interval_seconds: u64,
    pub recent_logs: Vec<SyncLogEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshStatus {
    Synced,
    Error,
}

/// Per-device result of a refresh.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshResult {
    pub device_id: String,
    pub device_name: String,
    pub status: RefreshStatus,
    pub jobs_synced: u64,
    pub last_marker: Option<u64>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshOutcome {
    pub status: &'static str,
    pub total_synced: u64,
    pub results: Vec<RefreshResult>,
    pub message: String,
}
