// Package model provides press device types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse availability of a press as shown to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
    Busy,
    Error,
}

/// Raw state reported by the press itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PressState {
    Ready,
    Printing,
    Off,
    Error,
}

impl PressState {
    pub fn status(self) -> DeviceStatus {
        match self {
            PressState::Ready => DeviceStatus::Online,
            PressState::Printing => DeviceStatus::Busy,
            PressState::Off => DeviceStatus::Offline,
            PressState::Error => DeviceStatus::Error,
        }
    }
}

/// Live snapshot of a press as delivered by the data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PressSnapshot {
    pub state: PressState,
    pub current_job_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    pub model: String,
    pub status: DeviceStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceStatusDetail {
    pub id: String,
    pub name: String,
    pub model: String,
    pub status: DeviceStatus,
    pub press_state: PressState,
    pub current_job_name: Option<String>,
    pub total_jobs: u64,
    pub printed_jobs: u64,
    pub total_impressions: u64,
    pub last_marker: Option<u64>,
    pub last_sync: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DevicePerformance {
    pub id: String,
    pub name: String,
    pub total_jobs: u64,
    pub printed_jobs: u64,
    pub aborted_jobs: u64,
    pub total_impressions: u64,
    pub total_sheets: u64,
    pub success_rate: f64,
    pub avg_impressions_per_job: f64,
}
