// Package model provides print job records and the filter shared by every job query.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Scope value meaning "every device".
pub const ALL_DEVICES: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Printed,
    Aborted,
    Printing,
    Queued,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Printed => "PRINTED",
            JobStatus::Aborted => "ABORTED",
            JobStatus::Printing => "PRINTING",
            JobStatus::Queued => "QUEUED",
        }
    }
}

/// Billing classification of a job by colorant usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClickCategory {
    #[serde(rename = "1 Color")]
    OneColor,
    #[serde(rename = "2 Colors")]
    TwoColors,
    #[serde(rename = "EPM")]
    Epm,
    #[serde(rename = "Multicolor")]
    Multicolor,
}

impl ClickCategory {
    /// Every category in report order.
    pub const ALL: [ClickCategory; 4] = [
        ClickCategory::OneColor,
        ClickCategory::TwoColors,
        ClickCategory::Epm,
        ClickCategory::Multicolor,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ClickCategory::OneColor => "1 Color",
            ClickCategory::TwoColors => "2 Colors",
            ClickCategory::Epm => "EPM",
            ClickCategory::Multicolor => "Multicolor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub marker: u64,
    pub press_id: String,
    pub job_name: String,
    pub status: JobStatus,
    pub total_impressions: u64,
    #[serde(default)]
    pub sheets: u64,
    pub click_category: ClickCategory,
    pub job_date: NaiveDate,
}

/// Upper bound of the impression and sheet counts of a single job. Larger
/// values are rejected at ingestion so that sums over the store stay exact.
pub const MAX_JOB_COUNT: u64 = 1_000_000_000;

impl Job {
    pub fn within_bounds(&self) -> bool {
        self.total_impressions <= MAX_JOB_COUNT && self.sheets <= MAX_JOB_COUNT
    }
}

/// Device restriction of a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum DeviceScope {
    #[default]
    All,
    Device(String),
}

impl DeviceScope {
    /// Absent, empty and `"all"` all mean every device.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some(ALL_DEVICES) => DeviceScope::All,
            Some(id) => DeviceScope::Device(id.to_string()),
        }
    }

    pub fn matches(&self, press_id: &str) -> bool {
        match self {
            DeviceScope::All => true,
            DeviceScope::Device(id) => id == press_id,
        }
    }
}

/// Filter applied identically by job listing, click reports, trends and export.
///
/// `status` and `click_category` are compared verbatim against the serialized
/// enum values, so an unknown value simply matches nothing. Date bounds are
/// inclusive.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub device: DeviceScope,
    pub status: Option<String>,
    pub click_category: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl JobFilter {
    pub fn for_device(device: DeviceScope) -> Self {
        Self {
            device,
            ..Self::default()
        }
    }

    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn matches(&self, job: &Job) -> bool {
        if !self.device.matches(&job.press_id) {
            return false;
        }
        if let Some(ref status) = self.status {
            if status != job.status.as_str() {
                return false;
            }
        }
        if let Some(ref category) = self.click_category {
            if category != job.click_category.label() {
                return false;
            }
        }
        if let Some(from) = self.from {
            if job.job_date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if job.job_date > to {
                return false;
            }
        }
        true
    }
}
