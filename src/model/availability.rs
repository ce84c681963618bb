// Package model provides press availability and health types.

use chrono::NaiveDate;
use serde::Serialize;

/// Health counters a press reports for one working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyHealth {
    pub date: NaiveDate,
    pub scheduled_minutes: u32,
    pub available_minutes: u32,
    pub failures: u32,
    pub paper_jams: u32,
    pub restarts: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyValue {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Availability {
    pub average: f64,
    pub trend: Vec<DailyValue>,
}

/// Average and worst day of a rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RateSummary {
    pub average: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyIssues {
    pub date: NaiveDate,
    pub failures: u64,
    pub jams: u64,
}

/// Failures per million impressions and paper jams per million sheets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalIssues {
    pub failure_rate: RateSummary,
    pub paper_jam_rate: RateSummary,
    pub daily_data: Vec<DailyIssues>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRestarts {
    pub date: NaiveDate,
    pub restarts: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Restarts {
    pub average_rate: f64,
    pub max_rate: f64,
    pub daily_data: Vec<DailyRestarts>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityReport {
    pub device_id: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub availability: Availability,
    pub technical_issues: TechnicalIssues,
    pub restarts: Restarts,
}
