// Package model provides aggregate statistics types.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsOverview {
    pub total_jobs: u64,
    pub total_impressions: u64,
    pub total_sheets: u64,
    pub printed_jobs: u64,
    pub aborted_jobs: u64,
    pub success_rate: f64,
}

/// Rounds to one decimal place.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Share of `part` in `total` as a percentage with one decimal; zero when `total` is zero.
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(part as f64 / total as f64 * 100.0)
}
