// Package model provides year-over-year comparison types.

use chrono::NaiveDate;
use serde::Serialize;

/// Where a figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Live,
    Cached,
}

/// Band around zero (inclusive) inside which a change counts as stable.
pub const STABLE_EPSILON_PERCENT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    pub fn from_change_percent(change_percent: f64) -> Self {
        if change_percent > STABLE_EPSILON_PERCENT {
            TrendDirection::Up
        } else if change_percent < -STABLE_EPSILON_PERCENT {
            TrendDirection::Down
        } else {
            TrendDirection::Stable
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Period {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub year: i32,
    pub total_impressions: u64,
    pub source: Source,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YoYComparison {
    pub current_period: Period,
    pub previous_period: Period,
    pub change_absolute: i64,
    pub change_percent: f64,
    pub trend: TrendDirection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthEntry {
    pub month: &'static str,
    pub current_year: u64,
    pub previous_year: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YoYTrend {
    pub current_year: i32,
    pub previous_year: i32,
    pub trend: Vec<MonthEntry>,
    pub source: Source,
}
