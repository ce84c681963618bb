//! Lenient query parameter parsing: malformed values fall back to defaults
//! instead of failing the request.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::model::{DeviceScope, JobFilter, Resolution};
use crate::service::jobs::{DEFAULT_LIMIT, MAX_LIMIT};
use crate::service::{DateRange, DEFAULT_LOG_LIMIT, LOG_CAPACITY};

const DATE_FORMAT: &str = "%Y-%m-%d";
/// Filter value meaning "no restriction".
const ANY: &str = "all";

#[derive(Debug, Clone, Default)]
pub struct Params(HashMap<String, String>);

impl From<HashMap<String, String>> for Params {
    fn from(raw: HashMap<String, String>) -> Self {
        Self(raw)
    }
}

impl Params {
    /// Trimmed non-empty value.
    pub fn str(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        self.str(name)
            .and_then(|v| NaiveDate::parse_from_str(v, DATE_FORMAT).ok())
    }

    pub fn int<T: std::str::FromStr>(&self, name: &str) -> Option<T> {
        self.str(name).and_then(|v| v.parse().ok())
    }

    pub fn scope(&self) -> DeviceScope {
        DeviceScope::parse(self.str("device_id"))
    }

    /// Exact-match filter value; `"all"` lifts the restriction.
    fn exact(&self, name: &str) -> Option<String> {
        self.str(name).filter(|v| *v != ANY).map(str::to_string)
    }

    pub fn job_filter(&self) -> JobFilter {
        JobFilter {
            device: self.scope(),
            status: self.exact("status"),
            click_category: self.exact("click_category"),
            from: self.date("from_date"),
            to: self.date("to_date"),
        }
    }

    pub fn date_range(&self) -> DateRange {
        DateRange {
            from: self.date("from_date"),
            to: self.date("to_date"),
        }
    }

    /// 1-based page; anything below 1 or unparsable becomes 1.
    pub fn page(&self) -> usize {
        self.int::<i64>("page")
            .map(|p| p.max(1) as usize)
            .unwrap_or(1)
    }

    pub fn limit(&self) -> usize {
        self.int::<i64>("limit")
            .map(|l| l.clamp(1, MAX_LIMIT as i64) as usize)
            .unwrap_or(DEFAULT_LIMIT)
    }

    /// Entries of a history log; clamped to what the log keeps.
    pub fn log_limit(&self) -> usize {
        self.int::<i64>("limit")
            .map(|l| l.clamp(1, LOG_CAPACITY as i64) as usize)
            .unwrap_or(DEFAULT_LOG_LIMIT)
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::parse(self.str("resolution"))
    }

    pub fn year(&self, name: &str) -> Option<i32> {
        self.int::<i32>(name).filter(|y| (1..=9999).contains(y))
    }
}
