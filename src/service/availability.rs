//! Press availability and technical health over a date range.
//!
//! Health counters come from the data source per device and day; issue rates
//! are taken against the impressions and sheets stored for the same days.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::http::AppError;
use crate::model::{
    round1, Availability, AvailabilityReport, DailyIssues, DailyRestarts, DailyValue, DeviceScope,
    JobFilter, RateSummary, Restarts, TechnicalIssues, ALL_DEVICES,
};
use crate::shared::time::Clock;
use crate::upstream::DeviceSource;

use super::calendar::quarter_window;
use super::comparator::DateRange;
use super::jobs::JobStore;
use super::registry::DeviceRegistry;

/// Longest range one analysis may span, in days.
pub const MAX_RANGE_DAYS: i64 = 366;

#[derive(Debug, Clone, Copy, Default)]
struct Day {
    scheduled: u64,
    available: u64,
    failures: u64,
    jams: u64,
    restarts: u64,
    impressions: u64,
    sheets: u64,
}

pub struct AvailabilityAnalyzer {
    registry: Arc<DeviceRegistry>,
    store: Arc<JobStore>,
    source: Arc<dyn DeviceSource>,
    clock: Arc<dyn Clock>,
}

impl AvailabilityAnalyzer {
    pub fn new(
        registry: Arc<DeviceRegistry>,
        store: Arc<JobStore>,
        source: Arc<dyn DeviceSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            store,
            source,
            clock,
        }
    }

    /// Resolves a possibly open range against today; the default is the
    /// three months ending today.
    pub fn resolve(&self, range: DateRange) -> Result<(NaiveDate, NaiveDate), AppError> {
        let today = self.clock.today();
        let (from, to) = match (range.from, range.to) {
            (Some(from), Some(to)) => (from, to),
            (Some(from), None) => (from, today),
            (None, Some(to)) => (quarter_window(to).0, to),
            (None, None) => quarter_window(today),
        };
        if (to - from).num_days() >= MAX_RANGE_DAYS {
            return Err(AppError::Validation(format!(
                "range {from} to {to} exceeds {MAX_RANGE_DAYS} days"
            )));
        }
        Ok((from, to))
    }

    /// Availability and issue rates per day for the scope. An inverted range
    /// yields an empty report.
    pub async fn analyze(&self, scope: &DeviceScope, range: DateRange) -> Result<AvailabilityReport, AppError> {
        let devices = self.registry.resolve(scope)?;
        let (from, to) = self.resolve(range)?;

        let mut days: BTreeMap<NaiveDate, Day> = BTreeMap::new();
        if from <= to {
            for device in &devices {
                for h in self.source.fetch_health(device, from, to).await? {
                    let day = days.entry(h.date).or_default();
                    day.scheduled += u64::from(h.scheduled_minutes);
                    day.available += u64::from(h.available_minutes);
                    day.failures += u64::from(h.failures);
                    day.jams += u64::from(h.paper_jams);
                    day.restarts += u64::from(h.restarts);
                }
            }

            let filter = JobFilter::for_device(scope.clone()).between(from, to);
            self.store.scan(&filter, |job| {
                // output on a day without a health record has no rate to feed
                if let Some(day) = days.get_mut(&job.job_date) {
                    day.impressions = day.impressions.saturating_add(job.total_impressions);
                    day.sheets = day.sheets.saturating_add(job.sheets);
                }
            });
        }

        Ok(AvailabilityReport {
            device_id: match scope {
                DeviceScope::All => ALL_DEVICES.to_string(),
                DeviceScope::Device(id) => id.clone(),
            },
            from_date: from,
            to_date: to,
            availability: availability(&days),
            technical_issues: technical_issues(&days),
            restarts: restarts(&days),
        })
    }
}

fn share(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(part as f64 / total as f64 * 100.0)
}

/// Occurrences per million units; zero without units.
fn per_million(count: u64, units: u64) -> f64 {
    if units == 0 {
        return 0.0;
    }
    round1(count as f64 / units as f64 * 1_000_000.0)
}

fn availability(days: &BTreeMap<NaiveDate, Day>) -> Availability {
    let (available, scheduled) = days
        .values()
        .fold((0, 0), |(a, s), d| (a + d.available, s + d.scheduled));
    Availability {
        average: share(available, scheduled),
        trend: days
            .iter()
            .map(|(date, d)| DailyValue {
                date: *date,
                value: share(d.available, d.scheduled),
            })
            .collect(),
    }
}

fn rate_summary(days: &BTreeMap<NaiveDate, Day>, count: fn(&Day) -> u64, units: fn(&Day) -> u64) -> RateSummary {
    let total_count: u64 = days.values().map(count).sum();
    let total_units = days.values().fold(0u64, |acc, d| acc.saturating_add(units(d)));
    RateSummary {
        average: per_million(total_count, total_units),
        max: days
            .values()
            .map(|d| per_million(count(d), units(d)))
            .fold(0.0, f64::max),
    }
}

fn technical_issues(days: &BTreeMap<NaiveDate, Day>) -> TechnicalIssues {
    TechnicalIssues {
        failure_rate: rate_summary(days, |d| d.failures, |d| d.impressions),
        paper_jam_rate: rate_summary(days, |d| d.jams, |d| d.sheets),
        daily_data: days
            .iter()
            .map(|(date, d)| DailyIssues {
                date: *date,
                failures: d.failures,
                jams: d.jams,
            })
            .collect(),
    }
}

fn restarts(days: &BTreeMap<NaiveDate, Day>) -> Restarts {
    let total: u64 = days.values().map(|d| d.restarts).sum();
    let average_rate = if days.is_empty() {
        0.0
    } else {
        round1(total as f64 / days.len() as f64)
    };
    Restarts {
        average_rate,
        max_rate: days.values().map(|d| d.restarts).max().unwrap_or(0) as f64,
        daily_data: days
            .iter()
            .map(|(date, d)| DailyRestarts {
                date: *date,
                restarts: d.restarts,
            })
            .collect(),
    }
}
