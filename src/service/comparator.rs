//! Year-over-year impression comparison, read through the response cache.
//!
//! Figures are cached per single device. A multi-device scope is summed from
//! the per-device parts and counts as cached only when every part was.

use chrono::{Datelike, NaiveDate};
use std::sync::Arc;

use crate::cache::{read_through, CacheKey, CacheStore, CachedValue, Lookup};
use crate::config::Locale;
use crate::http::AppError;
use crate::model::{
    round1, DeviceScope, JobFilter, MonthEntry, Period, Source, TrendDirection, YoYComparison,
    YoYTrend,
};
use crate::shared::time::Clock;

use super::calendar::{default_window, month_index, month_labels, one_year_back, year_bounds};
use super::jobs::JobStore;
use super::registry::DeviceRegistry;

/// Requested comparison window; either end may be omitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

pub struct YoYComparator {
    registry: Arc<DeviceRegistry>,
    store: Arc<JobStore>,
    cache: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    locale: Locale,
}

impl YoYComparator {
    pub fn new(
        registry: Arc<DeviceRegistry>,
        store: Arc<JobStore>,
        cache: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
        locale: Locale,
    ) -> Self {
        Self {
            registry,
            store,
            cache,
            clock,
            locale,
        }
    }

    /// Resolves a possibly open range against today. With no bounds the
    /// window is the twelve months ending today; a single missing end is
    /// filled from the same window.
    pub fn resolve(&self, range: DateRange) -> Result<(NaiveDate, NaiveDate), AppError> {
        let today = self.clock.today();
        let (from, to) = match (range.from, range.to) {
            (Some(from), Some(to)) => (from, to),
            (Some(from), None) => (from, today),
            (None, Some(to)) => (default_window(to).0, to),
            (None, None) => default_window(today),
        };
        if from > to {
            return Err(AppError::Validation(format!(
                "from_date {from} is after to_date {to}"
            )));
        }
        Ok((from, to))
    }

    pub fn compare(&self, scope: &DeviceScope, range: DateRange) -> Result<YoYComparison, AppError> {
        let devices = self.registry.resolve(scope)?;
        let (from, to) = self.resolve(range)?;

        let current = self.period(&devices, from, to)?;
        let previous = self.period(&devices, one_year_back(from), one_year_back(to))?;

        let change_absolute = signed(current.total_impressions)? - signed(previous.total_impressions)?;
        let change_percent = if previous.total_impressions == 0 {
            0.0
        } else {
            round1(change_absolute as f64 / previous.total_impressions as f64 * 100.0)
        };

        Ok(YoYComparison {
            current_period: current,
            previous_period: previous,
            change_absolute,
            change_percent,
            trend: TrendDirection::from_change_percent(change_percent),
        })
    }

    /// Monthly totals for two calendar years, January first. Defaults to the
    /// current year and the one before it.
    pub fn trend(
        &self,
        scope: &DeviceScope,
        current_year: Option<i32>,
        previous_year: Option<i32>,
    ) -> Result<YoYTrend, AppError> {
        let devices = self.registry.resolve(scope)?;
        let current_year = current_year.unwrap_or_else(|| self.clock.today().year());
        let previous_year = previous_year.unwrap_or(current_year - 1);

        let (current, current_src) = self.monthly(&devices, current_year)?;
        let (previous, previous_src) = self.monthly(&devices, previous_year)?;

        let trend = month_labels(self.locale)
            .iter()
            .enumerate()
            .map(|(m, label)| MonthEntry {
                month: *label,
                current_year: current[m],
                previous_year: previous[m],
            })
            .collect();

        Ok(YoYTrend {
            current_year,
            previous_year,
            trend,
            source: combine(current_src, previous_src),
        })
    }

    fn period(&self, devices: &[String], from: NaiveDate, to: NaiveDate) -> Result<Period, AppError> {
        let mut total = 0u64;
        let mut source = Source::Cached;
        for device in devices {
            let lookup = read_through(self.cache.as_ref(), CacheKey::period(device, from, to), || {
                let filter = JobFilter::for_device(DeviceScope::Device(device.clone())).between(from, to);
                Ok::<_, AppError>(CachedValue::Total(self.store.totals(&filter).total_impressions))
            })?;
            source = combine(source, lookup.source());
            total = checked_sum(total, expect_total(lookup)?)?;
        }

        Ok(Period {
            from,
            to,
            year: from.year(),
            total_impressions: total,
            source: if devices.is_empty() { Source::Live } else { source },
        })
    }

    fn monthly(&self, devices: &[String], year: i32) -> Result<([u64; 12], Source), AppError> {
        let (from, to) = year_bounds(year)
            .ok_or_else(|| AppError::Validation(format!("year {year} is out of range")))?;

        let mut months = [0u64; 12];
        let mut source = Source::Cached;
        for device in devices {
            let lookup = read_through(self.cache.as_ref(), CacheKey::monthly(device, year), || {
                let filter = JobFilter::for_device(DeviceScope::Device(device.clone())).between(from, to);
                let mut per_month = [0u64; 12];
                self.store.scan(&filter, |job| {
                    let slot = &mut per_month[month_index(job.job_date)];
                    *slot = slot.saturating_add(job.total_impressions);
                });
                Ok::<_, AppError>(CachedValue::Monthly(per_month))
            })?;
            source = combine(source, lookup.source());
            for (sum, part) in months.iter_mut().zip(expect_monthly(lookup)?) {
                *sum = checked_sum(*sum, part)?;
            }
        }

        Ok((months, if devices.is_empty() { Source::Live } else { source }))
    }
}

fn combine(a: Source, b: Source) -> Source {
    match (a, b) {
        (Source::Cached, Source::Cached) => Source::Cached,
        _ => Source::Live,
    }
}

fn checked_sum(a: u64, b: u64) -> Result<u64, AppError> {
    a.checked_add(b)
        .ok_or_else(|| AppError::Aggregation("impression total overflows".to_string()))
}

fn signed(v: u64) -> Result<i64, AppError> {
    i64::try_from(v).map_err(|_| AppError::Aggregation(format!("impression total {v} out of range")))
}

fn expect_total(lookup: Lookup<CachedValue>) -> Result<u64, AppError> {
    match lookup.into_value() {
        CachedValue::Total(v) => Ok(v),
        other => Err(AppError::Aggregation(format!("period entry holds {other:?}"))),
    }
}

fn expect_monthly(lookup: Lookup<CachedValue>) -> Result<[u64; 12], AppError> {
    match lookup.into_value() {
        CachedValue::Monthly(v) => Ok(v),
        other => Err(AppError::Aggregation(format!("monthly entry holds {other:?}"))),
    }
}
