//! Seeded in-process data source standing in for the press fleet.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use xxhash_rust::xxh3::xxh3_64;

use crate::config;
use crate::model::{ClickCategory, DailyHealth, Job, JobStatus, PressSnapshot, PressState};

use super::upstream::{DeviceSource, SourceError};

const JOB_NAMES: [&str; 8] = [
    "Flyer A5",
    "Broschüre",
    "Visitenkarten",
    "Katalog, Herbst",
    "Etiketten",
    "Poster A2",
    "Mailing",
    "Speisekarte",
];

struct FixtureDevice {
    state: PressState,
    jobs: Vec<Job>,
    next_marker: u64,
    rng: StdRng,
}

impl FixtureDevice {
    fn push(&mut self, press_id: &str, date: NaiveDate) {
        let marker = self.next_marker;
        self.next_marker += self.rng.gen_range(1..=3);
        let job = generate(&mut self.rng, press_id, marker, date);
        self.jobs.push(job);
    }
}

/// Minutes a press is scheduled on a weekday; Saturdays run half a shift.
const WEEKDAY_MINUTES: u32 = 960;

/// FixtureSource serves a deterministic job history per device: the same
/// seed, device list and date always yield the same jobs and health records.
pub struct FixtureSource {
    devices: RwLock<HashMap<String, FixtureDevice>>,
    seed: u64,
    start: NaiveDate,
    today: NaiveDate,
}

impl FixtureSource {
    /// Generates `jobs_per_device` jobs per device, spread from January 1st of
    /// the previous year up to `today`.
    pub fn new(devices: &[config::Device], jobs_per_device: usize, seed: u64, today: NaiveDate) -> Self {
        let start = NaiveDate::from_ymd_opt(today.year() - 1, 1, 1).unwrap_or(today);
        let span = (today - start).num_days().max(0);

        let mut map = HashMap::with_capacity(devices.len());
        for (idx, device) in devices.iter().enumerate() {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(xxh3_64(device.id.as_bytes())));
            let mut offsets: Vec<i64> = (0..jobs_per_device)
                .map(|_| rng.gen_range(0..=span))
                .collect();
            offsets.sort_unstable();

            let mut fixture = FixtureDevice {
                state: initial_state(idx),
                jobs: Vec::with_capacity(jobs_per_device),
                next_marker: 1,
                rng,
            };
            for offset in offsets {
                fixture.push(&device.id, start + Duration::days(offset));
            }
            map.insert(device.id.clone(), fixture);
        }

        Self {
            devices: RwLock::new(map),
            seed,
            start,
            today,
        }
    }

    /// Appends `count` freshly generated jobs dated `date` to a device's feed.
    /// Returns false when the device is unknown.
    pub fn append(&self, device_id: &str, count: usize, date: NaiveDate) -> bool {
        let mut devices = self.devices.write();
        let Some(fixture) = devices.get_mut(device_id) else {
            return false;
        };
        for _ in 0..count {
            fixture.push(device_id, date);
        }
        true
    }

    pub fn set_state(&self, device_id: &str, state: PressState) -> bool {
        match self.devices.write().get_mut(device_id) {
            Some(fixture) => {
                fixture.state = state;
                true
            }
            None => false,
        }
    }
}

#[async_trait::async_trait]
impl DeviceSource for FixtureSource {
    async fn fetch_jobs(
        &self,
        device_id: &str,
        after_marker: Option<u64>,
        limit: usize,
    ) -> Result<Vec<Job>, SourceError> {
        let devices = self.devices.read();
        let fixture = devices
            .get(device_id)
            .ok_or_else(|| SourceError::UnknownDevice(device_id.to_string()))?;

        let start = match after_marker {
            Some(marker) => fixture.jobs.partition_point(|j| j.marker <= marker),
            None => 0,
        };
        Ok(fixture.jobs[start..].iter().take(limit).cloned().collect())
    }

    async fn press_snapshot(&self, device_id: &str) -> Result<PressSnapshot, SourceError> {
        let devices = self.devices.read();
        let fixture = devices
            .get(device_id)
            .ok_or_else(|| SourceError::UnknownDevice(device_id.to_string()))?;

        let current_job_name = match fixture.state {
            PressState::Printing => fixture.jobs.last().map(|j| j.job_name.clone()),
            _ => None,
        };
        Ok(PressSnapshot {
            state: fixture.state,
            current_job_name,
        })
    }

    async fn fetch_health(
        &self,
        device_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyHealth>, SourceError> {
        if !self.devices.read().contains_key(device_id) {
            return Err(SourceError::UnknownDevice(device_id.to_string()));
        }

        // the press only reports for days it has been running
        let from = from.max(self.start);
        let to = to.min(self.today);
        Ok(from
            .iter_days()
            .take_while(|d| *d <= to)
            .filter_map(|d| health(self.seed, device_id, d))
            .collect())
    }
}

/// Health record of one day, derived from the seed, device and date alone.
fn health(seed: u64, device_id: &str, date: NaiveDate) -> Option<DailyHealth> {
    let scheduled_minutes = match date.weekday() {
        Weekday::Sun => return None,
        Weekday::Sat => WEEKDAY_MINUTES / 2,
        _ => WEEKDAY_MINUTES,
    };
    let mut rng = StdRng::seed_from_u64(
        seed.wrapping_add(xxh3_64(format!("{device_id}:{date}").as_bytes())),
    );
    let downtime = rng.gen_range(0..=scheduled_minutes / 5);

    Some(DailyHealth {
        date,
        scheduled_minutes,
        available_minutes: scheduled_minutes - downtime,
        failures: rng.gen_range(0..=6),
        paper_jams: rng.gen_range(0..=4),
        restarts: rng.gen_range(0..=2),
    })
}

fn initial_state(idx: usize) -> PressState {
    match idx % 3 {
        1 => PressState::Printing,
        _ => PressState::Ready,
    }
}

fn generate(rng: &mut StdRng, press_id: &str, marker: u64, date: NaiveDate) -> Job {
    let click_category = match rng.gen_range(0..100) {
        0..=34 => ClickCategory::OneColor,
        35..=54 => ClickCategory::TwoColors,
        55..=69 => ClickCategory::Epm,
        _ => ClickCategory::Multicolor,
    };
    let status = match rng.gen_range(0..100) {
        0..=84 => JobStatus::Printed,
        85..=96 => JobStatus::Aborted,
        _ => JobStatus::Queued,
    };

    let planned: u64 = rng.gen_range(10..=2_500);
    let sides: u64 = if rng.gen_bool(0.6) { 2 } else { 1 };
    let (sheets, total_impressions) = match status {
        JobStatus::Printed | JobStatus::Printing => (planned, planned * sides),
        JobStatus::Aborted => {
            let done = planned / rng.gen_range(2..=5);
            (done, done * sides)
        }
        JobStatus::Queued => (0, 0),
    };
    let name = JOB_NAMES[rng.gen_range(0..JOB_NAMES.len())];

    Job {
        marker,
        press_id: press_id.to_string(),
        job_name: format!("{name} #{marker}"),
        status,
        total_impressions,
        sheets,
        click_category,
        job_date: date,
    }
}
