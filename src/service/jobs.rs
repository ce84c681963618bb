//! In-memory job store indexed by device and marker.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::model::{Job, JobFilter, JobStatus};

pub const DEFAULT_LIMIT: usize = 50;
pub const MAX_LIMIT: usize = 1000;

#[derive(Default)]
struct DeviceJobs {
    jobs: BTreeMap<u64, Job>,
    last_sync: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobPage {
    pub jobs: Vec<Job>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub pages: usize,
}

/// Counters summed over a set of jobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobTotals {
    pub total_jobs: u64,
    pub printed_jobs: u64,
    pub aborted_jobs: u64,
    pub total_impressions: u64,
    pub total_sheets: u64,
}

impl JobTotals {
    pub fn add(&mut self, job: &Job) {
        self.total_jobs += 1;
        self.total_impressions = self.total_impressions.saturating_add(job.total_impressions);
        self.total_sheets = self.total_sheets.saturating_add(job.sheets);
        match job.status {
            JobStatus::Printed => self.printed_jobs += 1,
            JobStatus::Aborted => self.aborted_jobs += 1,
            JobStatus::Printing | JobStatus::Queued => {}
        }
    }
}

/// JobStore holds every ingested job. A job is identified by its
/// `(press_id, marker)` pair and is never stored twice.
#[derive(Default)]
pub struct JobStore {
    devices: RwLock<HashMap<String, DeviceJobs>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the jobs not yet known and returns how many were new.
    pub fn insert_many(&self, jobs: impl IntoIterator<Item = Job>) -> usize {
        let mut devices = self.devices.write();
        let mut inserted = 0;
        for job in jobs {
            let slot = devices.entry(job.press_id.clone()).or_default();
            if let std::collections::btree_map::Entry::Vacant(e) = slot.jobs.entry(job.marker) {
                e.insert(job);
                inserted += 1;
            }
        }
        inserted
    }

    /// Highest marker stored for the device.
    pub fn last_marker(&self, device_id: &str) -> Option<u64> {
        self.devices
            .read()
            .get(device_id)
            .and_then(|d| d.jobs.keys().next_back().copied())
    }

    pub fn last_sync(&self, device_id: &str) -> Option<DateTime<Utc>> {
        self.devices.read().get(device_id).and_then(|d| d.last_sync)
    }

    pub fn mark_synced(&self, device_id: &str, at: DateTime<Utc>) {
        self.devices
            .write()
            .entry(device_id.to_string())
            .or_default()
            .last_sync = Some(at);
    }

    /// Visits every job matching the filter, in no particular order.
    pub fn scan(&self, filter: &JobFilter, mut visit: impl FnMut(&Job)) {
        let devices = self.devices.read();
        for (press_id, device) in devices.iter() {
            if !filter.device.matches(press_id) {
                continue;
            }
            device
                .jobs
                .values()
                .filter(|j| filter.matches(j))
                .for_each(&mut visit);
        }
    }

    pub fn totals(&self, filter: &JobFilter) -> JobTotals {
        let mut totals = JobTotals::default();
        self.scan(filter, |job| totals.add(job));
        totals
    }

    /// Matching jobs, newest first (job date, then marker).
    pub fn select(&self, filter: &JobFilter) -> Vec<Job> {
        let mut jobs = Vec::new();
        self.scan(filter, |job| jobs.push(job.clone()));
        jobs.sort_by(|a, b| {
            b.job_date
                .cmp(&a.job_date)
                .then_with(|| b.marker.cmp(&a.marker))
                .then_with(|| a.press_id.cmp(&b.press_id))
        });
        jobs
    }

    /// One page of matching jobs. `page` is 1-based; a page past the end is
    /// empty but still reports the full total.
    pub fn list(&self, filter: &JobFilter, page: usize, limit: usize) -> JobPage {
        let page = page.max(1);
        let limit = limit.clamp(1, MAX_LIMIT);

        let all = self.select(filter);
        let total = all.len();
        let pages = total.div_ceil(limit);
        let jobs = all
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .collect();

        JobPage {
            jobs,
            total,
            page,
            limit,
            pages,
        }
    }
}
