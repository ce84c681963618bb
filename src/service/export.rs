//! CSV rendering of job-level click data.

use std::sync::Arc;

use crate::model::{Job, JobFilter};

use super::jobs::JobStore;

pub const CSV_HEADER: [&str; 8] = [
    "Marker",
    "Press ID",
    "Job Name",
    "Status",
    "Click Category",
    "Total Impressions",
    "Sheets",
    "Job Date",
];

/// CsvExporter writes one row per job selected by the filter, so summing the
/// impression column per category reproduces the click report.
pub struct CsvExporter {
    store: Arc<JobStore>,
}

impl CsvExporter {
    pub fn new(store: Arc<JobStore>) -> Self {
        Self { store }
    }

    pub fn export(&self, filter: &JobFilter) -> String {
        let jobs = self.store.select(filter);
        let mut out = String::with_capacity(64 * (jobs.len() + 1));
        push_row(&mut out, CSV_HEADER.iter().copied());
        for job in &jobs {
            push_job(&mut out, job);
        }
        out
    }
}

fn push_job(out: &mut String, job: &Job) {
    let marker = job.marker.to_string();
    let impressions = job.total_impressions.to_string();
    let sheets = job.sheets.to_string();
    let date = job.job_date.to_string();
    push_row(
        out,
        [
            marker.as_str(),
            job.press_id.as_str(),
            job.job_name.as_str(),
            job.status.as_str(),
            job.click_category.label(),
            impressions.as_str(),
            sheets.as_str(),
            date.as_str(),
        ],
    );
}

fn push_row<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_field(out, field);
    }
    out.push_str("\r\n");
}

/// Quotes a field when it holds a separator, quote or line break.
fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\r', '\n']) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}
