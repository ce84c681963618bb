//! End-to-end tests for the dashboard API.
//!
//! Every test starts its own server on an ephemeral port and drives it
//! over HTTP with reqwest.

mod cases_devices_test;
mod cases_jobs_test;
mod cases_stats_test;

pub mod support;
