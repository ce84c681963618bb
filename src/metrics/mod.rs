//! Prometheus metrics functionality.
//
//! Metrics organization:
//! - Response cache: hits, misses, errors, evictions and entry count
//! - Job sync: jobs absorbed from the data source
//! - Failures: data source timeouts and recovered handler panics

pub mod meter;

// Re-export commonly used items
pub use meter::*;
