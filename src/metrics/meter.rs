// Metric name constants
pub const HITS: &str = "cache_hits";
pub const MISSES: &str = "cache_misses";
pub const CACHE_ERRORS: &str = "cache_errors";
pub const CACHE_EVICTED: &str = "cache_evicted";
pub const CACHE_ENTRIES: &str = "cache_entries";

pub const JOBS_SYNCED: &str = "jobs_synced";
pub const UPSTREAM_TIMEOUTS: &str = "upstream_timeouts";
pub const PANICKED: &str = "http_panics";

/// Adds cache hits.
pub fn add_hits(value: u64) {
    metrics::counter!(HITS).increment(value);
}

/// Adds cache misses.
pub fn add_misses(value: u64) {
    metrics::counter!(MISSES).increment(value);
}

/// Adds failed cache reads or writes.
pub fn add_cache_errors(value: u64) {
    metrics::counter!(CACHE_ERRORS).increment(value);
}

/// Adds entries dropped because they expired or were invalidated.
pub fn add_evicted(value: u64) {
    metrics::counter!(CACHE_EVICTED).increment(value);
}

/// Sets the number of stored cache entries.
pub fn set_cache_entries(len: usize) {
    metrics::gauge!(CACHE_ENTRIES).set(len as f64);
}

/// Adds jobs newly stored by a sync.
pub fn add_jobs_synced(value: u64) {
    metrics::counter!(JOBS_SYNCED).increment(value);
}

/// Adds data source calls that ran past their deadline.
pub fn add_upstream_timeouts(value: u64) {
    metrics::counter!(UPSTREAM_TIMEOUTS).increment(value);
}

/// Adds panics.
pub fn add_panics(value: u64) {
    metrics::counter!(PANICKED).increment(value);
}
