use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::metrics;
use crate::model::Source;

use super::entry::CachedValue;
use super::key::CacheKey;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache lock not acquired within {0:?}")]
    Busy(Duration),
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentEntry {
    pub cache_key: String,
    pub cached_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheStatus {
    pub total_cached_entries: usize,
    pub cache_ttl_hours: u64,
    pub recent_entries: Vec<RecentEntry>,
}

/// CacheStore defines the interface for the response cache backend.
pub trait CacheStore: Send + Sync {
    /// Returns the value stored under `key` unless it is absent or expired.
    fn get(&self, key: &CacheKey) -> Result<Option<CachedValue>, CacheError>;

    /// Invalidation generation of the device. It moves forward on every
    /// `invalidate_device` of that device and on every `clear`.
    fn generation(&self, device_id: &str) -> u64;

    /// Stores `value` under `key`, stamped with the current time, unless the
    /// key's device was invalidated after `generation` was read. Returns
    /// whether the value was stored.
    fn put(&self, key: CacheKey, value: CachedValue, generation: u64) -> Result<bool, CacheError>;

    /// Live entries, most recent first.
    fn status(&self) -> CacheStatus;

    /// Drops every entry at once and returns how many were dropped.
    fn clear(&self) -> usize;

    /// Drops every entry that belongs to the device and moves its generation.
    fn invalidate_device(&self, device_id: &str) -> usize;

    /// Drops expired entries.
    fn sweep(&self) -> usize;
}

/// Outcome of a read-through lookup, tagged with where the value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Cached(T),
    Live(T),
}

impl<T> Lookup<T> {
    pub fn source(&self) -> Source {
        match self {
            Lookup::Cached(_) => Source::Cached,
            Lookup::Live(_) => Source::Live,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Lookup::Cached(v) | Lookup::Live(v) => v,
        }
    }
}

/// Serves `key` from the cache or computes and stores it.
///
/// A failing cache never fails the caller: the value is computed live and the
/// failure is logged. A value whose device was invalidated while it was being
/// computed is returned but not stored.
pub fn read_through<E>(
    cache: &dyn CacheStore,
    key: CacheKey,
    compute: impl FnOnce() -> Result<CachedValue, E>,
) -> Result<Lookup<CachedValue>, E> {
    match cache.get(&key) {
        Ok(Some(value)) => {
            metrics::add_hits(1);
            return Ok(Lookup::Cached(value));
        }
        Ok(None) => metrics::add_misses(1),
        Err(err) => {
            metrics::add_cache_errors(1);
            warn!(
                component = "cache",
                event = "read_failed",
                key = %key,
                error = %err,
                "cache read failed, computing live"
            );
        }
    }

    let generation = cache.generation(key.device());
    let value = compute()?;
    let key_repr = key.as_str().to_string();
    match cache.put(key, value.clone(), generation) {
        Ok(true) => {}
        Ok(false) => debug!(
            component = "cache",
            event = "stale_write_dropped",
            key = %key_repr,
            "device invalidated during compute, value not stored"
        ),
        Err(err) => {
            metrics::add_cache_errors(1);
            warn!(
                component = "cache",
                event = "write_failed",
                key = %key_repr,
                error = %err,
                "cache write failed"
            );
        }
    }
    Ok(Lookup::Live(value))
}
