use chrono::{DateTime, Utc};
use std::time::Duration;

use super::key::CacheKey;

/// Payload of a cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedValue {
    Total(u64),
    Monthly([u64; 12]),
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub cached_at: DateTime<Utc>,
    pub value: CachedValue,
}

impl CacheEntry {
    /// An entry expires once its age reaches the ttl. Entries stamped in the
    /// future (clock moved back) count as fresh.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match (now - self.cached_at).to_std() {
            Ok(age) => age >= ttl,
            Err(_) => false,
        }
    }
}
