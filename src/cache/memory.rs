//! In-memory response cache.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{Config, ConfigTrait};
use crate::metrics;
use crate::shared::time::Clock;

use super::entry::{CacheEntry, CachedValue};
use super::key::CacheKey;
use super::store::{CacheError, CacheStatus, CacheStore, RecentEntry};

/// Lock wait after which a lookup gives up and the caller computes live.
const LOCK_TIMEOUT: Duration = Duration::from_millis(250);

#[derive(Default)]
struct State {
    entries: HashMap<u64, CacheEntry>,
    /// Invalidations per device.
    generations: HashMap<String, u64>,
    /// Number of `clear` calls, added to every device generation.
    epoch: u64,
}

impl State {
    fn generation(&self, device_id: &str) -> u64 {
        self.epoch
            .wrapping_add(self.generations.get(device_id).copied().unwrap_or(0))
    }
}

/// ResponseCache keeps computed figures in a single map so that `clear`
/// swaps everything out under one write lock. Generations live under the
/// same lock so a stale write can never slip in between an invalidation and
/// its removal.
pub struct ResponseCache {
    state: RwLock<State>,
    enabled: bool,
    ttl: Duration,
    preview_len: usize,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    pub fn new(cfg: &Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(State::default()),
            enabled: cfg.cache_enabled(),
            ttl: cfg.cache_ttl(),
            preview_len: cfg.cache_preview_len(),
            clock,
        }
    }

    fn ttl_hours(&self) -> u64 {
        self.ttl.as_secs() / 3600
    }

    fn drop_expired(&self, hash: u64) {
        let now = self.clock.now();
        let mut state = self.state.write();
        let expired = state
            .entries
            .get(&hash)
            .is_some_and(|e| e.is_expired(now, self.ttl));
        if expired {
            state.entries.remove(&hash);
            metrics::add_evicted(1);
            metrics::set_cache_entries(state.entries.len());
        }
    }
}

impl CacheStore for ResponseCache {
    fn get(&self, key: &CacheKey) -> Result<Option<CachedValue>, CacheError> {
        if !self.enabled {
            return Ok(None);
        }

        let now = self.clock.now();
        {
            let state = self
                .state
                .try_read_for(LOCK_TIMEOUT)
                .ok_or(CacheError::Busy(LOCK_TIMEOUT))?;
            match state.entries.get(&key.hash()) {
                Some(entry) if entry.key == *key => {
                    if !entry.is_expired(now, self.ttl) {
                        return Ok(Some(entry.value.clone()));
                    }
                }
                _ => return Ok(None),
            }
        }

        self.drop_expired(key.hash());
        Ok(None)
    }

    fn generation(&self, device_id: &str) -> u64 {
        if !self.enabled {
            return 0;
        }
        self.state.read().generation(device_id)
    }

    fn put(&self, key: CacheKey, value: CachedValue, generation: u64) -> Result<bool, CacheError> {
        if !self.enabled {
            return Ok(false);
        }

        let mut state = self
            .state
            .try_write_for(LOCK_TIMEOUT)
            .ok_or(CacheError::Busy(LOCK_TIMEOUT))?;
        if state.generation(key.device()) != generation {
            return Ok(false);
        }

        let entry = CacheEntry {
            cached_at: self.clock.now(),
            key,
            value,
        };
        state.entries.insert(entry.key.hash(), entry);
        metrics::set_cache_entries(state.entries.len());
        Ok(true)
    }

    fn status(&self) -> CacheStatus {
        let now = self.clock.now();
        let state = self.state.read();

        let mut live: Vec<&CacheEntry> = state
            .entries
            .values()
            .filter(|e| !e.is_expired(now, self.ttl))
            .collect();
        live.sort_by(|a, b| {
            b.cached_at
                .cmp(&a.cached_at)
                .then_with(|| a.key.as_str().cmp(b.key.as_str()))
        });

        CacheStatus {
            total_cached_entries: live.len(),
            cache_ttl_hours: self.ttl_hours(),
            recent_entries: live
                .into_iter()
                .take(self.preview_len)
                .map(|e| RecentEntry {
                    cache_key: e.key.to_string(),
                    cached_at: e.cached_at,
                })
                .collect(),
        }
    }

    fn clear(&self) -> usize {
        let dropped = {
            let mut state = self.state.write();
            state.epoch = state.epoch.wrapping_add(1);
            std::mem::take(&mut state.entries).len()
        };
        metrics::set_cache_entries(0);
        info!(
            component = "cache",
            event = "cleared",
            dropped = dropped,
            "response cache cleared"
        );
        dropped
    }

    fn invalidate_device(&self, device_id: &str) -> usize {
        let mut state = self.state.write();
        let bumped = state.generations.entry(device_id.to_string()).or_insert(0);
        *bumped = bumped.wrapping_add(1);

        let before = state.entries.len();
        state.entries.retain(|_, e| e.key.device() != device_id);
        let removed = before - state.entries.len();
        metrics::set_cache_entries(state.entries.len());
        if removed > 0 {
            metrics::add_evicted(removed as u64);
            debug!(
                component = "cache",
                event = "invalidated",
                device_id = device_id,
                removed = removed,
                "device entries invalidated"
            );
        }
        removed
    }

    fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut state = self.state.write();
        let before = state.entries.len();
        state.entries.retain(|_, e| !e.is_expired(now, self.ttl));
        let removed = before - state.entries.len();
        metrics::set_cache_entries(state.entries.len());
        if removed > 0 {
            metrics::add_evicted(removed as u64);
        }
        removed
    }
}
