//! Bounded in-memory history of sync and import runs.

use parking_lot::Mutex;
use std::collections::VecDeque;

/// Entries kept per log; older ones fall off.
pub const LOG_CAPACITY: usize = 100;
pub const DEFAULT_LOG_LIMIT: usize = 10;

/// LogRing keeps the latest `capacity` entries.
pub struct LogRing<T> {
    entries: Mutex<VecDeque<T>>,
    capacity: usize,
}

impl<T: Clone> LogRing<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn push(&self, entry: T) {
        let mut entries = self.entries.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Up to `limit` entries, newest first.
    pub fn recent(&self, limit: usize) -> Vec<T> {
        self.entries.lock().iter().rev().take(limit).cloned().collect()
    }
}

impl<T: Clone> Default for LogRing<T> {
    fn default() -> Self {
        Self::new(LOG_CAPACITY)
    }
}
