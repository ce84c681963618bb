//! TTL response cache for year-over-year figures.

pub mod entry;
pub mod key;
pub mod memory;
pub mod store;
pub mod sweeper;

#[cfg(test)]
mod cache_test;

// Re-export main types
pub use entry::{CacheEntry, CachedValue};
pub use key::CacheKey;
pub use memory::ResponseCache;
pub use store::{read_through, CacheError, CacheStatus, CacheStore, Lookup, RecentEntry};
pub use sweeper::Sweeper;
