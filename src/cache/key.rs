use chrono::NaiveDate;
use std::fmt;
use xxhash_rust::xxh3::xxh3_64;

/// Deterministic identity of a cached figure: one operation, one device,
/// one resolved date range or year.
///
/// The readable form doubles as the collision check; the map is indexed by
/// its xxh3 hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    hash: u64,
    device: String,
    repr: String,
}

impl CacheKey {
    /// Impression total of a device over an inclusive date range.
    pub fn period(device: &str, from: NaiveDate, to: NaiveDate) -> Self {
        Self::build(device, format!("yoy:period:{device}:{from}:{to}"))
    }

    /// Twelve monthly impression totals of a device for one year.
    pub fn monthly(device: &str, year: i32) -> Self {
        Self::build(device, format!("yoy:monthly:{device}:{year}"))
    }

    fn build(device: &str, repr: String) -> Self {
        Self {
            hash: xxh3_64(repr.as_bytes()),
            device: device.to_string(),
            repr,
        }
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn as_str(&self) -> &str {
        &self.repr
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr)
    }
}
