//! Device data source: the trait the services pull jobs and press state
//! through, its deadline wrapper and the seeded fixture feed.

pub mod fixture;
pub mod upstream;


// Re-export main types
pub use fixture::FixtureSource;
pub use upstream::{DeviceSource, SourceError, TimeoutSource};
