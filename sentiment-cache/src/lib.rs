//! Memory-bounded TTL cache for encoded sentiment results.
//!
//! Maps normalized keys to opaque byte blobs. Entries expire after a fixed
//! TTL and are evicted least-recently-used first once a shard's share of the
//! memory ceiling is reached.

mod cache;

pub use cache::{CacheConfig, CacheStats, ResultCache};
