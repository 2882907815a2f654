//! Cache Module
//!
//! In-memory cache of fetched JSON with per-entry expiry timers, split into
//! independent namespaces.

mod entry;
mod namespace;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use namespace::Namespace;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Default lifetime of a cached entry in seconds (5 minutes)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
