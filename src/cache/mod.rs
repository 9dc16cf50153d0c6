//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and approximate memory
//! accounting.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use stats::CacheStats;
pub use store::CacheStore;
