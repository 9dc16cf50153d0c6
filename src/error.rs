//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key is the empty string
    #[error("Empty key")]
    EmptyKey,

    /// Storing the entry would push tracked bytes past the configured limit
    #[error("Reach the memory limit size: {required} bytes required, limit is {limit} bytes")]
    MemoryLimit {
        /// Tracked bytes the store would hold after the write
        required: u64,
        /// Configured capacity in bytes
        limit: u64,
    },

    /// Capacity string could not be parsed
    #[error("Invalid capacity: {0}")]
    InvalidCapacity(String),
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
