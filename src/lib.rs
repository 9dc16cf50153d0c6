//! Simple Cache - An embeddable in-memory key-value cache
//!
//! Stores values under string keys with per-entry TTL expiration and a soft
//! memory budget, and sweeps expired entries from a background task.
//!
//! ```ignore
//! let (cache, reclaimer) = CacheStore::<String>::new(Duration::from_secs(1));
//! cache.set_max_memory("10MB");
//! cache.set("greeting", "hello".to_string(), Duration::from_secs(30))?;
//! assert_eq!(cache.get("greeting").as_deref(), Some("hello"));
//! reclaimer.stop().await;
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;
pub mod util;

pub use cache::{CacheStats, CacheStore};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::{spawn_reclaimer, ReclaimerHandle};
