//! Background Tasks Module
//!
//! Contains background tasks that run alongside a cache store.
//!
//! # Tasks
//! - Reclaimer: Removes expired cache entries at a fixed interval

mod reclaim;

pub use reclaim::{spawn_reclaimer, ReclaimerHandle, MIN_RECLAIM_INTERVAL};
