//! Utility Module
//!
//! Pure helpers consumed by the cache store: capacity string parsing and
//! serialized size estimation.

mod capacity;
mod size;

pub use capacity::{
    parse_capacity, BYTE, EXABYTE, GIGABYTE, KILOBYTE, MEGABYTE, PETABYTE, TERABYTE,
};
pub use size::estimated_size;
