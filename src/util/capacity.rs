//! Capacity Parsing
//!
//! Converts human-readable byte quantities such as `"10MB"` into byte counts.

use crate::error::{CacheError, Result};

// == Binary Multipliers ==
pub const BYTE: u64 = 1;
pub const KILOBYTE: u64 = BYTE << 10;
pub const MEGABYTE: u64 = KILOBYTE << 10;
pub const GIGABYTE: u64 = MEGABYTE << 10;
pub const TERABYTE: u64 = GIGABYTE << 10;
pub const PETABYTE: u64 = TERABYTE << 10;
pub const EXABYTE: u64 = PETABYTE << 10;

const INVALID_QUANTITY: &str =
    "byte quantity must be a positive number with a unit of measurement like KB, MB or GB";

// == Parse Capacity ==
/// Parses a byte quantity with a unit suffix into a byte count.
///
/// Surrounding whitespace is ignored and units are case-insensitive. The
/// numeric prefix may be fractional (`"1.5KB"` is 1536) but must be present
/// and non-negative. Accepted units are `B`, `K`/`KB`/`KIB`, `M`/`MB`/`MIB`,
/// `G`/`GB`/`GIB`, `T`/`TB`/`TIB`, `P`/`PB`/`PIB` and `E`/`EB`/`EIB`, all
/// 1024-based. Results past `u64::MAX` saturate.
///
/// # Errors
/// Returns `CacheError::InvalidCapacity` when the unit is missing or unknown,
/// or the prefix is not a non-negative number.
pub fn parse_capacity(input: &str) -> Result<u64> {
    let normalized = input.trim().to_uppercase();

    let split = normalized
        .find(|c: char| c.is_alphabetic())
        .ok_or_else(|| invalid(input))?;
    let (number, unit) = normalized.split_at(split);

    let quantity: f64 = number.parse().map_err(|_| invalid(input))?;
    if quantity < 0.0 {
        return Err(invalid(input));
    }

    let multiplier = match unit {
        "E" | "EB" | "EIB" => EXABYTE,
        "P" | "PB" | "PIB" => PETABYTE,
        "T" | "TB" | "TIB" => TERABYTE,
        "G" | "GB" | "GIB" => GIGABYTE,
        "M" | "MB" | "MIB" => MEGABYTE,
        "K" | "KB" | "KIB" => KILOBYTE,
        "B" => BYTE,
        _ => return Err(invalid(input)),
    };

    // float-to-int casts saturate
    Ok((quantity * multiplier as f64) as u64)
}

fn invalid(input: &str) -> CacheError {
    CacheError::InvalidCapacity(format!("{:?}: {}", input, INVALID_QUANTITY))
}
