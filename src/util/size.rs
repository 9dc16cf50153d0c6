//! Size Estimation
//!
//! Approximates the footprint of a value by the length of its JSON encoding.

use serde::Serialize;

// == Estimated Size ==
/// Returns the length in bytes of `value` serialized with `serde_json`.
///
/// This is a stable approximation, not a live memory measurement: a string
/// is counted with its surrounding quotes (`"abcd"` is 6 bytes) and a struct
/// includes its field names. Values `serde_json` refuses to encode (for
/// example a map with non-string keys) count as 0.
pub fn estimated_size<V: Serialize + ?Sized>(value: &V) -> usize {
    serde_json::to_vec(value).map(|bytes| bytes.len()).unwrap_or(0)
}
