//! JSON serialization of sweep results.
//!
//! The strings are meant for the external plotting layer; nothing is
//! written to disk here.

use serde::Serialize;

/// Serialize a result (`AggregateStats`, `SweepSeries`, `LoadSeries`, ...) to compact JSON.
///
/// # Errors
///
/// Returns an error if serialization fails. Non-finite floats are emitted as
/// `null` by serde_json, so this does not happen for the crate's own types.
pub fn to_json<T: Serialize + ?Sized>(result: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(result)
}

/// Serialize a result to pretty-printed JSON.
///
/// # Errors
///
/// See [`to_json`].
pub fn to_json_pretty<T: Serialize + ?Sized>(result: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}
