//! Record collections to and from JSON text.
//!
//! Decimal values become JSON numbers here, which means a conversion to `f64`.
//! That step is lossy beyond double precision and is accepted at the wire edge
//! only; records stay exact in memory until they are serialized.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::{KepError, Record};

const SNAPSHOT_INDENT: &[u8] = b"    ";

/// Compact JSON array, as sent in request bodies.
///
/// # Errors
/// Returns `Serialization` if a value has no `f64` representation.
pub fn to_json(records: &[Record]) -> Result<String, KepError> {
    Ok(serde_json::to_string(records)?)
}

/// Indented JSON array for file snapshots.
///
/// Four-space indentation, one field per line, `": "` between keys and
/// values, so two snapshots diff line by line.
///
/// # Errors
/// Returns `Serialization` if a value has no `f64` representation.
pub fn to_json_pretty(records: &[Record]) -> Result<String, KepError> {
    let mut buf = Vec::with_capacity(records.len() * 96);
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(SNAPSHOT_INDENT));
    records.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| KepError::Serialization(e.to_string()))
}

/// Parse a JSON array of records.
///
/// Numbers are read back through their shortest decimal form, so a value
/// written as `1.2300` comes back as `1.23`.
///
/// # Errors
/// Returns `Serialization` on malformed JSON or an unknown frequency code.
pub fn from_json(text: &str) -> Result<Vec<Record>, KepError> {
    Ok(serde_json::from_str(text)?)
}
