//! Feed wire format.
//!
//! The document is `{ "states": [ tuple, ... ] }` where each tuple is
//! positional:
//!
//! | idx | field          | type            |
//! |-----|----------------|-----------------|
//! | 0   | icao           | string          |
//! | 1   | callsign       | string \| null  |
//! | 2   | origin country | string          |
//! | 3   | time position  | number \| null  |
//! | 4   | last contact   | number          |
//! | 5   | longitude      | number \| null  |
//! | 6   | latitude       | number \| null  |
//! | 7   | altitude       | number \| null  |
//! | 8   | on ground      | bool            |
//! | 9   | velocity       | number \| null  |
//! | 10  | true track     | number \| null  |
//!
//! Longitude precedes latitude. The live upstream appends further columns
//! (17 or 18 in total); those are accepted and ignored.

use scene::FlightRecord;
use serde_json::Value;
use tracing::debug;

use crate::errors::{FeedError, Result, TupleError};

pub const STATE_TUPLE_ARITY: usize = 11;
const EXTENDED_ARITIES: [usize; 2] = [17, 18];

/// Records decoded from one feed document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedFeed {
    pub records: Vec<FlightRecord>,
    /// Tuples that failed validation and were skipped.
    pub rejected: usize,
}

/// Decode a feed document.
///
/// A body that is not JSON, or has no `states` key, fails as a whole. A
/// `"states": null` document (no aircraft in range) decodes to no records.
/// Individual malformed tuples are skipped and counted.
pub fn decode_feed(body: &[u8]) -> Result<DecodedFeed> {
    let doc: Value = serde_json::from_slice(body)?;
    let states: &[Value] = match doc.get("states") {
        Some(Value::Array(states)) => states,
        Some(Value::Null) => &[],
        _ => return Err(FeedError::MissingStates),
    };

    let mut out = DecodedFeed::default();
    for (i, state) in states.iter().enumerate() {
        match decode_state(state) {
            Ok(rec) => out.records.push(rec),
            Err(err) => {
                debug!(index = i, %err, "skipping malformed state");
                out.rejected += 1;
            }
        }
    }
    Ok(out)
}

/// Decode one positional state tuple into a validated record.
pub fn decode_state(state: &Value) -> std::result::Result<FlightRecord, TupleError> {
    let Value::Array(fields) = state else {
        return Err(TupleError::NotAnArray);
    };
    let arity = fields.len();
    if arity != STATE_TUPLE_ARITY && !EXTENDED_ARITIES.contains(&arity) {
        return Err(TupleError::Arity(arity));
    }

    Ok(FlightRecord {
        icao: string(fields, 0, "icao")?,
        callsign: opt_string(fields, 1, "callsign")?
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
        origin_country: string(fields, 2, "origin_country")?,
        time_position: opt_number(fields, 3, "time_position")?,
        last_contact: number(fields, 4, "last_contact")?,
        longitude: opt_number(fields, 5, "longitude")?,
        latitude: opt_number(fields, 6, "latitude")?,
        altitude: opt_number(fields, 7, "altitude")?,
        on_ground: boolean(fields, 8, "on_ground")?,
        velocity: opt_number(fields, 9, "velocity")?,
        true_track: opt_number(fields, 10, "true_track")?,
    })
}

fn string(
    fields: &[Value],
    index: usize,
    name: &'static str,
) -> std::result::Result<String, TupleError> {
    opt_string(fields, index, name)?.ok_or(TupleError::Field { index, name })
}

fn opt_string(
    fields: &[Value],
    index: usize,
    name: &'static str,
) -> std::result::Result<Option<String>, TupleError> {
    match &fields[index] {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(TupleError::Field { index, name }),
    }
}

fn number(
    fields: &[Value],
    index: usize,
    name: &'static str,
) -> std::result::Result<f64, TupleError> {
    opt_number(fields, index, name)?.ok_or(TupleError::Field { index, name })
}

fn opt_number(
    fields: &[Value],
    index: usize,
    name: &'static str,
) -> std::result::Result<Option<f64>, TupleError> {
    match &fields[index] {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_f64().map(Some).ok_or(TupleError::Field { index, name }),
        _ => Err(TupleError::Field { index, name }),
    }
}

fn boolean(
    fields: &[Value],
    index: usize,
    name: &'static str,
) -> std::result::Result<bool, TupleError> {
    match &fields[index] {
        Value::Bool(b) => Ok(*b),
        _ => Err(TupleError::Field { index, name }),
    }
}
