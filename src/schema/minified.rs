//! Expansion of Composer's minified version arrays
//!
//! Composer v2 metadata (`/p2/vendor/name.json`) stores the versions of a
//! package as a delta-encoded array: the first element carries every field,
//! each following element only carries the fields that differ from the
//! previous one. A field holding [`UNSET_MARKER`] is removed instead.

use serde_json::{Map, Value};

/// Reserved value deleting an inherited field
pub const UNSET_MARKER: &str = "__unset";

/// A fully expanded version record, free of unset markers
pub type DecodedRecord = Map<String, Value>;

/// Operation a single minified field applies to the running state
#[derive(Debug, Clone, Copy, PartialEq)]
enum FieldOp<'a> {
    Set(&'a Value),
    Unset,
}

impl<'a> FieldOp<'a> {
    fn from_value(value: &'a Value) -> Self {
        match value {
            Value::String(s) if s == UNSET_MARKER => FieldOp::Unset,
            _ => FieldOp::Set(value),
        }
    }
}

/// Expand a minified array into one record per element
///
/// Non-array input yields no records, and elements that are not objects are
/// skipped without emitting anything.
pub fn expand_minified(value: &Value) -> Vec<DecodedRecord> {
    let Some(entries) = value.as_array() else {
        return Vec::new();
    };

    let mut state = DecodedRecord::new();
    let mut records = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some(fields) = entry.as_object() else {
            continue;
        };

        for (key, value) in fields {
            match FieldOp::from_value(value) {
                FieldOp::Set(value) => {
                    state.insert(key.clone(), value.clone());
                }
                FieldOp::Unset => {
                    state.shift_remove(key);
                }
            }
        }

        records.push(state.clone());
    }

    records
}
