//! Conversions between SQLite rows/values and domain types.
//!
//! Flags are stored as 0/1 integers. `insurance_value` may be NULL in a file
//! written by another tool; it reads back as 0, and the per-field query
//! templates compare it as 0 too.

use insview_core::{
  field::FieldValue,
  policy::{PolicyRecord, whole_number},
};
use rusqlite::{Row, types::ValueRef};

/// Decode a row selected with the full record column list.
pub fn decode_record(row: &Row<'_>) -> rusqlite::Result<PolicyRecord> {
  Ok(PolicyRecord {
    id:              row.get(0)?,
    policy:          row.get(1)?,
    expiry:          row.get(2)?,
    location:        row.get(3)?,
    state:           row.get(4)?,
    region:          row.get(5)?,
    insurance_value: row.get::<_, Option<i64>>(6)?.unwrap_or_default(),
    construction:    row.get(7)?,
    business_type:   row.get(8)?,
    earthquake:      row.get::<_, Option<i64>>(9)?.unwrap_or_default() != 0,
    flood:           row.get::<_, Option<i64>>(10)?.unwrap_or_default() != 0,
  })
}

/// Decode a single column value as returned by `SELECT DISTINCT`.
pub fn decode_value(value: ValueRef<'_>) -> FieldValue {
  match value {
    ValueRef::Integer(i) => FieldValue::Integer(i),
    ValueRef::Real(f) => {
      whole_number(f).map_or_else(|| FieldValue::Text(f.to_string()), FieldValue::Integer)
    }
    ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
      FieldValue::Text(String::from_utf8_lossy(bytes).into_owned())
    }
    ValueRef::Null => FieldValue::Integer(0),
  }
}

/// Bind a filter value for a `= ?1` comparison.
pub fn encode_value(value: &FieldValue) -> rusqlite::types::Value {
  match value {
    FieldValue::Integer(i) => rusqlite::types::Value::Integer(*i),
    FieldValue::Text(s) => rusqlite::types::Value::Text(s.clone()),
  }
}
