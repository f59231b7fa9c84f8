//! SQL schema and query templates for the policy store.
//!
//! Column names only ever reach SQL through the per-field templates below,
//! selected by matching on [`Field`]. Values are always bound parameters.

use insview_core::field::Field;

/// Table DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS insurance (
    id              INTEGER PRIMARY KEY,
    policy          INTEGER NOT NULL UNIQUE,
    expiry          TEXT    NOT NULL,
    location        TEXT    NOT NULL,
    state           TEXT    NOT NULL,
    region          TEXT    NOT NULL,
    insurance_value INTEGER DEFAULT 0,
    construction    TEXT    NOT NULL,
    business_type   TEXT    NOT NULL,
    earthquake      INTEGER DEFAULT 0,   -- 0 | 1
    flood           INTEGER DEFAULT 0    -- 0 | 1
);
";

macro_rules! record_columns {
  () => {
    "id, policy, expiry, location, state, region, insurance_value, \
     construction, business_type, earthquake, flood"
  };
}

/// Existing policies are left untouched: a duplicate is skipped, never
/// updated.
pub const INSERT_POLICY: &str = "
INSERT INTO insurance (
  policy, expiry, location, state, region, insurance_value,
  construction, business_type, earthquake, flood
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
ON CONFLICT (policy) DO NOTHING";

pub const SELECT_ALL: &str =
  concat!("SELECT ", record_columns!(), " FROM insurance ORDER BY id");

// Nullable columns are read through `COALESCE` so distinct values and
// comparisons see the same default that `decode_record` reports. The `CAST`
// restores the integer affinity the bare column would have given `= ?1`.
macro_rules! field_templates {
  ($($variant:ident => $column:literal),* $(,)?) => {
    /// `SELECT DISTINCT` over a single column.
    pub fn select_distinct(field: Field) -> &'static str {
      match field {
        $(Field::$variant => concat!("SELECT DISTINCT ", $column, " FROM insurance"),)*
      }
    }

    /// Full records whose column equals `?1`.
    pub fn select_where(field: Field) -> &'static str {
      match field {
        $(Field::$variant => concat!(
          "SELECT ", record_columns!(), " FROM insurance WHERE ", $column, " = ?1 ORDER BY id"
        ),)*
      }
    }
  };
}

field_templates! {
  Policy         => "policy",
  Expiry         => "expiry",
  Location       => "location",
  State          => "state",
  Region         => "region",
  InsuranceValue => "CAST(COALESCE(insurance_value, 0) AS INTEGER)",
  Construction   => "construction",
  BusinessType   => "business_type",
  Earthquake     => "CAST(COALESCE(earthquake, 0) AS INTEGER)",
  Flood          => "CAST(COALESCE(flood, 0) AS INTEGER)",
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn templates_match_field_columns() {
    for field in Field::all() {
      let distinct = select_distinct(field);
      assert!(distinct.starts_with("SELECT DISTINCT "), "{field}");
      assert!(distinct.contains(field.column()), "{field}");
      assert!(select_where(field).contains(" = ?1 ORDER BY id"), "{field}");
    }
  }

  #[test]
  fn nullable_columns_read_with_default() {
    for field in [Field::InsuranceValue, Field::Earthquake, Field::Flood] {
      let coalesced = format!("CAST(COALESCE({}, 0) AS INTEGER)", field.column());
      assert!(select_distinct(field).contains(&coalesced), "{field}");
      assert!(select_where(field).contains(&format!("WHERE {coalesced} = ?1")), "{field}");
    }
    assert!(select_where(Field::State).contains("WHERE state = ?1"));
  }
}
