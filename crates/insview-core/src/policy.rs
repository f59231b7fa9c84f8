//! Policy records and the positional row shape they are ingested from.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  field::{Field, FieldValue},
};

/// Number of cells in an ingest row.
pub const ROW_ARITY: usize = 10;

// ─── Stored record ───────────────────────────────────────────────────────────

/// One row of the policy table, as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRecord {
  /// Store-assigned identity.
  pub id:              i64,
  pub policy:          i64,
  pub expiry:          String,
  pub location:        String,
  pub state:           String,
  pub region:          String,
  pub insurance_value: i64,
  pub construction:    String,
  pub business_type:   String,
  pub earthquake:      bool,
  pub flood:           bool,
}

impl PolicyRecord {
  /// The stored value of `field`. Flags are reported in their 0/1 domain.
  pub fn value(&self, field: Field) -> FieldValue {
    match field {
      Field::Policy => FieldValue::Integer(self.policy),
      Field::Expiry => FieldValue::Text(self.expiry.clone()),
      Field::Location => FieldValue::Text(self.location.clone()),
      Field::State => FieldValue::Text(self.state.clone()),
      Field::Region => FieldValue::Text(self.region.clone()),
      Field::InsuranceValue => FieldValue::Integer(self.insurance_value),
      Field::Construction => FieldValue::Text(self.construction.clone()),
      Field::BusinessType => FieldValue::Text(self.business_type.clone()),
      Field::Earthquake => FieldValue::Integer(i64::from(self.earthquake)),
      Field::Flood => FieldValue::Integer(i64::from(self.flood)),
    }
  }
}

// ─── Ingest input ────────────────────────────────────────────────────────────

/// A spreadsheet cell before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
  Empty,
  Integer(i64),
  Real(f64),
  Text(String),
  Bool(bool),
}

impl RawValue {
  /// Type a textual cell: blank, integer, real, or text.
  pub fn infer(cell: &str) -> Self {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
      Self::Empty
    } else if let Ok(i) = trimmed.parse::<i64>() {
      Self::Integer(i)
    } else if let Ok(f) = trimmed.parse::<f64>() {
      Self::Real(f)
    } else {
      Self::Text(trimmed.to_owned())
    }
  }
}

impl From<&str> for RawValue {
  fn from(s: &str) -> Self { Self::Text(s.to_owned()) }
}

/// Cells in the order `policy, expiry, location, state, region,
/// insurance_value, construction, business_type, earthquake, flood`.
pub type RawRow = Vec<RawValue>;

/// A validated record ready for insertion; the store assigns `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPolicy {
  pub policy:          i64,
  pub expiry:          String,
  pub location:        String,
  pub state:           String,
  pub region:          String,
  pub insurance_value: i64,
  pub construction:    String,
  pub business_type:   String,
  pub earthquake:      bool,
  pub flood:           bool,
}

impl NewPolicy {
  /// Coerce the positional cells of input row `index`.
  pub fn from_row(index: usize, row: &[RawValue]) -> Result<Self> {
    let fail = |reason: String| Error::Ingest { row: index, reason };

    let [
      policy,
      expiry,
      location,
      state,
      region,
      insurance_value,
      construction,
      business_type,
      earthquake,
      flood,
    ] = row
    else {
      return Err(fail(format!(
        "expected {ROW_ARITY} cells, found {}",
        row.len()
      )));
    };

    let named = |field: Field| move |reason: String| fail(format!("{field}: {reason}"));

    Ok(Self {
      policy:          integer(policy).map_err(named(Field::Policy))?,
      expiry:          text(expiry).map_err(named(Field::Expiry))?,
      location:        text(location).map_err(named(Field::Location))?,
      state:           text(state).map_err(named(Field::State))?,
      region:          text(region).map_err(named(Field::Region))?,
      insurance_value: match insurance_value {
        RawValue::Empty => 0,
        other => integer(other).map_err(named(Field::InsuranceValue))?,
      },
      construction:    text(construction).map_err(named(Field::Construction))?,
      business_type:   text(business_type).map_err(named(Field::BusinessType))?,
      earthquake:      flag(earthquake).map_err(named(Field::Earthquake))?,
      flood:           flag(flood).map_err(named(Field::Flood))?,
    })
  }
}

// ─── Cell coercion ───────────────────────────────────────────────────────────

/// `f` as an integer when it is whole and inside the `i64` range.
pub fn whole_number(f: f64) -> Option<i64> {
  // `i64::MAX as f64` rounds up to 2^63, which is already out of range.
  let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
  (f.is_finite() && f.fract() == 0.0 && in_range).then(|| f as i64)
}

fn integer(value: &RawValue) -> Result<i64, String> {
  match value {
    RawValue::Integer(i) => Ok(*i),
    RawValue::Real(f) => {
      whole_number(*f).ok_or_else(|| format!("expected a whole number in range, found {f}"))
    }
    RawValue::Text(s) => s
      .trim()
      .parse()
      .map_err(|_| format!("expected an integer, found {s:?}")),
    RawValue::Empty => Err("value is required".into()),
    other => Err(format!("expected an integer, found {other:?}")),
  }
}

fn text(value: &RawValue) -> Result<String, String> {
  match value {
    RawValue::Text(s) if !s.trim().is_empty() => Ok(s.trim().to_owned()),
    RawValue::Integer(i) => Ok(i.to_string()),
    RawValue::Real(f) => Ok(f.to_string()),
    RawValue::Empty | RawValue::Text(_) => Err("value is required".into()),
    RawValue::Bool(b) => Err(format!("expected text, found {b}")),
  }
}

fn flag(value: &RawValue) -> Result<bool, String> {
  match value {
    RawValue::Empty => Ok(false),
    RawValue::Bool(b) => Ok(*b),
    RawValue::Integer(0) => Ok(false),
    RawValue::Integer(1) => Ok(true),
    RawValue::Real(f) if *f == 0.0 => Ok(false),
    RawValue::Real(f) if *f == 1.0 => Ok(true),
    RawValue::Text(s) if s.trim() == "0" => Ok(false),
    RawValue::Text(s) if s.trim() == "1" => Ok(true),
    other => Err(format!("expected 0 or 1, found {other:?}")),
  }
}
