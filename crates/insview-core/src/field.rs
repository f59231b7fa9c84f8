//! The closed set of filterable fields and the values they carry.
//!
//! Field names never come from free text at query time: callers parse them
//! once through [`Field::from_str`] (or [`Selector::from_str`]) and the store
//! maps the resulting enum onto a fixed query template.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

use crate::Error;

/// Labels shown for the two boolean fields instead of their 0/1 domain.
pub const FLAG_YES: &str = "Yes";
pub const FLAG_NO: &str = "No";

// ─── Field ───────────────────────────────────────────────────────────────────

/// A filterable column of the policy table.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Field {
  Policy,
  Expiry,
  Location,
  State,
  Region,
  InsuranceValue,
  Construction,
  BusinessType,
  Earthquake,
  Flood,
}

/// How a field's values are stored and compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  Integer,
  Text,
  /// Stored as 0/1, presented as "Yes"/"No".
  Flag,
}

impl Field {
  /// The SQL column name.
  pub fn column(self) -> &'static str {
    match self {
      Self::Policy => "policy",
      Self::Expiry => "expiry",
      Self::Location => "location",
      Self::State => "state",
      Self::Region => "region",
      Self::InsuranceValue => "insurance_value",
      Self::Construction => "construction",
      Self::BusinessType => "business_type",
      Self::Earthquake => "earthquake",
      Self::Flood => "flood",
    }
  }

  /// Human-readable label for selectors and table headings.
  pub fn label(self) -> &'static str {
    match self {
      Self::Policy => "Policy",
      Self::Expiry => "Expiry",
      Self::Location => "Location",
      Self::State => "State",
      Self::Region => "Region",
      Self::InsuranceValue => "Insured Value",
      Self::Construction => "Construction",
      Self::BusinessType => "Business Type",
      Self::Earthquake => "Earthquake",
      Self::Flood => "Flood",
    }
  }

  pub fn kind(self) -> FieldKind {
    match self {
      Self::Policy | Self::InsuranceValue => FieldKind::Integer,
      Self::Earthquake | Self::Flood => FieldKind::Flag,
      _ => FieldKind::Text,
    }
  }

  pub fn is_flag(self) -> bool { self.kind() == FieldKind::Flag }

  /// All fields in table column order.
  pub fn all() -> impl Iterator<Item = Field> { Self::iter() }
}

impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.column())
  }
}

/// Accepts the column name or the display label, case-insensitively.
impl FromStr for Field {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim();
    Self::iter()
      .find(|field| {
        field.column().eq_ignore_ascii_case(wanted)
          || field.label().eq_ignore_ascii_case(wanted)
      })
      .ok_or_else(|| Error::InvalidField(s.to_owned()))
  }
}

// ─── Selector ────────────────────────────────────────────────────────────────

/// The primary filter: either no filter at all or a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Selector {
  #[default]
  All,
  Field(Field),
}

impl Selector {
  /// Every primary choice in selector order, `All` first.
  pub fn choices() -> impl Iterator<Item = Selector> {
    std::iter::once(Self::All).chain(Field::iter().map(Self::Field))
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::All => "All",
      Self::Field(field) => field.label(),
    }
  }

  pub fn field(self) -> Option<Field> {
    match self {
      Self::All => None,
      Self::Field(field) => Some(field),
    }
  }
}

impl From<Field> for Selector {
  fn from(field: Field) -> Self { Self::Field(field) }
}

impl fmt::Display for Selector {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::All => f.write_str("all"),
      Self::Field(field) => field.fmt(f),
    }
  }
}

/// `"all"` and `"*"` select the sentinel; anything else must name a field.
impl FromStr for Selector {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let trimmed = s.trim();
    if trimmed == "*" || trimmed.eq_ignore_ascii_case("all") {
      return Ok(Self::All);
    }
    trimmed.parse().map(Self::Field)
  }
}

// ─── FieldValue ──────────────────────────────────────────────────────────────

/// A single stored value, as returned by distinct-value queries and accepted
/// by filter queries.
///
/// The derived ordering sorts integers numerically and text lexically; a
/// field's values are always of one variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
  Integer(i64),
  Text(String),
}

impl FieldValue {
  pub fn text(s: impl Into<String>) -> Self { Self::Text(s.into()) }

  /// Parse user input into the value domain of `field`.
  ///
  /// Flag fields take their presentation labels ("Yes"/"No"), matching the
  /// options the filter engine offers for them.
  pub fn parse_for(field: Field, input: &str) -> crate::Result<Self> {
    let trimmed = input.trim();
    let invalid = || Error::InvalidValue { field, value: input.to_owned() };
    match field.kind() {
      FieldKind::Integer => trimmed.parse().map(Self::Integer).map_err(|_| invalid()),
      FieldKind::Text => Ok(Self::Text(trimmed.to_owned())),
      FieldKind::Flag => {
        if trimmed.eq_ignore_ascii_case(FLAG_YES) {
          Ok(Self::text(FLAG_YES))
        } else if trimmed.eq_ignore_ascii_case(FLAG_NO) {
          Ok(Self::text(FLAG_NO))
        } else {
          Err(invalid())
        }
      }
    }
  }
}

impl fmt::Display for FieldValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Integer(i) => write!(f, "{i}"),
      Self::Text(s) => f.write_str(s),
    }
  }
}
