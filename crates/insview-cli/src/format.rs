//! Cell text for policy records, shared by the terminal table and the
//! plain-text query output.

use insview_core::{field::Field, policy::PolicyRecord};

pub const CHECKED: &str = "☑";
pub const UNCHECKED: &str = "☐";

pub fn checkbox(set: bool) -> &'static str { if set { CHECKED } else { UNCHECKED } }

/// Display text for one column of `record`; flags render as checkboxes.
pub fn cell(record: &PolicyRecord, field: Field) -> String {
  match field {
    Field::Earthquake => checkbox(record.earthquake).to_owned(),
    Field::Flood => checkbox(record.flood).to_owned(),
    other => record.value(other).to_string(),
  }
}

/// Id followed by every field, in table column order.
pub fn row_cells(record: &PolicyRecord) -> Vec<String> {
  std::iter::once(record.id.to_string())
    .chain(Field::all().map(|field| cell(record, field)))
    .collect()
}

/// Column headings matching [`row_cells`].
pub fn headings() -> Vec<&'static str> {
  std::iter::once("#").chain(Field::all().map(Field::label)).collect()
}
