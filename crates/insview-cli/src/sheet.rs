//! Spreadsheet import.
//!
//! The policy spreadsheet is read from its CSV export. The first line is the
//! header and is skipped. Earthquake and flood cells are normalised from
//! `Y`/`N` to `1`/`0` here, before rows reach the store; any other spelling
//! is passed through for the store to reject. Only the numeric columns are
//! typed; text cells keep their spelling (`0800` stays `0800`).

use std::{fs::File, io, path::Path};

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use insview_core::policy::{RawRow, RawValue};

/// Zero-based positions of the earthquake and flood columns.
const FLAG_COLUMNS: [usize; 2] = [8, 9];

/// Zero-based positions of the policy, insured value and flag columns.
const NUMERIC_COLUMNS: [usize; 4] = [0, 5, 8, 9];

/// Read every data row of the spreadsheet at `path`.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>> {
  let file = File::open(path)
    .with_context(|| format!("opening spreadsheet {}", path.display()))?;
  read_from(file).with_context(|| format!("reading spreadsheet {}", path.display()))
}

pub fn read_from(reader: impl io::Read) -> Result<Vec<RawRow>> {
  let mut csv = ReaderBuilder::new()
    .has_headers(true)
    .flexible(true)
    .trim(Trim::All)
    .from_reader(reader);

  let mut rows = Vec::new();
  for (index, record) in csv.records().enumerate() {
    // +2: one for the header, one for 1-based spreadsheet numbering.
    let record = record.with_context(|| format!("row {}", index + 2))?;
    if record.iter().all(str::is_empty) {
      continue;
    }

    let mut row: RawRow = record.iter().enumerate().map(typed_cell).collect();
    for position in FLAG_COLUMNS {
      if let Some(cell) = row.get_mut(position) {
        normalize_flag(cell);
      }
    }
    rows.push(row);
  }
  Ok(rows)
}

fn typed_cell((position, cell): (usize, &str)) -> RawValue {
  if NUMERIC_COLUMNS.contains(&position) {
    RawValue::infer(cell)
  } else if cell.is_empty() {
    RawValue::Empty
  } else {
    RawValue::Text(cell.to_owned())
  }
}

fn normalize_flag(cell: &mut RawValue) {
  let RawValue::Text(s) = cell else { return };
  let set = if s.eq_ignore_ascii_case("y") {
    1
  } else if s.eq_ignore_ascii_case("n") {
    0
  } else {
    return;
  };
  *cell = RawValue::Integer(set);
}

#[cfg(test)]
mod tests {
  use super::*;

  const SHEET: &str = "\
Policy,Expiry,Location,State,Region,Insured Value,Construction,Business Type,Earthquake,Flood
100,2024-03-01,1 King St,VIC,Metro,250000,Brick,Retail,Y,N
101,2024-04-15,9 Bay Rd,QLD,Coastal,,Timber,Hospitality,N,y
,,,,,,,,,
102,2024-05-30,3 Hill Ave,WA,Inland,90000.0,Steel,Mining,Maybe,N
";

  #[test]
  fn skips_header_and_blank_rows() {
    let rows = read_from(SHEET.as_bytes()).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0][0], RawValue::Integer(100));
    assert_eq!(rows[1][5], RawValue::Empty);
  }

  #[test]
  fn normalizes_yes_no_flags() {
    let rows = read_from(SHEET.as_bytes()).unwrap();
    assert_eq!(rows[0][8], RawValue::Integer(1));
    assert_eq!(rows[0][9], RawValue::Integer(0));
    assert_eq!(rows[1][9], RawValue::Integer(1));
  }

  #[test]
  fn leaves_unknown_flag_spellings_for_the_store() {
    let rows = read_from(SHEET.as_bytes()).unwrap();
    assert_eq!(rows[2][8], RawValue::Text("Maybe".into()));
    assert_eq!(rows[2][5], RawValue::Real(90000.0));
  }

  #[test]
  fn text_columns_keep_their_spelling() {
    let sheet = "\
Policy,Expiry,Location,State,Region,Insured Value,Construction,Business Type,Earthquake,Flood
0100,2024-03-01,12,VIC,0800,1500.0,1.50,Retail,N,N
";
    let rows = read_from(sheet.as_bytes()).unwrap();
    assert_eq!(rows[0][0], RawValue::Integer(100));
    assert_eq!(rows[0][2], RawValue::Text("12".into()));
    assert_eq!(rows[0][4], RawValue::Text("0800".into()));
    assert_eq!(rows[0][5], RawValue::Real(1500.0));
    assert_eq!(rows[0][6], RawValue::Text("1.50".into()));
  }

  #[test]
  fn short_rows_are_kept_for_arity_checks() {
    let rows = read_from("h1,h2\n100,2024-01-01\n".as_bytes()).unwrap();
    assert_eq!(rows, vec![vec![RawValue::Integer(100), RawValue::Text("2024-01-01".into())]]);
  }
}
