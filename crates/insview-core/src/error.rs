//! Error types for `insview-core`.

use thiserror::Error;

use crate::field::Field;

#[derive(Debug, Error)]
pub enum Error {
  /// The backing medium could not be opened, read or written.
  #[error("storage unavailable: {0}")]
  StorageUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// A malformed input row aborted the ingest. `row` is the zero-based index
  /// into the ingested sequence; rows before it may already be committed.
  #[error("ingest failed at row {row}: {reason}")]
  Ingest { row: usize, reason: String },

  #[error("invalid field: {0:?}")]
  InvalidField(String),

  #[error("{value:?} is not a valid option for {field}")]
  InvalidValue { field: Field, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
