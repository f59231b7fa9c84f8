//! Error type for `insview-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] insview_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Database failures surface to the filter engine as storage outages; core
/// errors (malformed ingest rows) pass through unchanged.
impl From<Error> for insview_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(inner) => inner,
      other => Self::StorageUnavailable(Box::new(other)),
    }
  }
}
