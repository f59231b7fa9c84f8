//! The `PolicyStore` trait.
//!
//! Implemented by storage backends (e.g. `insview-store-sqlite`). The filter
//! engine and the CLI depend on this abstraction, not on a concrete backend.

use std::future::Future;

use crate::{
  field::{Field, FieldValue, Selector},
  policy::{PolicyRecord, RawRow},
};

/// Outcome of an ingest that ran to completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
  pub inserted: usize,
  /// Rows whose `policy` already existed and were left untouched.
  pub skipped:  usize,
}

/// Abstraction over a policy store backend.
///
/// Records are only ever created by [`ingest`](PolicyStore::ingest); nothing
/// updates or deletes them. Every read materialises its full result.
pub trait PolicyStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static + Into<crate::Error>;

  /// Insert each row unless a record with the same `policy` exists.
  ///
  /// A malformed row aborts the ingest with [`crate::Error::Ingest`]; rows
  /// before it are not rolled back.
  fn ingest(
    &self,
    rows: Vec<RawRow>,
  ) -> impl Future<Output = Result<IngestReport, Self::Error>> + Send + '_;

  /// Every record, in insertion order.
  fn read_all(&self) -> impl Future<Output = Result<Vec<PolicyRecord>, Self::Error>> + Send + '_;

  /// Distinct values of `field`, in no particular order.
  fn read_unique_values(
    &self,
    field: Field,
  ) -> impl Future<Output = Result<Vec<FieldValue>, Self::Error>> + Send + '_;

  /// Records whose `selector` field equals `value`. [`Selector::All`]
  /// ignores `value` and returns every record. No match is an empty vec.
  fn read_filtered<'a>(
    &'a self,
    selector: Selector,
    value: &'a FieldValue,
  ) -> impl Future<Output = Result<Vec<PolicyRecord>, Self::Error>> + Send + 'a;
}
