//! [`SqliteStore`], the SQLite implementation of [`PolicyStore`].

use std::path::{Path, PathBuf};

use insview_core::{
  field::{Field, FieldValue, Selector},
  policy::{NewPolicy, PolicyRecord, RawRow},
  store::{IngestReport, PolicyStore},
};
use tracing::{debug, info};

use crate::{
  Result,
  encode::{decode_record, decode_value, encode_value},
  schema::{INSERT_POLICY, SCHEMA, SELECT_ALL, select_distinct, select_where},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A policy store backed by a single SQLite file.
///
/// Holds only the file path; each operation opens its own connection and
/// closes it before returning. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct SqliteStore {
  path: PathBuf,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let store = Self { path: path.as_ref().to_path_buf() };
    store.initialize().await?;
    Ok(store)
  }

  pub fn path(&self) -> &Path { &self.path }

  /// Create the file and the `insurance` table if either is missing.
  /// Safe to run against a populated store.
  pub async fn initialize(&self) -> Result<()> {
    let existed = tokio::fs::try_exists(&self.path).await.unwrap_or(false);

    let conn = self.connect().await?;
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    conn.close().await?;

    if !existed {
      info!(path = %self.path.display(), "created policy store");
    }
    Ok(())
  }

  async fn connect(&self) -> Result<tokio_rusqlite::Connection> {
    Ok(tokio_rusqlite::Connection::open(&self.path).await?)
  }

  async fn query_records(
    &self,
    sql: &'static str,
    param: Option<rusqlite::types::Value>,
  ) -> Result<Vec<PolicyRecord>> {
    let conn = self.connect().await?;
    let records = conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(sql)?;
        let rows = match param {
          Some(value) => stmt.query_map([value], decode_record)?,
          None => stmt.query_map([], decode_record)?,
        };
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
      })
      .await?;
    conn.close().await?;
    Ok(records)
  }
}

// ─── PolicyStore impl ────────────────────────────────────────────────────────

impl PolicyStore for SqliteStore {
  type Error = crate::Error;

  async fn ingest(&self, rows: Vec<RawRow>) -> Result<IngestReport> {
    let conn = self.connect().await?;
    let mut report = IngestReport::default();

    // One statement per row and no enclosing transaction: a malformed row
    // stops the ingest but earlier rows stay committed.
    for (index, row) in rows.iter().enumerate() {
      let policy = NewPolicy::from_row(index, row)?;
      let number = policy.policy;

      let changed = conn
        .call(move |conn| {
          let mut stmt = conn.prepare_cached(INSERT_POLICY)?;
          Ok(stmt.execute(rusqlite::params![
            policy.policy,
            policy.expiry,
            policy.location,
            policy.state,
            policy.region,
            policy.insurance_value,
            policy.construction,
            policy.business_type,
            policy.earthquake,
            policy.flood,
          ])?)
        })
        .await?;

      if changed == 0 {
        debug!(policy = number, "policy already stored; skipping row");
        report.skipped += 1;
      } else {
        report.inserted += 1;
      }
    }

    conn.close().await?;
    info!(
      inserted = report.inserted,
      skipped = report.skipped,
      "ingest complete"
    );
    Ok(report)
  }

  async fn read_all(&self) -> Result<Vec<PolicyRecord>> {
    self.query_records(SELECT_ALL, None).await
  }

  async fn read_unique_values(&self, field: Field) -> Result<Vec<FieldValue>> {
    let sql = select_distinct(field);
    let conn = self.connect().await?;
    let values = conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(sql)?;
        let values = stmt
          .query_map([], |row| row.get_ref(0).map(decode_value))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(values)
      })
      .await?;
    conn.close().await?;
    Ok(values)
  }

  async fn read_filtered<'a>(
    &'a self,
    selector: Selector,
    value: &'a FieldValue,
  ) -> Result<Vec<PolicyRecord>> {
    match selector {
      Selector::All => self.read_all().await,
      Selector::Field(field) => {
        debug!(%field, %value, "filtered read");
        self
          .query_records(select_where(field), Some(encode_value(value)))
          .await
      }
    }
  }
}
