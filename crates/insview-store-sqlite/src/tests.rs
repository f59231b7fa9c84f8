//! Integration tests for `SqliteStore` against a temporary database file.

use insview_core::{
  field::{Field, FieldValue, Selector},
  filter::FilterEngine,
  policy::{RawRow, RawValue},
  store::PolicyStore,
};
use tempfile::TempDir;

use crate::SqliteStore;

async fn store() -> (TempDir, SqliteStore) {
  let dir = tempfile::tempdir().expect("temp dir");
  let store = SqliteStore::open(dir.path().join("insurance_data.db"))
    .await
    .expect("open store");
  (dir, store)
}

fn row(policy: i64, state: &str, value: i64, earthquake: i64, flood: i64) -> RawRow {
  vec![
    RawValue::Integer(policy),
    "2024-12-31".into(),
    RawValue::Text(format!("{policy} Ocean Pde")),
    state.into(),
    "Coastal".into(),
    RawValue::Integer(value),
    "Brick".into(),
    "Hospitality".into(),
    RawValue::Integer(earthquake),
    RawValue::Integer(flood),
  ]
}

fn policies(records: &[insview_core::policy::PolicyRecord]) -> Vec<i64> {
  records.iter().map(|r| r.policy).collect()
}

// ─── Schema ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn initialize_is_idempotent_on_populated_store() {
  let (_dir, s) = store().await;
  s.ingest(vec![row(100, "VIC", 500, 1, 0)]).await.unwrap();

  s.initialize().await.unwrap();
  let reopened = SqliteStore::open(s.path()).await.unwrap();

  assert_eq!(reopened.read_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn open_in_missing_directory_is_storage_unavailable() {
  let dir = tempfile::tempdir().unwrap();
  let err = SqliteStore::open(dir.path().join("missing").join("store.db"))
    .await
    .unwrap_err();

  assert!(matches!(err, crate::Error::Database(_)));
  assert!(matches!(
    insview_core::Error::from(err),
    insview_core::Error::StorageUnavailable(_)
  ));
}

// ─── Ingest ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ingest_assigns_ids_and_defaults() {
  let (_dir, s) = store().await;
  let mut sparse = row(200, "SA", 0, 0, 0);
  sparse[5] = RawValue::Empty;
  sparse[8] = RawValue::Empty;
  sparse[9] = RawValue::Empty;

  let report = s.ingest(vec![sparse]).await.unwrap();
  assert_eq!(report.inserted, 1);

  let records = s.read_all().await.unwrap();
  assert_eq!(records.len(), 1);
  assert!(records[0].id > 0);
  assert_eq!(records[0].insurance_value, 0);
  assert!(!records[0].earthquake);
  assert!(!records[0].flood);
}

#[tokio::test]
async fn duplicate_policy_keeps_first_row() {
  let (_dir, s) = store().await;
  let report = s
    .ingest(vec![
      row(100, "VIC", 500, 1, 0),
      row(101, "NSW", 700, 0, 0),
      row(100, "TAS", 999, 0, 1),
    ])
    .await
    .unwrap();

  assert_eq!(report.inserted, 2);
  assert_eq!(report.skipped, 1);

  let first = s
    .read_filtered(Field::Policy.into(), &FieldValue::Integer(100))
    .await
    .unwrap();
  assert_eq!(first.len(), 1);
  assert_eq!(first[0].state, "VIC");
  assert_eq!(first[0].insurance_value, 500);
  assert!(first[0].earthquake);
}

#[tokio::test]
async fn reingest_skips_instead_of_updating() {
  let (_dir, s) = store().await;
  s.ingest(vec![row(100, "VIC", 500, 1, 0)]).await.unwrap();

  let report = s.ingest(vec![row(100, "WA", 1, 0, 1)]).await.unwrap();
  assert_eq!(report, insview_core::store::IngestReport { inserted: 0, skipped: 1 });

  let records = s.read_all().await.unwrap();
  assert_eq!(records[0].state, "VIC");
  assert!(!records[0].flood);
}

#[tokio::test]
async fn ingesting_same_rows_twice_keeps_count() {
  let (_dir, s) = store().await;
  let rows = vec![row(100, "VIC", 500, 1, 0), row(101, "NSW", 700, 0, 0)];

  s.ingest(rows.clone()).await.unwrap();
  let once = s.read_all().await.unwrap().len();
  s.ingest(rows).await.unwrap();
  let twice = s.read_all().await.unwrap().len();

  assert_eq!(once, 2);
  assert_eq!(once, twice);
}

#[tokio::test]
async fn malformed_row_aborts_without_rollback() {
  let (_dir, s) = store().await;
  let mut bad = row(102, "QLD", 300, 0, 0);
  bad.truncate(4);

  let err = s
    .ingest(vec![row(100, "VIC", 500, 1, 0), bad, row(103, "NT", 1, 0, 0)])
    .await
    .unwrap_err();

  assert!(matches!(
    err,
    crate::Error::Core(insview_core::Error::Ingest { row: 1, .. })
  ));
  assert_eq!(policies(&s.read_all().await.unwrap()), [100]);
}

#[tokio::test]
async fn text_policy_number_is_coerced() {
  let (_dir, s) = store().await;
  let mut cells = row(0, "VIC", 500, 0, 0);
  cells[0] = RawValue::Text("300".into());
  s.ingest(vec![cells]).await.unwrap();

  assert_eq!(policies(&s.read_all().await.unwrap()), [300]);
}

// ─── Reads ───────────────────────────────────────────────────────────────────

async fn seeded() -> (TempDir, SqliteStore) {
  let (dir, s) = store().await;
  s.ingest(vec![
    row(100, "VIC", 500, 1, 0),
    row(101, "NSW", 700, 0, 0),
    row(102, "VIC", 90, 0, 1),
  ])
  .await
  .unwrap();
  (dir, s)
}

#[tokio::test]
async fn read_all_is_in_insertion_order() {
  let (_dir, s) = seeded().await;
  assert_eq!(policies(&s.read_all().await.unwrap()), [100, 101, 102]);
}

#[tokio::test]
async fn unique_values_are_distinct() {
  let (_dir, s) = seeded().await;

  let mut states = s.read_unique_values(Field::State).await.unwrap();
  states.sort();
  assert_eq!(states, [FieldValue::text("NSW"), FieldValue::text("VIC")]);

  let mut values = s.read_unique_values(Field::InsuranceValue).await.unwrap();
  values.sort();
  assert_eq!(
    values,
    [FieldValue::Integer(90), FieldValue::Integer(500), FieldValue::Integer(700)]
  );
}

#[tokio::test]
async fn all_selector_matches_read_all() {
  let (_dir, s) = seeded().await;
  let all = s.read_all().await.unwrap();

  for ignored in [FieldValue::Integer(100), FieldValue::text("anything")] {
    assert_eq!(s.read_filtered(Selector::All, &ignored).await.unwrap(), all);
  }
}

#[tokio::test]
async fn filtered_read_returns_exactly_matching_records() {
  let (_dir, s) = seeded().await;
  let all = s.read_all().await.unwrap();

  for field in Field::all() {
    for value in s.read_unique_values(field).await.unwrap() {
      let matched = s.read_filtered(field.into(), &value).await.unwrap();
      let expected: Vec<_> = all
        .iter()
        .filter(|r| r.value(field) == value)
        .cloned()
        .collect();
      assert_eq!(matched, expected, "{field} = {value}");
    }
  }
}

#[tokio::test]
async fn integer_columns_compare_numerically() {
  let (_dir, s) = seeded().await;
  let matched = s
    .read_filtered(Field::InsuranceValue.into(), &FieldValue::text("90"))
    .await
    .unwrap();
  assert_eq!(policies(&matched), [102]);
}

#[tokio::test]
async fn no_match_is_empty_not_error() {
  let (_dir, s) = seeded().await;
  let matched = s
    .read_filtered(Field::State.into(), &FieldValue::text("ACT"))
    .await
    .unwrap();
  assert!(matched.is_empty());
}

#[tokio::test]
async fn null_insured_value_reads_and_filters_as_zero() {
  let (_dir, s) = store().await;
  s.ingest(vec![row(100, "VIC", 0, 0, 0)]).await.unwrap();

  // Written by another tool: nullable columns left unset.
  let conn = rusqlite::Connection::open(s.path()).unwrap();
  conn
    .execute(
      "INSERT INTO insurance (policy, expiry, location, state, region, construction, business_type, \
       insurance_value, earthquake, flood) \
       VALUES (101, '2025-01-01', '1 Pier St', 'WA', 'Coastal', 'Steel', 'Marine', NULL, NULL, NULL)",
      [],
    )
    .unwrap();
  drop(conn);

  let all = s.read_all().await.unwrap();
  assert_eq!(all[1].insurance_value, 0);
  assert!(!all[1].earthquake);

  let values = s.read_unique_values(Field::InsuranceValue).await.unwrap();
  assert_eq!(values, [FieldValue::Integer(0)]);

  let zero = s
    .read_filtered(Field::InsuranceValue.into(), &FieldValue::Integer(0))
    .await
    .unwrap();
  assert_eq!(policies(&zero), [100, 101]);

  let no_flood = s
    .read_filtered(Field::Flood.into(), &FieldValue::Integer(0))
    .await
    .unwrap();
  assert_eq!(policies(&no_flood), [100, 101]);
}

#[tokio::test]
async fn reads_fail_once_store_directory_is_gone() {
  let (dir, s) = seeded().await;
  drop(dir);

  let err = s.read_all().await.unwrap_err();
  assert!(matches!(
    insview_core::Error::from(err),
    insview_core::Error::StorageUnavailable(_)
  ));
}

// ─── Filter engine over SQLite ───────────────────────────────────────────────

#[tokio::test]
async fn cascading_filter_walkthrough() {
  let (_dir, s) = store().await;
  s.ingest(vec![row(100, "VIC", 500, 1, 0), row(101, "NSW", 700, 0, 0)])
    .await
    .unwrap();

  let mut engine = FilterEngine::new(s).await.unwrap();
  assert_eq!(engine.entry_count(), 2);

  engine.select_primary(Field::Earthquake.into()).await.unwrap();
  assert_eq!(engine.options(), [FieldValue::text("No"), FieldValue::text("Yes")]);

  engine.select_secondary(FieldValue::text("Yes")).await.unwrap();
  assert_eq!(policies(engine.visible_rows()), [100]);
  assert_eq!(engine.entry_count(), 1);

  engine.select_secondary(FieldValue::text("No")).await.unwrap();
  assert_eq!(policies(engine.visible_rows()), [101]);
  assert_eq!(engine.entry_count(), 1);

  engine.select_primary(Selector::All).await.unwrap();
  assert_eq!(policies(engine.visible_rows()), [100, 101]);
  assert_eq!(engine.entry_count(), 2);
}

#[tokio::test]
async fn integer_options_sort_numerically() {
  let (_dir, s) = store().await;
  s.ingest(vec![
    row(1000, "VIC", 1, 0, 0),
    row(99, "VIC", 1, 0, 0),
    row(250, "VIC", 1, 0, 0),
  ])
  .await
  .unwrap();

  let mut engine = FilterEngine::new(s).await.unwrap();
  engine.select_primary(Field::Policy.into()).await.unwrap();
  assert_eq!(
    engine.options(),
    [FieldValue::Integer(99), FieldValue::Integer(250), FieldValue::Integer(1000)]
  );
}
