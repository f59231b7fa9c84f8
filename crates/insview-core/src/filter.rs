//! The cascading filter engine.
//!
//! [`FilterEngine`] owns the current [`Selection`] and keeps three things in
//! step with it: the secondary option set, the visible rows, and the entry
//! count (always `visible_rows().len()`).
//!
//! State changes are all-or-nothing. Every store read for a transition
//! completes before any field of the engine is touched, so a failed read
//! leaves the selection, the options and the visible rows as they were.
//!
//! Changing the primary field does not re-query rows: the previous row set
//! stays visible until a secondary value is chosen or [`FilterEngine::refresh`]
//! is called.

use tracing::{debug, warn};

use crate::{
  Error, Result,
  field::{FLAG_NO, FLAG_YES, Field, FieldValue, Selector},
  policy::PolicyRecord,
  store::PolicyStore,
};

/// The user's current filter choice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
  pub primary:   Selector,
  /// `None` until a value is chosen for the current primary field.
  pub secondary: Option<FieldValue>,
}

// ─── Engine ──────────────────────────────────────────────────────────────────

pub struct FilterEngine<S> {
  store:     S,
  selection: Selection,
  options:   Vec<FieldValue>,
  visible:   Vec<PolicyRecord>,
}

impl<S: PolicyStore> FilterEngine<S> {
  /// Start unfiltered, showing every record in the store.
  pub async fn new(store: S) -> Result<Self> {
    let visible = store.read_all().await.map_err(Into::into)?;
    debug!(rows = visible.len(), "filter engine initialised");
    Ok(Self {
      store,
      selection: Selection::default(),
      options: Vec::new(),
      visible,
    })
  }

  // ── Queries ───────────────────────────────────────────────────────────────

  pub fn selection(&self) -> &Selection { &self.selection }

  /// Choices for the secondary selector, sorted ascending. Empty while the
  /// primary selector is `All`.
  pub fn options(&self) -> &[FieldValue] { &self.options }

  pub fn visible_rows(&self) -> &[PolicyRecord] { &self.visible }

  pub fn entry_count(&self) -> usize { self.visible.len() }

  /// The secondary selector only accepts input once a field is chosen.
  pub fn secondary_enabled(&self) -> bool {
    matches!(self.selection.primary, Selector::Field(_))
  }

  pub fn store(&self) -> &S { &self.store }

  // ── Events ────────────────────────────────────────────────────────────────

  /// Handle a new primary selection.
  pub async fn select_primary(&mut self, primary: Selector) -> Result<()> {
    match primary {
      Selector::All => {
        let rows = self.read(self.store.read_all().await)?;
        self.selection = Selection::default();
        self.options.clear();
        self.visible = rows;
        debug!(rows = self.visible.len(), "primary filter cleared");
      }
      Selector::Field(field) => {
        let options = self.load_options(field).await?;
        self.selection = Selection { primary, secondary: None };
        self.options = options;
        debug!(%field, options = self.options.len(), "primary filter selected");
      }
    }
    Ok(())
  }

  /// Handle a secondary selection for the current primary field.
  ///
  /// Inert while the primary selector is `All`. The value must be one of
  /// [`options`](Self::options).
  pub async fn select_secondary(&mut self, value: FieldValue) -> Result<()> {
    let Selector::Field(field) = self.selection.primary else {
      debug!(%value, "secondary selection ignored without a primary field");
      return Ok(());
    };

    if !self.options.contains(&value) {
      return Err(Error::InvalidValue { field, value: value.to_string() });
    }

    let rows = self.query_rows(field, &value).await?;
    self.selection.secondary = Some(value);
    self.visible = rows;
    debug!(%field, rows = self.visible.len(), "secondary filter applied");
    Ok(())
  }

  /// Re-run the queries behind the current selection.
  ///
  /// With a primary field but no value yet, only the option set is reloaded
  /// and the visible rows are left alone.
  pub async fn refresh(&mut self) -> Result<()> {
    match (self.selection.primary, self.selection.secondary.clone()) {
      (Selector::All, _) => {
        self.visible = self.read(self.store.read_all().await)?;
      }
      (Selector::Field(field), Some(value)) => {
        self.visible = self.query_rows(field, &value).await?;
      }
      (Selector::Field(field), None) => {
        self.options = self.load_options(field).await?;
      }
    }
    Ok(())
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  async fn load_options(&self, field: Field) -> Result<Vec<FieldValue>> {
    let mut options = if field.is_flag() {
      vec![FieldValue::text(FLAG_YES), FieldValue::text(FLAG_NO)]
    } else {
      self.read(self.store.read_unique_values(field).await)?
    };
    options.sort();
    Ok(options)
  }

  async fn query_rows(&self, field: Field, value: &FieldValue) -> Result<Vec<PolicyRecord>> {
    let query_value = store_value(field, value);
    let result = self
      .store
      .read_filtered(Selector::Field(field), &query_value)
      .await;
    self.read(result)
  }

  fn read<T>(&self, result: Result<T, S::Error>) -> Result<T> {
    result.map_err(|e| {
      let e: Error = e.into();
      warn!(error = %e, "store read failed; keeping current view");
      e
    })
  }
}

/// Translate a presented option into the stored domain: the flag labels
/// become 1/0, everything else passes through.
fn store_value(field: Field, value: &FieldValue) -> FieldValue {
  match value {
    FieldValue::Text(label) if field.is_flag() && label == FLAG_YES => FieldValue::Integer(1),
    FieldValue::Text(label) if field.is_flag() && label == FLAG_NO => FieldValue::Integer(0),
    other => other.clone(),
  }
}
