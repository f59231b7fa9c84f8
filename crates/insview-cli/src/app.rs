//! Application state and key dispatch for the terminal browser.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use insview_core::{
  field::{FieldValue, Selector},
  filter::FilterEngine,
  store::PolicyStore,
};

// ─── Focus ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  /// The primary (field) selector.
  Primary,
  /// The secondary (value) selector; skipped while the primary is `All`.
  Secondary,
  /// The policy table.
  Table,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state. Filter state lives in the engine; this only
/// tracks cursors and focus.
pub struct App<S> {
  pub engine: FilterEngine<S>,

  pub focus: Focus,

  /// Primary choices in display order, `All` first.
  pub primary_choices: Vec<Selector>,

  /// Cursor within `primary_choices`.
  pub primary_cursor: usize,

  /// Cursor within the engine's secondary options.
  pub secondary_cursor: usize,

  /// Selected row within the visible policies.
  pub table_cursor: usize,

  /// One-line status message shown in the status bar.
  pub status_msg: String,
}

impl<S: PolicyStore> App<S> {
  pub fn new(engine: FilterEngine<S>) -> Self {
    Self {
      engine,
      focus: Focus::Primary,
      primary_choices: Selector::choices().collect(),
      primary_cursor: 0,
      secondary_cursor: 0,
      table_cursor: 0,
      status_msg: String::new(),
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  ///
  /// Store failures are reported in the status bar; the current view stays
  /// on screen.
  pub async fn handle_key(&mut self, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    match key.code {
      KeyCode::Char('q') => return false,
      KeyCode::Tab => self.focus = self.next_focus(),
      KeyCode::BackTab => self.focus = self.previous_focus(),
      KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
      KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
      KeyCode::Enter => self.commit().await,
      KeyCode::Char('r') => {
        let result = self.engine.refresh().await;
        self.report(result, "Refreshed");
        self.clamp_cursors();
      }
      _ => {}
    }
    true
  }

  fn next_focus(&self) -> Focus {
    match self.focus {
      Focus::Primary if self.engine.secondary_enabled() => Focus::Secondary,
      Focus::Primary | Focus::Secondary => Focus::Table,
      Focus::Table => Focus::Primary,
    }
  }

  fn previous_focus(&self) -> Focus {
    match self.focus {
      Focus::Table if self.engine.secondary_enabled() => Focus::Secondary,
      Focus::Table | Focus::Secondary => Focus::Primary,
      Focus::Primary => Focus::Table,
    }
  }

  fn move_cursor(&mut self, delta: isize) {
    let (cursor, len) = match self.focus {
      Focus::Primary => (&mut self.primary_cursor, self.primary_choices.len()),
      Focus::Secondary => (&mut self.secondary_cursor, self.engine.options().len()),
      Focus::Table => (&mut self.table_cursor, self.engine.entry_count()),
    };
    if len == 0 {
      return;
    }
    *cursor = cursor.saturating_add_signed(delta).min(len - 1);
  }

  /// Apply the choice under the cursor of the focused selector.
  async fn commit(&mut self) {
    match self.focus {
      Focus::Primary => {
        let Some(&choice) = self.primary_choices.get(self.primary_cursor) else {
          return;
        };
        let result = self.engine.select_primary(choice).await;
        if result.is_ok() {
          self.secondary_cursor = 0;
          if choice == Selector::All {
            self.table_cursor = 0;
          }
        }
        self.report(result, "");
      }
      Focus::Secondary => {
        let Some(value) = self.cursor_option().cloned() else {
          return;
        };
        let result = self.engine.select_secondary(value).await;
        if result.is_ok() {
          self.table_cursor = 0;
          self.focus = Focus::Table;
        }
        self.report(result, "");
      }
      Focus::Table => {}
    }
  }

  fn report(&mut self, result: insview_core::Result<()>, ok_msg: &str) {
    self.status_msg = match result {
      Ok(()) => ok_msg.to_owned(),
      Err(e) => format!("Error: {e}"),
    };
  }

  fn clamp_cursors(&mut self) {
    self.secondary_cursor = self
      .secondary_cursor
      .min(self.engine.options().len().saturating_sub(1));
    self.table_cursor = self
      .table_cursor
      .min(self.engine.entry_count().saturating_sub(1));
  }

  /// The secondary option under the cursor, if the selector is enabled.
  pub fn cursor_option(&self) -> Option<&FieldValue> {
    if !self.engine.secondary_enabled() {
      return None;
    }
    self.engine.options().get(self.secondary_cursor)
  }
}
