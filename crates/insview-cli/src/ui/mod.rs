//! TUI rendering; orchestrates all panes.

pub mod policy_table;
pub mod selectors;

use chrono::Local;
use insview_core::store::PolicyStore;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, Focus};

/// Height of the selector row, borders included.
const SELECTOR_HEIGHT: u16 = 8;

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<S: PolicyStore>(f: &mut Frame, app: &App<S>) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1),               // header
      Constraint::Length(SELECTOR_HEIGHT), // selectors
      Constraint::Min(0),                  // table
      Constraint::Length(1),               // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0]);
  selectors::draw(f, rows[1], app);
  policy_table::draw(f, rows[2], app);
  draw_status(f, rows[3], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " Insurance Data Viewer",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{date} "),
    Style::default().fg(Color::Gray),
  );

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<S: PolicyStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  let (mode_label, hints) = match app.focus {
    Focus::Primary => ("FIELD", "↑↓/jk choose  Enter apply  Tab next  r refresh  q quit"),
    Focus::Secondary => ("VALUE", "↑↓/jk choose  Enter apply  Tab next  r refresh  q quit"),
    Focus::Table => ("TABLE", "↑↓/jk scroll  Tab next  r refresh  q quit"),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::DarkGray),
  );

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, hint_span]))
      .style(Style::default().bg(Color::Black)),
    area,
  );
}

/// Border style for a pane, highlighted when it has focus.
fn pane_border(focused: bool) -> Style {
  if focused {
    Style::default().fg(Color::Yellow)
  } else {
    Style::default().fg(Color::DarkGray)
  }
}
