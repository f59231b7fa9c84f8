//! Policy table: the visible rows of the current filter.

use insview_core::store::PolicyStore;
use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  widgets::{Block, Borders, Paragraph, Row, Table, TableState},
};

use super::pane_border;
use crate::{
  app::{App, Focus},
  format::{headings, row_cells},
};

pub fn draw<S: PolicyStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  let focused = app.focus == Focus::Table;
  let block = Block::default()
    .title(format!(" Policies ({}) ", app.engine.entry_count()))
    .borders(Borders::ALL)
    .border_style(pane_border(focused));

  let records = app.engine.visible_rows();
  if records.is_empty() {
    f.render_widget(
      Paragraph::new("No policies match this filter.")
        .style(Style::default().fg(Color::DarkGray))
        .block(block),
      area,
    );
    return;
  }

  let headings = headings();
  let widths = vec![Constraint::Fill(1); headings.len()];
  let header = Row::new(headings).style(
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let rows: Vec<Row> = records.iter().map(|r| Row::new(row_cells(r))).collect();

  let table = Table::new(rows, widths)
    .header(header)
    .block(block)
    .row_highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    );

  let mut state = TableState::default();
  state.select(focused.then_some(app.table_cursor));
  f.render_stateful_widget(table, area, &mut state);
}
