//! Filter selectors and the entry count, the row under the header.

use insview_core::store::PolicyStore;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::pane_border;
use crate::app::{App, Focus};

pub fn draw<S: PolicyStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([
      Constraint::Percentage(35),
      Constraint::Percentage(45),
      Constraint::Percentage(20),
    ])
    .split(area);

  draw_primary(f, cols[0], app);
  draw_secondary(f, cols[1], app);
  draw_count(f, cols[2], app);
}

fn draw_primary<S: PolicyStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  let active = app.engine.selection().primary;
  let items: Vec<ListItem> = app
    .primary_choices
    .iter()
    .map(|choice| choice_item(choice.label(), *choice == active))
    .collect();

  let block = Block::default()
    .title(" Select First Filter ")
    .borders(Borders::ALL)
    .border_style(pane_border(app.focus == Focus::Primary));

  let mut state = ListState::default();
  state.select(Some(app.primary_cursor));
  f.render_stateful_widget(list(items, block), area, &mut state);
}

fn draw_secondary<S: PolicyStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  let block = Block::default()
    .title(" Select Second Filter ")
    .borders(Borders::ALL)
    .border_style(pane_border(app.focus == Focus::Secondary));

  if !app.engine.secondary_enabled() {
    f.render_widget(
      Paragraph::new("Choose a field first.")
        .style(Style::default().fg(Color::DarkGray))
        .block(block),
      area,
    );
    return;
  }

  let options = app.engine.options();
  if options.is_empty() {
    f.render_widget(
      Paragraph::new("No values stored for this field.")
        .style(Style::default().fg(Color::DarkGray))
        .block(block),
      area,
    );
    return;
  }

  let chosen = app.engine.selection().secondary.as_ref();
  let items: Vec<ListItem> = options
    .iter()
    .map(|value| choice_item(&value.to_string(), Some(value) == chosen))
    .collect();

  let mut state = ListState::default();
  state.select(Some(app.secondary_cursor));
  f.render_stateful_widget(list(items, block), area, &mut state);
}

fn draw_count<S: PolicyStore>(f: &mut Frame, area: Rect, app: &App<S>) {
  let block = Block::default()
    .title(" # of Entries ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  f.render_widget(
    Paragraph::new(Line::from(Span::styled(
      app.engine.entry_count().to_string(),
      Style::default().add_modifier(Modifier::BOLD),
    )))
    .block(block),
    area,
  );
}

/// A selector entry; the applied choice is marked with a bullet.
fn choice_item(label: &str, applied: bool) -> ListItem<'static> {
  let marker = if applied { "● " } else { "  " };
  ListItem::new(Line::from(vec![
    Span::styled(marker, Style::default().fg(Color::Green)),
    Span::raw(label.to_owned()),
  ]))
}

fn list<'a>(items: Vec<ListItem<'a>>, block: Block<'a>) -> List<'a> {
  List::new(items).block(block).highlight_style(
    Style::default()
      .bg(Color::Blue)
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  )
}
