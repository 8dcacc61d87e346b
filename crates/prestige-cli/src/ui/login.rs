//! Login form.

use prestige_core::{proposal::DesignBackend, store::ProjectStore};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, LoginField};

pub fn draw<S, B>(f: &mut Frame, area: Rect, app: &App<S, B>)
where
  S: ProjectStore + 'static,
  B: DesignBackend + 'static,
{
  let [column] = Layout::horizontal([Constraint::Length(52)])
    .flex(Flex::Center)
    .areas(area);
  let [form] = Layout::vertical([Constraint::Length(11)])
    .flex(Flex::Center)
    .areas(column);

  let block = Block::default()
    .title(" Prestige ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Yellow));
  let inner = block.inner(form);
  f.render_widget(block, form);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(3); 3])
    .split(inner);

  for (field, row) in LoginField::ALL.iter().zip(rows.iter()) {
    let focused = app.login.focused() == *field;
    let value = app.login.value(*field);
    let shown = match field {
      LoginField::Password => "•".repeat(value.chars().count()),
      _ => value.to_owned(),
    };
    let cursor = if focused { "_" } else { "" };

    let label_style = if focused {
      Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::DarkGray)
    };
    let lines = vec![
      Line::from(Span::styled(field.label(), label_style)),
      Line::from(format!(" {shown}{cursor}")),
    ];
    f.render_widget(Paragraph::new(lines), *row);
  }
}
