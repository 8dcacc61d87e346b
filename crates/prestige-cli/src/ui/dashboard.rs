//! Saved projects: list on the left, live preview on the right.

use prestige_core::{proposal::DesignBackend, render::RenderOptions, store::ProjectStore};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::card;
use crate::app::{App, owner_label};

pub fn draw<S, B>(f: &mut Frame, area: Rect, app: &App<S, B>)
where
  S: ProjectStore + 'static,
  B: DesignBackend + 'static,
{
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
    .split(area);

  draw_list(f, cols[0], app);
  draw_preview(f, cols[1], app);
}

fn draw_list<S, B>(f: &mut Frame, area: Rect, app: &App<S, B>)
where
  S: ProjectStore + 'static,
  B: DesignBackend + 'static,
{
  let filtered = app.filtered_projects();
  let total = app.projects.len();
  let is_admin = app.user.as_ref().is_some_and(|u| u.is_admin);
  let heading = if is_admin { "All projects" } else { "My projects" };

  let title = if app.filter_active || !app.filter.is_empty() {
    format!(" {heading} ({}/{}) ", filtered.len(), total)
  } else {
    format!(" {heading} ({total}) ")
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let items: Vec<ListItem> = filtered
    .iter()
    .map(|project| {
      let company = if project.info.company_name.is_empty() {
        "(no company)"
      } else {
        project.info.company_name.as_str()
      };
      let mut spans = vec![
        Span::styled(
          company.to_owned(),
          Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
          format!("  {}", project.info.full_name),
          Style::default().fg(Color::Gray),
        ),
        Span::styled(
          format!("  {}", project.theme.name),
          Style::default().fg(Color::DarkGray),
        ),
      ];
      if is_admin {
        spans.push(Span::styled(
          format!("  [{}]", owner_label(project)),
          Style::default().fg(Color::Magenta),
        ));
      }
      ListItem::new(Line::from(spans))
    })
    .collect();

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  if (app.filter_active || !app.filter.is_empty()) && inner_area.height > 2 {
    let filter_area = Rect {
      y: inner_area.y + inner_area.height - 1,
      height: 1,
      ..inner_area
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let filter_text = if app.filter_active {
      format!("/{}_", app.filter)
    } else {
      format!("/{}", app.filter)
    };
    f.render_widget(
      Paragraph::new(filter_text).style(Style::default().fg(Color::Yellow)),
      filter_area,
    );
  }

  if filtered.is_empty() {
    let hint = if app.projects.is_empty() {
      "No saved cards yet. Press n to design one."
    } else {
      "Nothing matches the filter."
    };
    f.render_widget(
      Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
      inner_area,
    );
    return;
  }

  let mut state = ListState::default();
  state.select(Some(app.list_cursor));

  f.render_stateful_widget(
    List::new(items)
      .highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol(""),
    inner_area,
    &mut state,
  );
}

fn draw_preview<S, B>(f: &mut Frame, area: Rect, app: &App<S, B>)
where
  S: ProjectStore + 'static,
  B: DesignBackend + 'static,
{
  let block = Block::default()
    .title(" Preview ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let Some(project) = app.cursor_project() else {
    return;
  };
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Max(16), Constraint::Length(2), Constraint::Min(0)])
    .split(inner);

  card::draw(f, rows[0], &project.info, &project.theme, RenderOptions::default());

  let saved = project.created_at.format("%Y-%m-%d %H:%M").to_string();
  let meta = Line::from(vec![
    Span::styled(format!(" {}", project.theme.name), Style::default().fg(Color::Cyan)),
    Span::styled(
      format!("  {}  saved {saved}", project.theme.layout),
      Style::default().fg(Color::DarkGray),
    ),
  ]);
  f.render_widget(Paragraph::new(meta), rows[1]);
}
