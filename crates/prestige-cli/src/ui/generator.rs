//! Generator screens: the contact form, the design review list, the editor
//! and the print preview.

use prestige_core::{
  color::Rgb,
  model::{ContactField, ContactInfo, Theme},
  presets::INDUSTRY_PRESETS,
  proposal::DesignBackend,
  render::{PrintSheet, RenderOptions},
  store::ProjectStore,
};
use prestige_workflow::{PrintEvent, Step};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use strum::IntoEnumIterator;

use super::card;
use crate::{
  app::App,
  generator::{EditRow, EditTarget, GeneratorView, ReviewItem},
};

fn cursor_style() -> Style {
  Style::default()
    .bg(Color::Blue)
    .fg(Color::White)
    .add_modifier(Modifier::BOLD)
}

fn panel(title: &str) -> Block<'_> {
  Block::default()
    .title(format!(" {title} "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray))
}

pub fn draw<S, B>(f: &mut Frame, area: Rect, app: &App<S, B>)
where
  S: ProjectStore + 'static,
  B: DesignBackend + 'static,
{
  let Some(view) = &app.generator else { return };

  if view.workflow.in_print_preview() {
    draw_print_preview(f, area, view);
    return;
  }

  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
    .split(area);

  match view.workflow.step() {
    Step::Input => draw_form(f, cols[0], view),
    Step::Review => draw_review(f, cols[0], view),
    Step::Edit => draw_editor(f, cols[0], view),
  }
  draw_preview(f, cols[1], view);
}

/// Value shown for a row, swapped for the edit buffer while typing into it.
fn shown_value<S, B>(view: &GeneratorView<S, B>, target: EditTarget, value: &str) -> String {
  match &view.editing {
    Some(editing) if editing.target == target => format!("{}_", editing.buffer),
    _ => value.to_owned(),
  }
}

fn field_line(label: &str, value: String, required: bool) -> Line<'static> {
  let marker = if required { "*" } else { " " };
  Line::from(vec![
    Span::styled(format!("{marker}{label:<14}"), Style::default().fg(Color::Gray)),
    Span::raw(value),
  ])
}

// ── Input ──

fn draw_form<S, B>(f: &mut Frame, area: Rect, view: &GeneratorView<S, B>)
where
  S: ProjectStore + 'static,
  B: DesignBackend + 'static,
{
  let block = panel("Your details");
  let inner = block.inner(area);
  f.render_widget(block, area);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Min(0), Constraint::Length(2)])
    .split(inner);

  let info = view.workflow.info();
  let items: Vec<ListItem> = ContactField::iter()
    .map(|field| {
      let value = shown_value(view, EditTarget::Contact(field), field.get(info));
      let required = ContactInfo::REQUIRED_FOR_GENERATION.contains(&field);
      ListItem::new(field_line(field.label(), value, required))
    })
    .collect();

  let mut state = ListState::default();
  state.select(Some(view.cursor));
  f.render_stateful_widget(
    List::new(items).highlight_style(cursor_style()),
    rows[0],
    &mut state,
  );

  let preset = INDUSTRY_PRESETS
    .iter()
    .find(|p| p.is_selected(info))
    .map_or("none", |p| p.label);
  let mut footer = vec![Line::from(vec![
    Span::styled("Preset: ", Style::default().fg(Color::DarkGray)),
    Span::styled(preset, Style::default().fg(Color::Yellow)),
  ])];
  if view.workflow.is_busy() {
    footer.push(Line::from(Span::styled(
      "Working…",
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::ITALIC),
    )));
  }
  f.render_widget(Paragraph::new(footer), rows[1]);
}

// ── Review ──

fn theme_line(theme: &Theme) -> Line<'static> {
  Line::from(vec![
    Span::styled("■ ", Style::default().fg(swatch(&theme.primary_color))),
    Span::raw(theme.name.clone()),
    Span::styled(
      format!("  {} · {}", theme.layout, theme.font.label()),
      Style::default().fg(Color::DarkGray),
    ),
  ])
}

fn swatch(hex: &str) -> Color {
  Rgb::parse_hex(hex).map_or(Color::Gray, card::color)
}

fn draw_review<S, B>(f: &mut Frame, area: Rect, view: &GeneratorView<S, B>)
where
  S: ProjectStore + 'static,
  B: DesignBackend + 'static,
{
  let title = if view.workflow.last_batch_was_fallback() {
    "Designs (standard set)"
  } else {
    "Designs"
  };
  let block = panel(title);
  let inner = block.inner(area);
  f.render_widget(block, area);

  let items = view.review_items();
  let candidates = view.workflow.candidates().len();

  // The "Templates" heading is not selectable, so list rows and cursor
  // positions diverge after the candidates.
  let mut list: Vec<ListItem> = Vec::with_capacity(items.len() + 1);
  for (i, item) in items.iter().enumerate() {
    if i == candidates {
      list.push(ListItem::new(Line::from(Span::styled(
        "── Templates ──",
        Style::default().fg(Color::Yellow),
      ))));
    }
    list.push(ListItem::new(theme_line(item.theme())));
  }
  if view.workflow.is_busy() {
    list.push(ListItem::new(Line::from(Span::styled(
      "Generating…",
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::ITALIC),
    ))));
  }

  let selected = match items.get(view.cursor) {
    Some(ReviewItem::Template(_)) => view.cursor + 1,
    Some(ReviewItem::Candidate(_)) => view.cursor,
    None => 0,
  };
  let mut state = ListState::default();
  state.select((!items.is_empty()).then_some(selected));
  f.render_stateful_widget(List::new(list).highlight_style(cursor_style()), inner, &mut state);
}

// ── Edit ──

fn draw_editor<S, B>(f: &mut Frame, area: Rect, view: &GeneratorView<S, B>)
where
  S: ProjectStore + 'static,
  B: DesignBackend + 'static,
{
  let block = panel("Customise");
  let inner = block.inner(area);
  f.render_widget(block, area);

  let Some(theme) = view.workflow.theme() else { return };
  let info = view.workflow.info();

  let items: Vec<ListItem> = EditRow::all()
    .into_iter()
    .map(|row| {
      let line = match row {
        EditRow::Theme(field) => {
          let value = shown_value(view, EditTarget::Theme(field), field.get(theme));
          let mut line = field_line(field.label(), value, false);
          if field.is_color() {
            line.spans.push(Span::styled(" ■", Style::default().fg(swatch(field.get(theme)))));
          }
          line
        }
        EditRow::Layout => field_line("Layout", format!("◂ {} ▸", theme.layout), false),
        EditRow::Font => field_line("Font", format!("◂ {} ▸", theme.font.label()), false),
        EditRow::Accent => field_line("Accent", format!("◂ {} ▸", theme.accent), false),
        EditRow::Logo => {
          let current = if theme.logo_url.is_some() { "attached (x removes)" } else { "none" };
          field_line("Logo", shown_value(view, EditTarget::LogoPath, current), false)
        }
        EditRow::Contact(field) => {
          let value = shown_value(view, EditTarget::Contact(field), field.get(info));
          field_line(field.label(), value, false)
        }
      };
      ListItem::new(line)
    })
    .collect();

  let mut state = ListState::default();
  state.select(Some(view.cursor));
  f.render_stateful_widget(List::new(items).highlight_style(cursor_style()), inner, &mut state);
}

// ── Preview ──

fn draw_preview<S, B>(f: &mut Frame, area: Rect, view: &GeneratorView<S, B>)
where
  S: ProjectStore + 'static,
  B: DesignBackend + 'static,
{
  let block = panel("Preview");
  let inner = block.inner(area);
  f.render_widget(block, area);

  let Some(theme) = view.preview_theme() else {
    let hint = if view.workflow.is_busy() {
      "Designing your card…"
    } else {
      "Fill in the starred fields and press g to generate designs."
    };
    f.render_widget(
      Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  };

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Max(16), Constraint::Min(0)])
    .split(inner);
  let options = match view.workflow.step() {
    Step::Edit => RenderOptions::interactive(view.expanded),
    _ => RenderOptions::default(),
  };
  card::draw(f, rows[0], view.workflow.info(), theme, options);

  if !theme.slogan.is_empty() {
    f.render_widget(
      Paragraph::new(Line::from(Span::styled(
        format!(" “{}”", theme.slogan),
        Style::default()
          .fg(Color::Gray)
          .add_modifier(Modifier::ITALIC),
      ))),
      rows[1],
    );
  }
}

// ── Print ──

fn draw_print_preview<S, B>(f: &mut Frame, area: Rect, view: &GeneratorView<S, B>)
where
  S: ProjectStore + 'static,
  B: DesignBackend + 'static,
{
  let block = Block::default()
    .title(" Print preview ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Yellow));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Max(16), Constraint::Length(3), Constraint::Min(0)])
    .split(inner);

  if let Some(theme) = view.workflow.theme() {
    card::draw(f, rows[0], view.workflow.info(), theme, RenderOptions::print());
  }

  let capacity = PrintSheet::A4.capacity();
  let state = match view.workflow.print_job().and_then(|job| job.last()) {
    Some(PrintEvent::Tick(left)) => Span::styled(
      format!("Printing in {left}…  Esc cancels"),
      Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD),
    ),
    Some(PrintEvent::Printed(path)) => Span::styled(
      format!("Sent {}", path.display()),
      Style::default().fg(Color::Green),
    ),
    Some(PrintEvent::Failed(error)) => {
      Span::styled(format!("Failed: {error}"), Style::default().fg(Color::Red))
    }
    None if view.workflow.print_job().is_some() => Span::raw("Preparing…"),
    None => Span::styled("Press Enter to print", Style::default().fg(Color::DarkGray)),
  };
  let lines = vec![
    Line::from(Span::styled(
      format!(" A4 sheet, {capacity} cards"),
      Style::default().fg(Color::Gray),
    )),
    Line::from(vec![Span::raw(" "), state]),
  ];
  f.render_widget(Paragraph::new(lines), rows[1]);
}
