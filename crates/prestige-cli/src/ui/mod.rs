//! TUI rendering: header, the active screen, status bar.

pub mod card;
pub mod dashboard;
pub mod generator;
pub mod login;

use chrono::Local;
use prestige_core::{proposal::DesignBackend, store::ProjectStore};
use prestige_workflow::Step;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<S, B>(f: &mut Frame, app: &App<S, B>)
where
  S: ProjectStore + 'static,
  B: DesignBackend + 'static,
{
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0], app);
  match app.screen {
    Screen::Login => login::draw(f, rows[1], app),
    Screen::Dashboard => dashboard::draw(f, rows[1], app),
    Screen::Generator => generator::draw(f, rows[1], app),
  }
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header<S, B>(f: &mut Frame, area: Rect, app: &App<S, B>) {
  let date = Local::now().format("%Y-%m-%d").to_string();
  let who = match &app.user {
    Some(user) if user.is_admin => format!("  {} (admin)", user.name),
    Some(user) => format!("  {}", user.name),
    None => String::new(),
  };

  let left = Span::styled(
    format!(" prestige{who}"),
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::Gray));

  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);
  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn mode_and_hints<S, B>(app: &App<S, B>) -> (&'static str, &'static str)
where
  S: ProjectStore + 'static,
  B: DesignBackend + 'static,
{
  match app.screen {
    Screen::Login => ("LOGIN", "Tab next field  Enter log in  Esc quit"),
    Screen::Dashboard if app.confirm_delete.is_some() => ("CONFIRM", "y delete  any key cancel"),
    Screen::Dashboard if app.filter_active => ("SEARCH", "Type to filter  Esc clear  Enter done"),
    Screen::Dashboard => (
      "PROJECTS",
      "↑↓/jk move  n new  Enter edit  d delete  / search  r reload  L log out  q quit",
    ),
    Screen::Generator => {
      let Some(view) = &app.generator else {
        return ("GENERATOR", "");
      };
      if view.editing.is_some() {
        ("TYPING", "Enter save  Esc cancel")
      } else if view.workflow.in_print_preview() {
        ("PRINT", "Enter print  Esc close")
      } else {
        match view.workflow.step() {
          Step::Input => ("FORM", "↑↓ move  Enter edit  p preset  b bio  g generate  Esc leave"),
          Step::Review => ("REVIEW", "↑↓ move  Enter choose  m more  d delete template  Esc back"),
          Step::Edit => (
            "EDIT",
            "Enter edit  ←→ change  Space bio  t template  c card  a sheet  p print  s save  Esc back",
          ),
        }
      }
    }
  }
}

fn draw_status<S, B>(f: &mut Frame, area: Rect, app: &App<S, B>)
where
  S: ProjectStore + 'static,
  B: DesignBackend + 'static,
{
  let (mode_label, hints) = mode_and_hints(app);
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
  let hint_span = Span::styled(format!("  {status}"), Style::default().fg(Color::DarkGray));

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, hint_span])).style(Style::default().bg(Color::Black)),
    area,
  );
}
