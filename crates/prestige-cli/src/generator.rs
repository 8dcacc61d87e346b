//! Key handling for the generator screens. Wraps a [`Workflow`] with the
//! cursor and text-input state the terminal needs.

use std::{path::PathBuf, sync::Arc};

use crossterm::event::{KeyCode, KeyEvent};
use prestige_core::{
  model::{AccentShape, ContactField, FontFamily, LayoutKind, Theme, ThemeField},
  presets::INDUSTRY_PRESETS,
  proposal::DesignBackend,
  store::ProjectStore,
};
use prestige_workflow::{
  ExportTarget, Mode, PrintEvent, ProposalEvent, SaveOutcome, Step, Workflow,
};
use strum::IntoEnumIterator;

use crate::{config::expand_tilde, export::SvgExporter};

// ─── Rows and targets ─────────────────────────────────────────────────────────

/// A line of the editor's field list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditRow {
  Theme(ThemeField),
  Layout,
  Font,
  Accent,
  Logo,
  Contact(ContactField),
}

impl EditRow {
  pub fn all() -> Vec<EditRow> {
    let mut rows: Vec<EditRow> = ThemeField::iter().map(EditRow::Theme).collect();
    rows.extend([EditRow::Layout, EditRow::Font, EditRow::Accent, EditRow::Logo]);
    rows.extend(ContactField::iter().map(EditRow::Contact));
    rows
  }
}

/// Where typed text goes when it is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
  Contact(ContactField),
  Theme(ThemeField),
  LogoPath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editing {
  pub target: EditTarget,
  pub buffer: String,
}

/// One entry of the review list.
#[derive(Debug, Clone, Copy)]
pub enum ReviewItem<'a> {
  Candidate(&'a Theme),
  Template(&'a Theme),
}

impl<'a> ReviewItem<'a> {
  pub fn theme(self) -> &'a Theme {
    match self {
      Self::Candidate(t) | Self::Template(t) => t,
    }
  }
}

/// What the application should do after a key.
#[derive(Debug)]
pub enum Action {
  None,
  Status(String),
  /// Leave the generator without saving.
  Leave,
  Saved(SaveOutcome),
}

fn cycle<T: IntoEnumIterator + PartialEq + Copy>(current: T, step: isize) -> T {
  let all: Vec<T> = T::iter().collect();
  let n = all.len() as isize;
  let at = all.iter().position(|v| *v == current).unwrap_or(0) as isize;
  all
    .get((at + step).rem_euclid(n.max(1)) as usize)
    .copied()
    .unwrap_or(current)
}

fn move_cursor(cursor: &mut usize, len: usize, up: bool) {
  if up {
    *cursor = cursor.saturating_sub(1);
  } else if *cursor + 1 < len {
    *cursor += 1;
  }
}

// ─── Status lines ─────────────────────────────────────────────────────────────

/// Status line for a finished generation request.
pub fn describe(event: ProposalEvent) -> String {
  match event {
    ProposalEvent::Candidates { fallback: true, .. } => {
      "Design service unavailable; showing the standard designs".into()
    }
    ProposalEvent::Candidates { added, .. } => format!("{added} new designs"),
    ProposalEvent::Bio { fallback: true } => "Design service unavailable; standard bio used".into(),
    ProposalEvent::Bio { fallback: false } => "Bio generated".into(),
    ProposalEvent::Lost => "Generation request was lost".into(),
  }
}

pub fn describe_print(event: &PrintEvent) -> String {
  match event {
    PrintEvent::Tick(left) => format!("Printing in {left}…  Esc cancels"),
    PrintEvent::Printed(path) => format!("Sheet sent to printer: {}", path.display()),
    PrintEvent::Failed(error) => format!("Print failed: {error}"),
  }
}

// ─── View ─────────────────────────────────────────────────────────────────────

pub struct GeneratorView<S, B> {
  pub workflow: Workflow<S, B>,
  /// Cursor in whichever list the current step shows.
  pub cursor:   usize,
  pub editing:  Option<Editing>,
  /// Biography toggle on the live preview.
  pub expanded: bool,
}

impl<S, B> GeneratorView<S, B>
where
  S: ProjectStore + 'static,
  B: DesignBackend + 'static,
{
  pub fn new(workflow: Workflow<S, B>) -> Self {
    Self { workflow, cursor: 0, editing: None, expanded: false }
  }

  pub fn review_items(&self) -> Vec<ReviewItem<'_>> {
    let candidates = self.workflow.candidates().iter().map(ReviewItem::Candidate);
    let templates = self.workflow.templates().iter().map(ReviewItem::Template);
    candidates.chain(templates).collect()
  }

  /// The theme to preview: the live one while editing, the highlighted one
  /// while reviewing.
  pub fn preview_theme(&self) -> Option<&Theme> {
    match self.workflow.step() {
      Step::Edit => self.workflow.theme(),
      Step::Review => self
        .review_items()
        .get(self.cursor)
        .copied()
        .map(ReviewItem::theme),
      Step::Input => None,
    }
  }

  fn list_len(&self) -> usize {
    match self.workflow.step() {
      Step::Input => ContactField::iter().count(),
      Step::Review => self.review_items().len(),
      Step::Edit => EditRow::all().len(),
    }
  }

  // ── Keys ──────────────────────────────────────────────────────────────────

  pub async fn handle_key(&mut self, key: KeyEvent, exporter: &Arc<SvgExporter>) -> Action {
    let result = if self.editing.is_some() {
      self.handle_text_key(key).await
    } else if self.workflow.in_print_preview() {
      self.handle_print_key(key, exporter)
    } else {
      match self.workflow.step() {
        Step::Input => self.handle_input_key(key),
        Step::Review => self.handle_review_key(key).await,
        Step::Edit => self.handle_edit_key(key, exporter).await,
      }
    };
    result.unwrap_or_else(|e| Action::Status(format!("Error: {e}")))
  }

  async fn handle_text_key(&mut self, key: KeyEvent) -> anyhow::Result<Action> {
    let Some(editing) = self.editing.as_mut() else {
      return Ok(Action::None);
    };
    match key.code {
      KeyCode::Esc => self.editing = None,
      KeyCode::Backspace => {
        editing.buffer.pop();
      }
      KeyCode::Char(c) => editing.buffer.push(c),
      KeyCode::Enter => {
        let Some(Editing { target, buffer }) = self.editing.take() else {
          return Ok(Action::None);
        };
        match target {
          EditTarget::Contact(field) => self.workflow.set_field(field, buffer.trim())?,
          EditTarget::Theme(field) => self.workflow.set_theme_field(field, buffer.trim())?,
          EditTarget::LogoPath => {
            let path = expand_tilde(&PathBuf::from(buffer.trim()));
            self.workflow.attach_logo(&path).await?;
            return Ok(Action::Status(format!("Logo attached from {}", path.display())));
          }
        }
      }
      _ => {}
    }
    Ok(Action::None)
  }

  fn begin_editing(&mut self, target: EditTarget) {
    let buffer = match target {
      EditTarget::Contact(field) => field.get(self.workflow.info()).to_owned(),
      EditTarget::Theme(field) => self
        .workflow
        .theme()
        .map(|t| field.get(t).to_owned())
        .unwrap_or_default(),
      EditTarget::LogoPath => String::new(),
    };
    self.editing = Some(Editing { target, buffer });
  }

  fn handle_input_key(&mut self, key: KeyEvent) -> anyhow::Result<Action> {
    let len = self.list_len();
    match key.code {
      KeyCode::Esc => return Ok(Action::Leave),
      KeyCode::Up | KeyCode::Char('k') => move_cursor(&mut self.cursor, len, true),
      KeyCode::Down | KeyCode::Char('j') => move_cursor(&mut self.cursor, len, false),
      KeyCode::Enter => {
        if let Some(field) = ContactField::iter().nth(self.cursor) {
          self.begin_editing(EditTarget::Contact(field));
        }
      }
      KeyCode::Char('p') => {
        let info = self.workflow.info();
        let next = INDUSTRY_PRESETS
          .iter()
          .position(|p| p.is_selected(info))
          .map_or(0, |i| (i + 1) % INDUSTRY_PRESETS.len());
        if let Some(preset) = INDUSTRY_PRESETS.get(next) {
          self.workflow.apply_preset(preset)?;
          return Ok(Action::Status(format!("Preset: {}", preset.label)));
        }
      }
      KeyCode::Char('b') => {
        self.workflow.request_bio()?;
        return Ok(Action::Status("Writing bio…".into()));
      }
      KeyCode::Char('g') => {
        self.workflow.submit()?;
        self.cursor = 0;
        return Ok(Action::Status("Generating designs…".into()));
      }
      _ => {}
    }
    Ok(Action::None)
  }

  async fn handle_review_key(&mut self, key: KeyEvent) -> anyhow::Result<Action> {
    let len = self.list_len();
    match key.code {
      KeyCode::Esc => {
        self.workflow.back()?;
        self.cursor = 0;
      }
      KeyCode::Up | KeyCode::Char('k') => move_cursor(&mut self.cursor, len, true),
      KeyCode::Down | KeyCode::Char('j') => move_cursor(&mut self.cursor, len, false),
      KeyCode::Enter => {
        let picked = self.review_items().get(self.cursor).copied().map(|item| match item {
          ReviewItem::Candidate(t) => (t.id, false),
          ReviewItem::Template(t) => (t.id, true),
        });
        match picked {
          Some((id, false)) => self.workflow.select(id)?,
          Some((id, true)) => self.workflow.select_template(id)?,
          None => return Ok(Action::None),
        }
        self.cursor = 0;
      }
      KeyCode::Char('m') => {
        self.workflow.load_more()?;
        return Ok(Action::Status("Loading more designs…".into()));
      }
      KeyCode::Char('d') => {
        let template = match self.review_items().get(self.cursor) {
          Some(ReviewItem::Template(t)) => Some(t.id),
          _ => None,
        };
        if let Some(id) = template {
          self.workflow.delete_template(id).await?;
          self.cursor = self.cursor.min(self.list_len().saturating_sub(1));
          return Ok(Action::Status("Template deleted".into()));
        }
      }
      _ => {}
    }
    Ok(Action::None)
  }

  fn cycle_row(&mut self, row: EditRow, step: isize) -> anyhow::Result<()> {
    let Some(theme) = self.workflow.theme() else { return Ok(()) };
    let (layout, font, accent) = (theme.layout, theme.font, theme.accent);
    match row {
      EditRow::Layout => self.workflow.set_layout(cycle::<LayoutKind>(layout, step))?,
      EditRow::Font => self.workflow.set_font(cycle::<FontFamily>(font, step))?,
      EditRow::Accent => self.workflow.set_accent(cycle::<AccentShape>(accent, step))?,
      _ => {}
    }
    Ok(())
  }

  async fn handle_edit_key(
    &mut self,
    key: KeyEvent,
    exporter: &Arc<SvgExporter>,
  ) -> anyhow::Result<Action> {
    let rows = EditRow::all();
    let row = rows.get(self.cursor).copied();
    match key.code {
      KeyCode::Esc => match self.workflow.mode() {
        Mode::Existing(_) => return Ok(Action::Leave),
        Mode::New => {
          self.workflow.back()?;
          self.cursor = 0;
        }
      },
      KeyCode::Up | KeyCode::Char('k') => move_cursor(&mut self.cursor, rows.len(), true),
      KeyCode::Down | KeyCode::Char('j') => move_cursor(&mut self.cursor, rows.len(), false),
      KeyCode::Left | KeyCode::Right => {
        if let Some(row) = row {
          self.cycle_row(row, if key.code == KeyCode::Left { -1 } else { 1 })?;
        }
      }
      KeyCode::Enter => match row {
        Some(EditRow::Theme(field)) => self.begin_editing(EditTarget::Theme(field)),
        Some(EditRow::Contact(field)) => self.begin_editing(EditTarget::Contact(field)),
        Some(EditRow::Logo) => self.begin_editing(EditTarget::LogoPath),
        Some(other) => self.cycle_row(other, 1)?,
        None => {}
      },
      KeyCode::Char(' ') => self.expanded = !self.expanded,
      KeyCode::Char('x') => {
        self.workflow.clear_logo()?;
        return Ok(Action::Status("Logo removed".into()));
      }
      KeyCode::Char('b') => {
        self.workflow.request_bio()?;
        return Ok(Action::Status("Writing bio…".into()));
      }
      KeyCode::Char('t') => {
        let template = self.workflow.save_as_template().await?;
        return Ok(Action::Status(format!("Saved template \"{}\"", template.name)));
      }
      KeyCode::Char('c') => {
        let path = self.workflow.export(exporter.as_ref(), ExportTarget::CardImage).await?;
        return Ok(Action::Status(format!("Card written to {}", path.display())));
      }
      KeyCode::Char('a') => {
        let path = self.workflow.export(exporter.as_ref(), ExportTarget::SheetDocument).await?;
        return Ok(Action::Status(format!("Sheet written to {}", path.display())));
      }
      KeyCode::Char('p') => {
        self.workflow.open_print_preview()?;
        return Ok(Action::Status("Print preview: Enter prints, Esc closes".into()));
      }
      KeyCode::Char('s') => return Ok(Action::Saved(self.workflow.save().await?)),
      _ => {}
    }
    Ok(Action::None)
  }

  fn handle_print_key(
    &mut self,
    key: KeyEvent,
    exporter: &Arc<SvgExporter>,
  ) -> anyhow::Result<Action> {
    match key.code {
      KeyCode::Esc => {
        let was_counting = self.workflow.print_job().is_some();
        self.workflow.close_print_preview();
        if was_counting {
          return Ok(Action::Status("Printing cancelled".into()));
        }
      }
      KeyCode::Enter | KeyCode::Char('p') => self.workflow.print(Arc::clone(exporter))?,
      _ => {}
    }
    Ok(Action::None)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cycling_wraps_both_ways() {
    assert_eq!(cycle(LayoutKind::Minimal, 1), LayoutKind::Bold);
    assert_eq!(cycle(LayoutKind::Minimal, -1), LayoutKind::Tech);
    assert_eq!(cycle(AccentShape::None, 1), AccentShape::Circle);
  }

  #[test]
  fn cursor_stays_in_bounds() {
    let mut cursor = 0;
    move_cursor(&mut cursor, 2, true);
    assert_eq!(cursor, 0);
    move_cursor(&mut cursor, 2, false);
    move_cursor(&mut cursor, 2, false);
    assert_eq!(cursor, 1);
  }

  #[test]
  fn editor_lists_every_field() {
    let rows = EditRow::all();
    assert_eq!(rows.len(), ThemeField::iter().count() + 4 + ContactField::iter().count());
    assert_eq!(rows[0], EditRow::Theme(ThemeField::Name));
  }
}
