//! [`Workflow`], the generator state machine.
//!
//! ```text
//! Input ──submit──▶ Review ──select──▶ Edit ──save──▶ finished
//!   ▲                 │  ▲               │
//!   └──────back───────┘  └─────back──────┘   (new projects only)
//!                                        │
//!                               open_print_preview ⇄ close_print_preview
//! ```

use std::{path::Path, sync::Arc};

use prestige_core::{
  model::{
    AccentShape, ContactField, ContactInfo, FontFamily, LayoutKind, Project, Theme, ThemeField,
    User, logo_media_type,
  },
  presets::IndustryPreset,
  proposal::{DesignBackend, LOAD_MORE_STYLE_HINT, Proposal, ProposalService},
  store::ProjectStore,
};
use tokio::{sync::oneshot, task::JoinHandle};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
  Error, Result,
  export::{CardExporter, ExportJob, ExportTarget},
  print::{PrintEvent, PrintJob},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
  Input,
  Review,
  Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  New,
  /// Editing a saved project; there is no candidate list to go back to.
  Existing(Uuid),
}

/// Result of [`Workflow::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
  Created(Project),
  Updated(Project),
  /// The project being edited no longer exists.
  NothingToDo,
}

/// A finished generation request, as reported by [`Workflow::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalEvent {
  Candidates { added: usize, fallback: bool },
  Bio { fallback: bool },
  /// The request task died without answering.
  Lost,
}

enum Answer {
  Themes { append: bool, proposal: Proposal<Vec<Theme>> },
  Bio(Proposal<String>),
}

/// An outstanding generation request.
struct Pending {
  task:   JoinHandle<()>,
  answer: oneshot::Receiver<Answer>,
}

impl Drop for Pending {
  fn drop(&mut self) { self.task.abort(); }
}

pub struct Workflow<S, B> {
  store:     Arc<S>,
  proposals: Arc<ProposalService<B>>,
  viewer:    User,
  mode:      Mode,
  step:      Step,

  info:       ContactInfo,
  theme:      Option<Theme>,
  candidates: Vec<Theme>,
  templates:  Vec<Theme>,

  pending:       Option<Pending>,
  last_fallback: bool,

  print_preview: bool,
  print_job:     Option<PrintJob>,

  outcome: Option<SaveOutcome>,
}

impl<S, B> Workflow<S, B>
where
  S: ProjectStore + 'static,
  B: DesignBackend + 'static,
{
  /// A blank workflow at the content form.
  pub fn new(store: Arc<S>, proposals: Arc<ProposalService<B>>, viewer: User) -> Self {
    Self {
      store,
      proposals,
      viewer,
      mode: Mode::New,
      step: Step::Input,
      info: ContactInfo::default(),
      theme: None,
      candidates: Vec::new(),
      templates: Vec::new(),
      pending: None,
      last_fallback: false,
      print_preview: false,
      print_job: None,
      outcome: None,
    }
  }

  /// Open a saved project straight in the editor.
  pub fn edit(
    store: Arc<S>,
    proposals: Arc<ProposalService<B>>,
    viewer: User,
    project: Project,
  ) -> Self {
    Self {
      mode: Mode::Existing(project.id),
      step: Step::Edit,
      info: project.info,
      theme: Some(project.theme),
      ..Self::new(store, proposals, viewer)
    }
  }

  // ── Accessors ─────────────────────────────────────────────────────────────

  pub fn step(&self) -> Step { self.step }

  pub fn mode(&self) -> Mode { self.mode }

  pub fn viewer(&self) -> &User { &self.viewer }

  pub fn info(&self) -> &ContactInfo { &self.info }

  /// The theme being edited. `Some` whenever the step is [`Step::Edit`].
  pub fn theme(&self) -> Option<&Theme> { self.theme.as_ref() }

  pub fn candidates(&self) -> &[Theme] { &self.candidates }

  pub fn templates(&self) -> &[Theme] { &self.templates }

  pub fn is_busy(&self) -> bool { self.pending.is_some() }

  /// Whether the last completed theme batch was the fixed fallback set.
  pub fn last_batch_was_fallback(&self) -> bool { self.last_fallback }

  pub fn in_print_preview(&self) -> bool { self.print_preview }

  pub fn print_job(&self) -> Option<&PrintJob> { self.print_job.as_ref() }

  /// Set once [`save`](Self::save) has run; the embedding application
  /// should leave the generator.
  pub fn outcome(&self) -> Option<&SaveOutcome> { self.outcome.as_ref() }

  pub fn is_finished(&self) -> bool { self.outcome.is_some() }

  fn require(&self, op: &'static str, allowed: &[Step]) -> Result<()> {
    if allowed.contains(&self.step) {
      Ok(())
    } else {
      Err(Error::InvalidStep { op, step: self.step })
    }
  }

  fn edited_theme(&mut self, op: &'static str) -> Result<&mut Theme> {
    self.require(op, &[Step::Edit])?;
    let step = self.step;
    self.theme.as_mut().ok_or(Error::InvalidStep { op, step })
  }

  // ── Content ───────────────────────────────────────────────────────────────

  pub fn set_field(&mut self, field: ContactField, value: impl Into<String>) -> Result<()> {
    self.require("set_field", &[Step::Input, Step::Edit])?;
    field.set(&mut self.info, value);
    Ok(())
  }

  pub fn apply_preset(&mut self, preset: &IndustryPreset) -> Result<()> {
    self.require("apply_preset", &[Step::Input])?;
    preset.apply(&mut self.info);
    Ok(())
  }

  // ── Generation ────────────────────────────────────────────────────────────

  fn spawn<F>(&mut self, work: F)
  where
    F: std::future::Future<Output = Answer> + Send + 'static,
  {
    let (tx, answer) = oneshot::channel();
    let task = tokio::spawn(async move {
      let _ = tx.send(work.await);
    });
    self.pending = Some(Pending { task, answer });
  }

  fn request_themes(&mut self, hint: Option<&'static str>, append: bool) {
    let proposals = Arc::clone(&self.proposals);
    let info = self.info.clone();
    self.spawn(async move {
      let proposal = proposals.propose_themes(&info, hint).await;
      Answer::Themes { append, proposal }
    });
  }

  /// Validate the content and request a fresh batch of candidates. The step
  /// moves to [`Step::Review`] when the answer arrives.
  pub fn submit(&mut self) -> Result<()> {
    self.require("submit", &[Step::Input])?;
    if self.is_busy() {
      return Err(Error::Busy);
    }
    self.info.validate_for_generation()?;
    info!(company = %self.info.company_name, "requesting theme candidates");
    self.request_themes(None, false);
    Ok(())
  }

  /// Request more candidates in a different aesthetic; they are appended.
  pub fn load_more(&mut self) -> Result<()> {
    self.require("load_more", &[Step::Review])?;
    if self.is_busy() {
      return Err(Error::Busy);
    }
    self.request_themes(Some(LOAD_MORE_STYLE_HINT), true);
    Ok(())
  }

  /// Validate name and industry, then ask for a biography.
  pub fn request_bio(&mut self) -> Result<()> {
    self.require("request_bio", &[Step::Input, Step::Edit])?;
    if self.is_busy() {
      return Err(Error::Busy);
    }
    self.info.validate_for_bio()?;
    let proposals = Arc::clone(&self.proposals);
    let info = self.info.clone();
    self.spawn(async move { Answer::Bio(proposals.propose_bio(&info).await) });
    Ok(())
  }

  fn apply(&mut self, answer: Answer) -> ProposalEvent {
    match answer {
      Answer::Themes { append, proposal } => {
        let fallback = proposal.is_fallback();
        let themes = proposal.into_inner();
        let added = themes.len();
        if append {
          self.candidates.extend(themes);
        } else {
          self.candidates = themes;
        }
        self.last_fallback = fallback;
        if self.step == Step::Input {
          self.step = Step::Review;
        }
        debug!(added, total = self.candidates.len(), fallback, "candidates updated");
        ProposalEvent::Candidates { added, fallback }
      }
      Answer::Bio(proposal) => {
        let fallback = proposal.is_fallback();
        self.info.bio = Some(proposal.into_inner());
        ProposalEvent::Bio { fallback }
      }
    }
  }

  /// Apply a finished request, if there is one. Never waits.
  pub fn poll(&mut self) -> Option<ProposalEvent> {
    let pending = self.pending.as_mut()?;
    match pending.answer.try_recv() {
      Ok(answer) => {
        self.pending = None;
        Some(self.apply(answer))
      }
      Err(oneshot::error::TryRecvError::Empty) => None,
      Err(oneshot::error::TryRecvError::Closed) => {
        self.pending = None;
        Some(ProposalEvent::Lost)
      }
    }
  }

  /// Wait for the outstanding request and apply it.
  pub async fn settle(&mut self) -> Option<ProposalEvent> {
    let pending = self.pending.as_mut()?;
    let answer = (&mut pending.answer).await;
    self.pending = None;
    Some(match answer {
      Ok(answer) => self.apply(answer),
      Err(_) => ProposalEvent::Lost,
    })
  }

  // ── Review ────────────────────────────────────────────────────────────────

  /// Load the shared template list.
  pub async fn refresh_templates(&mut self) -> Result<()> {
    self.templates = self.store.list_templates().await.map_err(Error::store)?;
    Ok(())
  }

  /// Make a candidate the live theme and start editing it.
  pub fn select(&mut self, id: Uuid) -> Result<()> {
    self.require("select", &[Step::Review])?;
    let theme = self
      .candidates
      .iter()
      .find(|t| t.id == id)
      .cloned()
      .ok_or(Error::UnknownTheme(id))?;
    self.theme = Some(theme);
    self.step = Step::Edit;
    Ok(())
  }

  /// Start editing from a saved template.
  pub fn select_template(&mut self, id: Uuid) -> Result<()> {
    self.require("select_template", &[Step::Review])?;
    let theme = self
      .templates
      .iter()
      .find(|t| t.id == id)
      .cloned()
      .ok_or(Error::UnknownTheme(id))?;
    self.theme = Some(theme);
    self.step = Step::Edit;
    Ok(())
  }

  pub async fn delete_template(&mut self, id: Uuid) -> Result<()> {
    self.require("delete_template", &[Step::Review])?;
    self.store.delete_template(id).await.map_err(Error::store)?;
    self.templates.retain(|t| t.id != id);
    Ok(())
  }

  /// Review → Input, or Edit → Review for new projects. Candidates are kept.
  pub fn back(&mut self) -> Result<()> {
    match (self.step, self.mode) {
      (Step::Review, _) => {
        self.pending = None;
        self.step = Step::Input;
      }
      (Step::Edit, Mode::Existing(_)) => return Err(Error::NoWayBack),
      (Step::Edit, Mode::New) => {
        self.close_print_preview();
        self.step = Step::Review;
      }
      (Step::Input, _) => return Err(Error::InvalidStep { op: "back", step: Step::Input }),
    }
    Ok(())
  }

  // ── Edit ──────────────────────────────────────────────────────────────────

  pub fn set_theme_field(&mut self, field: ThemeField, value: impl Into<String>) -> Result<()> {
    field.set(self.edited_theme("set_theme_field")?, value);
    Ok(())
  }

  pub fn set_layout(&mut self, layout: LayoutKind) -> Result<()> {
    self.edited_theme("set_layout")?.layout = layout;
    Ok(())
  }

  pub fn set_font(&mut self, font: FontFamily) -> Result<()> {
    self.edited_theme("set_font")?.font = font;
    Ok(())
  }

  pub fn set_accent(&mut self, accent: AccentShape) -> Result<()> {
    self.edited_theme("set_accent")?.accent = accent;
    Ok(())
  }

  /// Embed a local image as the logo. Any size, any type.
  pub async fn attach_logo(&mut self, path: &Path) -> Result<()> {
    self.edited_theme("attach_logo")?;
    let bytes = tokio::fs::read(path).await?;
    let media_type = logo_media_type(
      path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default(),
    );
    let theme = self.edited_theme("attach_logo")?;
    theme.set_logo_bytes(media_type, &bytes);
    debug!(path = %path.display(), len = bytes.len(), "logo attached");
    Ok(())
  }

  pub fn clear_logo(&mut self) -> Result<()> {
    self.edited_theme("clear_logo")?.clear_logo();
    Ok(())
  }

  /// Store a copy of the live theme as a shared template.
  pub async fn save_as_template(&mut self) -> Result<Theme> {
    let template = self.edited_theme("save_as_template")?.as_template();
    let saved = self
      .store
      .save_template(template, Some(self.viewer.email.clone()))
      .await
      .map_err(Error::store)?;
    self.templates.insert(0, saved.clone());
    Ok(saved)
  }

  /// Persist the project and finish. A vanished project is not an error.
  pub async fn save(&mut self) -> Result<SaveOutcome> {
    let theme = self.edited_theme("save")?.clone();
    let info = self.info.clone();
    let outcome = match self.mode {
      Mode::New => {
        let owner = Some(self.viewer.email.clone());
        let project = self
          .store
          .save_project(info, theme, owner)
          .await
          .map_err(Error::store)?;
        info!(id = %project.id, "project created");
        SaveOutcome::Created(project)
      }
      Mode::Existing(id) => {
        match self
          .store
          .update_project(id, info, theme)
          .await
          .map_err(Error::store)?
        {
          Some(project) => {
            info!(%id, "project updated");
            SaveOutcome::Updated(project)
          }
          None => {
            info!(%id, "project no longer exists; nothing to update");
            SaveOutcome::NothingToDo
          }
        }
      }
    };
    self.close_print_preview();
    self.outcome = Some(outcome.clone());
    Ok(outcome)
  }

  // ── Export and print ──────────────────────────────────────────────────────

  fn export_job(&self, op: &'static str, target: ExportTarget) -> Result<ExportJob> {
    self.require(op, &[Step::Edit])?;
    let theme = self
      .theme
      .clone()
      .ok_or(Error::InvalidStep { op, step: self.step })?;
    Ok(ExportJob::new(target, self.info.clone(), theme))
  }

  /// Write the card or sheet through `exporter`. State is left unchanged.
  pub async fn export<E: CardExporter>(
    &self,
    exporter: &E,
    target: ExportTarget,
  ) -> Result<std::path::PathBuf> {
    let job = self.export_job("export", target)?;
    exporter.export(job).await.map_err(Error::export)
  }

  pub fn open_print_preview(&mut self) -> Result<()> {
    self.edited_theme("open_print_preview")?;
    self.print_preview = true;
    Ok(())
  }

  /// Leave the preview. A running countdown is cancelled.
  pub fn close_print_preview(&mut self) {
    if self.print_job.take().is_some() {
      info!("print countdown cancelled");
    }
    self.print_preview = false;
  }

  /// Start the countdown; the sheet goes to `exporter` when it ends.
  /// Restarting replaces a running countdown.
  pub fn print<E: CardExporter + 'static>(&mut self, exporter: Arc<E>) -> Result<()> {
    if !self.print_preview {
      return Err(Error::InvalidStep { op: "print", step: self.step });
    }
    let job = self.export_job("print", ExportTarget::PrintSheet)?;
    self.print_job = Some(PrintJob::start(exporter, job));
    Ok(())
  }

  /// Next countdown event without waiting. The job is dropped after its
  /// final event.
  pub fn poll_print(&mut self) -> Option<PrintEvent> {
    let event = self.print_job.as_mut()?.try_next()?;
    if event.is_final() {
      self.print_job = None;
    }
    Some(event)
  }

  /// Wait for the next countdown event.
  pub async fn next_print_event(&mut self) -> Option<PrintEvent> {
    let event = self.print_job.as_mut()?.next().await;
    if event.as_ref().is_none_or(PrintEvent::is_final) {
      self.print_job = None;
    }
    event
  }
}
