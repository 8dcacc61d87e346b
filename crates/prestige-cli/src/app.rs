//! Application state machine and event dispatcher.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use prestige_core::{
  model::{Project, User},
  proposal::{DesignBackend, ProposalService},
  store::ProjectStore,
};
use prestige_workflow::{ProposalEvent, SaveOutcome, Workflow};
use tracing::info;
use uuid::Uuid;

use crate::{
  auth,
  config::AdminSettings,
  export::SvgExporter,
  generator::{self, Action, GeneratorView},
};

/// Shown instead of the owner of legacy projects.
pub const UNKNOWN_OWNER: &str = "Nieznany";

/// Owner shown to admins on the dashboard.
pub fn owner_label(project: &Project) -> &str { project.owner.as_deref().unwrap_or(UNKNOWN_OWNER) }

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  Login,
  /// Saved projects.
  Dashboard,
  Generator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
  Identifier,
  Name,
  Password,
}

impl LoginField {
  pub const ALL: [LoginField; 3] = [Self::Identifier, Self::Name, Self::Password];

  pub fn label(&self) -> &'static str {
    match self {
      Self::Identifier => "Email or login",
      Self::Name => "Name (optional)",
      Self::Password => "Password",
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
  pub identifier: String,
  pub name:       String,
  pub password:   String,
  pub focus:      usize,
}

impl LoginForm {
  pub fn focused(&self) -> LoginField { LoginField::ALL[self.focus % LoginField::ALL.len()] }

  pub fn value(&self, field: LoginField) -> &str {
    match field {
      LoginField::Identifier => &self.identifier,
      LoginField::Name => &self.name,
      LoginField::Password => &self.password,
    }
  }

  fn focused_mut(&mut self) -> &mut String {
    match self.focused() {
      LoginField::Identifier => &mut self.identifier,
      LoginField::Name => &mut self.name,
      LoginField::Password => &mut self.password,
    }
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<S, B> {
  pub screen: Screen,

  pub login: LoginForm,

  /// Set once the login form has been accepted.
  pub user: Option<User>,

  /// Projects visible to `user`, newest first.
  pub projects: Vec<Project>,

  /// Current fuzzy-filter string.
  pub filter: String,

  /// Whether the user is typing a filter query.
  pub filter_active: bool,

  /// Cursor position within the *filtered* project list.
  pub list_cursor: usize,

  /// Project awaiting delete confirmation.
  pub confirm_delete: Option<Uuid>,

  pub generator: Option<GeneratorView<S, B>>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  store:     Arc<S>,
  proposals: Arc<ProposalService<B>>,
  exporter:  Arc<SvgExporter>,
  admin:     AdminSettings,
}

impl<S, B> App<S, B>
where
  S: ProjectStore + 'static,
  B: DesignBackend + 'static,
{
  pub fn new(
    store: Arc<S>,
    proposals: Arc<ProposalService<B>>,
    exporter: Arc<SvgExporter>,
    admin: AdminSettings,
  ) -> Self {
    Self {
      screen: Screen::Login,
      login: LoginForm::default(),
      user: None,
      projects: Vec::new(),
      filter: String::new(),
      filter_active: false,
      list_cursor: 0,
      confirm_delete: None,
      generator: None,
      status_msg: String::new(),
      store,
      proposals,
      exporter,
      admin,
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Reload the dashboard list for the logged-in user.
  pub async fn load_projects(&mut self) -> anyhow::Result<()> {
    let Some(user) = &self.user else {
      self.projects.clear();
      return Ok(());
    };
    self.projects = self.store.list_projects(user).await?;
    let visible = self.filtered_projects().len();
    self.list_cursor = self.list_cursor.min(visible.saturating_sub(1));
    Ok(())
  }

  // ── Filtered list ─────────────────────────────────────────────────────────

  /// Projects that match the current filter query.
  pub fn filtered_projects(&self) -> Vec<&Project> {
    if self.filter.is_empty() {
      return self.projects.iter().collect();
    }
    let matcher = SkimMatcherV2::default();
    self
      .projects
      .iter()
      .filter(|p| {
        [
          p.info.company_name.as_str(),
          p.info.full_name.as_str(),
          p.theme.name.as_str(),
          p.owner.as_deref().unwrap_or_default(),
        ]
        .iter()
        .any(|text| matcher.fuzzy_match(text, &self.filter).is_some())
      })
      .collect()
  }

  pub fn cursor_project(&self) -> Option<&Project> {
    self.filtered_projects().get(self.list_cursor).copied()
  }

  // ── Per-frame work ────────────────────────────────────────────────────────

  /// Pick up finished background work. Called once per frame.
  pub async fn tick(&mut self) -> anyhow::Result<()> {
    let Some(view) = self.generator.as_mut() else {
      return Ok(());
    };
    if let Some(event) = view.workflow.poll() {
      if matches!(event, ProposalEvent::Candidates { .. }) {
        view.workflow.refresh_templates().await?;
      }
      self.status_msg = generator::describe(event);
    }
    if let Some(event) = view.workflow.poll_print() {
      self.status_msg = generator::describe_print(&event);
    }
    Ok(())
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    match self.screen {
      Screen::Login => self.handle_login_key(key).await,
      Screen::Dashboard if self.filter_active => self.handle_filter_key(key),
      Screen::Dashboard => self.handle_dashboard_key(key).await,
      Screen::Generator => self.handle_generator_key(key).await,
    }
  }

  async fn handle_login_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    let fields = LoginField::ALL.len();
    match key.code {
      KeyCode::Esc => return Ok(false),
      KeyCode::Tab | KeyCode::Down => self.login.focus = (self.login.focus + 1) % fields,
      KeyCode::BackTab | KeyCode::Up => {
        self.login.focus = (self.login.focus + fields - 1) % fields;
      }
      KeyCode::Backspace => {
        self.login.focused_mut().pop();
      }
      KeyCode::Char(c) => self.login.focused_mut().push(c),
      KeyCode::Enter => {
        let form = &self.login;
        match auth::login(&form.identifier, &form.name, &form.password, &self.admin) {
          Ok(user) => {
            info!(email = %user.email, admin = user.is_admin, "logged in");
            self.status_msg = format!("Welcome, {}", user.name);
            self.user = Some(user);
            self.login = LoginForm::default();
            self.screen = Screen::Dashboard;
            self.load_projects().await?;
          }
          Err(e) => self.status_msg = e.to_string(),
        }
      }
      _ => {}
    }
    Ok(true)
  }

  fn handle_filter_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Esc => {
        self.filter_active = false;
        self.filter.clear();
        self.list_cursor = 0;
      }
      KeyCode::Enter => self.filter_active = false,
      KeyCode::Backspace => {
        self.filter.pop();
        self.list_cursor = 0;
      }
      KeyCode::Char(c) => {
        self.filter.push(c);
        self.list_cursor = 0;
      }
      _ => {}
    }
    Ok(true)
  }

  async fn handle_dashboard_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if let Some(id) = self.confirm_delete.take() {
      if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
        self.store.delete_project(id).await?;
        self.load_projects().await?;
        self.status_msg = "Project deleted".into();
      } else {
        self.status_msg = "Delete cancelled".into();
      }
      return Ok(true);
    }

    let len = self.filtered_projects().len();
    match key.code {
      KeyCode::Char('q') => return Ok(false),
      KeyCode::Char('/') => {
        self.filter_active = true;
        self.filter.clear();
        self.list_cursor = 0;
      }
      KeyCode::Up | KeyCode::Char('k') => self.list_cursor = self.list_cursor.saturating_sub(1),
      KeyCode::Down | KeyCode::Char('j') => {
        if self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Char('n') => self.open_generator(None),
      KeyCode::Enter | KeyCode::Char('e') => {
        if let Some(project) = self.cursor_project().cloned() {
          self.open_generator(Some(project));
        }
      }
      KeyCode::Char('d') => {
        let target = self.cursor_project().map(|p| (p.id, p.info.company_name.clone()));
        if let Some((id, company)) = target {
          self.confirm_delete = Some(id);
          self.status_msg = format!("Delete \"{company}\"? y to confirm, any other key cancels");
        }
      }
      KeyCode::Char('r') => {
        self.load_projects().await?;
        self.status_msg = "Reloaded".into();
      }
      KeyCode::Char('L') => {
        self.user = None;
        self.projects.clear();
        self.filter.clear();
        self.list_cursor = 0;
        self.screen = Screen::Login;
        self.status_msg = "Logged out".into();
      }
      _ => {}
    }
    Ok(true)
  }

  fn open_generator(&mut self, project: Option<Project>) {
    let Some(user) = self.user.clone() else { return };
    let store = Arc::clone(&self.store);
    let proposals = Arc::clone(&self.proposals);
    let workflow = match project {
      Some(project) => Workflow::edit(store, proposals, user, project),
      None => Workflow::new(store, proposals, user),
    };
    self.generator = Some(GeneratorView::new(workflow));
    self.screen = Screen::Generator;
    self.status_msg.clear();
  }

  async fn close_generator(&mut self) -> anyhow::Result<()> {
    self.generator = None;
    self.screen = Screen::Dashboard;
    self.load_projects().await
  }

  async fn handle_generator_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    let Some(view) = self.generator.as_mut() else {
      self.screen = Screen::Dashboard;
      return Ok(true);
    };
    match view.handle_key(key, &self.exporter).await {
      Action::None => {}
      Action::Status(msg) => self.status_msg = msg,
      Action::Leave => {
        self.close_generator().await?;
        self.status_msg = "Generator closed without saving".into();
      }
      Action::Saved(outcome) => {
        self.status_msg = match &outcome {
          SaveOutcome::Created(p) => format!("Saved \"{}\"", p.info.company_name),
          SaveOutcome::Updated(p) => format!("Updated \"{}\"", p.info.company_name),
          SaveOutcome::NothingToDo => "Project no longer exists; nothing saved".into(),
        };
        self.close_generator().await?;
      }
    }
    Ok(true)
  }
}

#[cfg(test)]
mod tests {
  use prestige_core::{
    memory::MemoryStore,
    model::{ContactInfo, ThemeDraft},
    proposal::{BioRequest, DesignRequest, fallback_themes},
  };
  use prestige_workflow::Step;

  use super::*;

  /// A backend that is never reachable, so every proposal is the fallback.
  struct Offline;

  #[derive(Debug, thiserror::Error)]
  #[error("offline")]
  struct OfflineError;

  impl DesignBackend for Offline {
    type Error = OfflineError;

    async fn generate_designs(&self, _: DesignRequest) -> Result<Vec<ThemeDraft>, OfflineError> {
      Err(OfflineError)
    }

    async fn generate_bio(&self, _: BioRequest) -> Result<String, OfflineError> {
      Err(OfflineError)
    }
  }

  fn app(store: Arc<MemoryStore>) -> App<MemoryStore, Offline> {
    let dir = std::env::temp_dir();
    App::new(
      store,
      Arc::new(ProposalService::new(Offline)),
      Arc::new(SvgExporter::new(dir, None)),
      AdminSettings::default(),
    )
  }

  fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  async fn press(app: &mut App<MemoryStore, Offline>, code: KeyCode) -> bool {
    app.handle_key(key(code)).await.unwrap()
  }

  async fn type_text(app: &mut App<MemoryStore, Offline>, text: &str) {
    for c in text.chars() {
      press(app, KeyCode::Char(c)).await;
    }
  }

  async fn log_in(app: &mut App<MemoryStore, Offline>, email: &str) {
    type_text(app, email).await;
    press(app, KeyCode::Enter).await;
    assert_eq!(app.screen, Screen::Dashboard);
  }

  async fn save_for(store: &MemoryStore, company: &str, owner: Option<&str>) -> Project {
    let info = ContactInfo { company_name: company.into(), ..ContactInfo::default() };
    store
      .save_project(info, fallback_themes().remove(0), owner.map(str::to_owned))
      .await
      .unwrap()
  }

  #[tokio::test]
  async fn login_lands_on_own_projects() {
    let store = Arc::new(MemoryStore::new());
    save_for(&store, "Acme", Some("jan@acme.com")).await;
    save_for(&store, "Other", Some("ewa@acme.com")).await;
    save_for(&store, "Legacy", None).await;

    let mut app = app(Arc::clone(&store));
    log_in(&mut app, "jan@acme.com").await;
    assert_eq!(app.user.as_ref().unwrap().name, "jan");
    let companies: Vec<_> = app.projects.iter().map(|p| p.info.company_name.as_str()).collect();
    assert_eq!(companies, vec!["Legacy", "Acme"]);
    assert_eq!(owner_label(&app.projects[0]), UNKNOWN_OWNER);
  }

  #[tokio::test]
  async fn empty_login_stays_put() {
    let mut app = app(Arc::new(MemoryStore::new()));
    press(&mut app, KeyCode::Enter).await;
    assert_eq!(app.screen, Screen::Login);
    assert!(!app.status_msg.is_empty());
  }

  #[tokio::test]
  async fn filter_narrows_the_list() {
    let store = Arc::new(MemoryStore::new());
    save_for(&store, "Acme", None).await;
    save_for(&store, "Kwiaciarnia", None).await;

    let mut app = app(store);
    log_in(&mut app, "jan@acme.com").await;
    press(&mut app, KeyCode::Char('/')).await;
    type_text(&mut app, "kwi").await;
    let hits: Vec<_> = app
      .filtered_projects()
      .iter()
      .map(|p| p.info.company_name.clone())
      .collect();
    assert_eq!(hits, vec!["Kwiaciarnia"]);
  }

  #[tokio::test]
  async fn delete_asks_first() {
    let store = Arc::new(MemoryStore::new());
    save_for(&store, "Acme", None).await;

    let mut app = app(Arc::clone(&store));
    log_in(&mut app, "jan@acme.com").await;

    press(&mut app, KeyCode::Char('d')).await;
    assert!(app.confirm_delete.is_some());
    press(&mut app, KeyCode::Char('n')).await;
    assert_eq!(app.projects.len(), 1);
    assert_eq!(app.screen, Screen::Dashboard);

    press(&mut app, KeyCode::Char('d')).await;
    press(&mut app, KeyCode::Char('y')).await;
    assert!(app.projects.is_empty());
  }

  #[tokio::test]
  async fn new_card_from_form_to_dashboard() {
    let store = Arc::new(MemoryStore::new());
    let mut app = app(Arc::clone(&store));
    log_in(&mut app, "jan@acme.com").await;

    press(&mut app, KeyCode::Char('n')).await;
    assert_eq!(app.screen, Screen::Generator);

    // Full name, job title, company, industry, email: the first five rows.
    for value in ["Jan Kowalski", "CEO", "Acme", "Tech", "jan@acme.com"] {
      press(&mut app, KeyCode::Enter).await;
      type_text(&mut app, value).await;
      press(&mut app, KeyCode::Enter).await;
      press(&mut app, KeyCode::Down).await;
    }
    press(&mut app, KeyCode::Char('g')).await;

    while app.generator.as_ref().unwrap().workflow.is_busy() {
      tokio::task::yield_now().await;
      app.tick().await.unwrap();
    }
    let view = app.generator.as_ref().unwrap();
    assert_eq!(view.workflow.step(), Step::Review);
    assert!(view.workflow.last_batch_was_fallback());

    press(&mut app, KeyCode::Enter).await;
    assert_eq!(app.generator.as_ref().unwrap().workflow.step(), Step::Edit);

    press(&mut app, KeyCode::Char('s')).await;
    assert_eq!(app.screen, Screen::Dashboard);
    assert!(app.generator.is_none());
    assert_eq!(app.projects.len(), 1);
    assert_eq!(app.projects[0].owner.as_deref(), Some("jan@acme.com"));
    assert_eq!(app.projects[0].info.full_name, "Jan Kowalski");
  }

  #[tokio::test]
  async fn editing_existing_project_updates_in_place() {
    let store = Arc::new(MemoryStore::new());
    let saved = save_for(&store, "Acme", Some("jan@acme.com")).await;

    let mut app = app(Arc::clone(&store));
    log_in(&mut app, "jan@acme.com").await;
    press(&mut app, KeyCode::Enter).await;
    assert_eq!(app.generator.as_ref().unwrap().workflow.step(), Step::Edit);

    // Row 1 is the slogan.
    press(&mut app, KeyCode::Down).await;
    press(&mut app, KeyCode::Enter).await;
    let buffer = &mut app.generator.as_mut().unwrap().editing.as_mut().unwrap().buffer;
    buffer.clear();
    type_text(&mut app, "Nowe hasło").await;
    press(&mut app, KeyCode::Enter).await;
    press(&mut app, KeyCode::Char('s')).await;

    let stored = store.get_project(saved.id).await.unwrap().unwrap();
    assert_eq!(stored.theme.slogan, "Nowe hasło");
    assert_eq!(stored.created_at, saved.created_at);
    assert_eq!(app.projects.len(), 1);
  }

  #[tokio::test]
  async fn escape_from_existing_edit_leaves_without_saving() {
    let store = Arc::new(MemoryStore::new());
    save_for(&store, "Acme", None).await;

    let mut app = app(store);
    log_in(&mut app, "jan@acme.com").await;
    press(&mut app, KeyCode::Enter).await;
    press(&mut app, KeyCode::Esc).await;
    assert_eq!(app.screen, Screen::Dashboard);
    assert!(app.generator.is_none());
  }

  #[tokio::test]
  async fn ctrl_c_quits_anywhere() {
    let mut app = app(Arc::new(MemoryStore::new()));
    let quit = app
      .handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
      .await
      .unwrap();
    assert!(!quit);
  }
}
