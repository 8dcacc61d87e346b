//! `prestige`: terminal business-card designer.
//!
//! # Usage
//!
//! ```
//! prestige
//! prestige --config ~/.config/prestige/config.toml
//! prestige --ephemeral
//! ```
//!
//! # Admin password
//!
//! To generate the argon2 PHC string for `admin.password_hash`:
//!
//! ```
//! prestige --hash-password
//! ```

mod app;
mod auth;
mod config;
mod export;
mod generator;
mod svg;
mod ui;

use std::{
  fs::{self, OpenOptions},
  io,
  path::PathBuf,
  sync::{Arc, Mutex},
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use export::SvgExporter;
use prestige_core::{
  memory::MemoryStore,
  proposal::{DesignBackend, ProposalService},
  store::ProjectStore,
};
use prestige_gemini::GeminiClient;
use prestige_store_sqlite::SqliteStore;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "prestige", version, about = "Design business cards in the terminal")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, value_name = "FILE", default_value_os_t = config::default_config_path())]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,

  /// Keep projects in memory only; nothing is written to disk.
  #[arg(long)]
  ephemeral: bool,

  /// SQLite database path (overrides `store_path`).
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  /// Directory for exported cards and sheets (overrides `export_dir`).
  #[arg(long, value_name = "DIR")]
  export_dir: Option<PathBuf>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  // Helper mode: hash a password and exit.
  if cli.hash_password {
    let password = read_password()?;
    println!("{}", auth::hash_password(&password)?);
    return Ok(());
  }

  let mut settings = config::Settings::load(&cli.config)?;
  if let Some(store) = &cli.store {
    settings.store_path = config::expand_tilde(store);
  }
  if let Some(dir) = &cli.export_dir {
    settings.export_dir = config::expand_tilde(dir);
  }

  init_tracing(&settings)?;
  info!(config = %cli.config.display(), "starting prestige");

  let backend = GeminiClient::new(settings.gemini.client_config())
    .context("failed to build the design service client")?;
  let proposals = Arc::new(ProposalService::new(backend));
  let exporter = Arc::new(SvgExporter::new(
    settings.export_dir.clone(),
    settings.print_command.clone(),
  ));

  if cli.ephemeral {
    info!("using in-memory store");
    let app = App::new(Arc::new(MemoryStore::new()), proposals, exporter, settings.admin);
    return run(app).await;
  }

  if let Some(parent) = settings.store_path.parent() {
    fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  let store = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;
  info!(path = %settings.store_path.display(), "opened store");

  let app = App::new(Arc::new(store), proposals, exporter, settings.admin);
  run(app).await
}

/// Log to a file; the terminal belongs to the UI.
fn init_tracing(settings: &config::Settings) -> Result<()> {
  if let Some(parent) = settings.log_file.parent() {
    fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  let file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(&settings.log_file)
    .with_context(|| format!("failed to open log file {}", settings.log_file.display()))?;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(Mutex::new(file))
    .with_ansi(false)
    .init();
  Ok(())
}

/// Read a password from stdin.
fn read_password() -> Result<String> {
  use std::io::{BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

// ─── Terminal ─────────────────────────────────────────────────────────────────

async fn run<S, B>(mut app: App<S, B>) -> Result<()>
where
  S: ProjectStore + 'static,
  B: DesignBackend + 'static,
{
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Restore the terminal even when the loop fails.
  let result = run_event_loop(&mut terminal, &mut app).await;

  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop<S, B>(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<S, B>,
) -> Result<()>
where
  S: ProjectStore + 'static,
  B: DesignBackend + 'static,
{
  loop {
    if let Err(e) = app.tick().await {
      app.status_msg = format!("Error: {e}");
    }
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event {
      match app.handle_key(key).await {
        Ok(true) => {}
        Ok(false) => break,
        Err(e) => app.status_msg = format!("Error: {e}"),
      }
    }
  }

  info!("exiting");
  Ok(())
}
