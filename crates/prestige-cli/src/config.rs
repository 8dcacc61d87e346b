//! Runtime settings, layered from an optional TOML file and `PRESTIGE_*`
//! environment variables.
//!
//! ```toml
//! store_path    = "~/.local/share/prestige/prestige.db"
//! export_dir    = "~/Wizytowki"
//! print_command = "lp -o media=A4"
//!
//! [gemini]
//! api_key = "..."
//!
//! [admin]
//! login         = "admin"
//! password_hash = "$argon2id$v=19$..."
//! ```
//!
//! Nested keys use a double underscore in the environment, e.g.
//! `PRESTIGE_GEMINI__API_KEY`.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use prestige_gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiConfig};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub store_path:    PathBuf,
  pub export_dir:    PathBuf,
  /// Program (plus arguments) that receives the path of a rendered sheet.
  pub print_command: Option<String>,
  pub log_file:      PathBuf,
  pub gemini:        GeminiSettings,
  pub admin:         AdminSettings,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      store_path:    PathBuf::from("~/.local/share/prestige/prestige.db"),
      export_dir:    PathBuf::from("."),
      print_command: None,
      log_file:      PathBuf::from("~/.local/share/prestige/prestige.log"),
      gemini:        GeminiSettings::default(),
      admin:         AdminSettings::default(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
  pub api_key:      String,
  pub model:        String,
  pub base_url:     String,
  pub timeout_secs: u64,
}

impl Default for GeminiSettings {
  fn default() -> Self {
    Self {
      api_key:      String::new(),
      model:        DEFAULT_MODEL.to_owned(),
      base_url:     DEFAULT_BASE_URL.to_owned(),
      timeout_secs: 60,
    }
  }
}

impl GeminiSettings {
  pub fn client_config(&self) -> GeminiConfig {
    GeminiConfig {
      api_key:  self.api_key.clone(),
      model:    self.model.clone(),
      base_url: self.base_url.clone(),
      timeout:  Duration::from_secs(self.timeout_secs),
    }
  }
}

/// The one login that is granted admin rights.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
  pub login:         String,
  /// argon2 PHC string. Without it nobody can log in as admin.
  pub password_hash: Option<String>,
}

impl Default for AdminSettings {
  fn default() -> Self { Self { login: "admin".to_owned(), password_hash: None } }
}

impl Settings {
  /// Read `path` (if it exists) and the environment, then expand `~` in
  /// every path.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let raw = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("PRESTIGE")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?;

    let settings: Settings = raw
      .try_deserialize()
      .context("failed to deserialise settings")?;
    Ok(settings.expanded())
  }

  fn expanded(self) -> Self {
    Self {
      store_path: expand_tilde(&self.store_path),
      export_dir: expand_tilde(&self.export_dir),
      log_file: expand_tilde(&self.log_file),
      ..self
    }
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

/// `~/.config/prestige/config.toml`.
pub fn default_config_path() -> PathBuf { expand_tilde(Path::new("~/.config/prestige/config.toml")) }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(settings.admin.login, "admin");
    assert!(settings.admin.password_hash.is_none());
    assert_eq!(settings.gemini.timeout_secs, 60);
    assert_eq!(settings.gemini.model, DEFAULT_MODEL);
    assert!(settings.print_command.is_none());
  }

  #[test]
  fn file_values_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
      &path,
      r#"
        store_path    = "/tmp/cards.db"
        print_command = "lp -o media=A4"

        [gemini]
        model        = "gemini-test"
        timeout_secs = 5

        [admin]
        login = "szef"
      "#,
    )
    .unwrap();

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.store_path, PathBuf::from("/tmp/cards.db"));
    assert_eq!(settings.print_command.as_deref(), Some("lp -o media=A4"));
    assert_eq!(settings.admin.login, "szef");

    let client = settings.gemini.client_config();
    assert_eq!(client.model, "gemini-test");
    assert_eq!(client.timeout, Duration::from_secs(5));
    assert_eq!(client.base_url, DEFAULT_BASE_URL);
  }

  #[test]
  fn tilde_is_expanded_against_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(expand_tilde(Path::new("~/x/y.db")), PathBuf::from(home).join("x/y.db"));
    assert_eq!(expand_tilde(Path::new("/abs/y.db")), PathBuf::from("/abs/y.db"));
  }
}
