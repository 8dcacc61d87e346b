//! [`SqliteStore`], the SQLite implementation of [`ProjectStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::{debug, warn};
use uuid::Uuid;

use prestige_core::{
  model::{ContactInfo, Project, Theme, User},
  store::ProjectStore,
};

use crate::{
  encode::{RawProject, RawTemplate, encode_info, encode_ms, encode_theme, encode_uuid},
  schema::SCHEMA,
  Error, Result,
};

const PROJECT_COLUMNS: &str = "project_id, owner, info_json, theme_json, created_at";

fn raw_project(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawProject> {
  Ok(RawProject {
    project_id: row.get(0)?,
    owner:      row.get(1)?,
    info_json:  row.get(2)?,
    theme_json: row.get(3)?,
    created_at: row.get(4)?,
  })
}

/// Decode rows, dropping the ones that no longer parse.
fn decode_all<R, T>(
  raws: Vec<R>,
  what: &'static str,
  decode: impl Fn(R) -> Result<T>,
) -> Vec<T> {
  raws
    .into_iter()
    .filter_map(|raw| match decode(raw) {
      Ok(value) => Some(value),
      Err(error) => {
        warn!(%error, kind = what, "skipping undecodable row");
        None
      }
    })
    .collect()
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Prestige project store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  #[cfg(test)]
  pub(crate) fn connection(&self) -> &tokio_rusqlite::Connection { &self.conn }
}

// ─── ProjectStore impl ───────────────────────────────────────────────────────

impl ProjectStore for SqliteStore {
  type Error = Error;

  // ── Projects ──────────────────────────────────────────────────────────────

  async fn save_project(
    &self,
    info: ContactInfo,
    theme: Theme,
    owner: Option<String>,
  ) -> Result<Project> {
    let project = Project {
      id: Uuid::new_v4(),
      owner,
      info,
      theme,
      created_at: Project::timestamp_now(),
    };

    let id_str     = encode_uuid(project.id);
    let owner      = project.owner.clone();
    let info_json  = encode_info(&project.info)?;
    let theme_json = encode_theme(&project.theme)?;
    let created_ms = encode_ms(project.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO projects (project_id, owner, info_json, theme_json, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, owner, info_json, theme_json, created_ms],
        )?;
        Ok(())
      })
      .await?;

    debug!(id = %project.id, "saved project");
    Ok(project)
  }

  async fn update_project(
    &self,
    id: Uuid,
    info: ContactInfo,
    theme: Theme,
  ) -> Result<Option<Project>> {
    let id_str     = encode_uuid(id);
    let info_json  = encode_info(&info)?;
    let theme_json = encode_theme(&theme)?;

    let changed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE projects SET info_json = ?2, theme_json = ?3 WHERE project_id = ?1",
          rusqlite::params![id_str, info_json, theme_json],
        )?;
        Ok(n)
      })
      .await?;

    if changed == 0 {
      debug!(%id, "update of unknown project");
      return Ok(None);
    }
    self.get_project(id).await
  }

  async fn delete_project(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM projects WHERE project_id = ?1", rusqlite::params![id_str])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawProject> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE project_id = ?1");
        let raw = conn
          .query_row(&sql, rusqlite::params![id_str], raw_project)
          .optional()?;
        Ok(raw)
      })
      .await?;

    Ok(raw.and_then(|raw| match raw.into_project() {
      Ok(project) => Some(project),
      Err(error) => {
        warn!(%error, %id, "stored project is undecodable; treating as missing");
        None
      }
    }))
  }

  async fn list_projects(&self, viewer: &User) -> Result<Vec<Project>> {
    let is_admin = viewer.is_admin;
    let email    = viewer.email.clone();

    let raws: Vec<RawProject> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {PROJECT_COLUMNS} FROM projects
           WHERE ?1 OR owner IS NULL OR owner = ?2
           ORDER BY created_at DESC, rowid DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![is_admin, email], raw_project)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(decode_all(raws, "project", RawProject::into_project))
  }

  // ── Templates ─────────────────────────────────────────────────────────────

  async fn save_template(&self, theme: Theme, owner: Option<String>) -> Result<Theme> {
    let template   = Theme { id: Uuid::new_v4(), ..theme };
    let id_str     = encode_uuid(template.id);
    let theme_json = encode_theme(&template)?;
    let created_ms = encode_ms(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO templates (template_id, owner, theme_json, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, owner, theme_json, created_ms],
        )?;
        Ok(())
      })
      .await?;

    debug!(id = %template.id, "saved template");
    Ok(template)
  }

  async fn list_templates(&self) -> Result<Vec<Theme>> {
    let raws: Vec<RawTemplate> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT template_id, theme_json FROM templates
           ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawTemplate {
              template_id: row.get(0)?,
              theme_json:  row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(decode_all(raws, "template", RawTemplate::into_theme))
  }

  async fn delete_template(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM templates WHERE template_id = ?1", rusqlite::params![id_str])?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
