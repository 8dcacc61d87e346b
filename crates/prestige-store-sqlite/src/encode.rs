//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! UUIDs are stored as hyphenated lowercase strings, timestamps as epoch
//! milliseconds, content and themes as compact JSON.

use chrono::{DateTime, Utc};
use prestige_core::model::{ContactInfo, Project, Theme};
use uuid::Uuid;

use crate::{Error, Result};

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_ms(dt: DateTime<Utc>) -> i64 { dt.timestamp_millis() }

pub fn decode_ms(ms: i64) -> Result<DateTime<Utc>> {
  DateTime::from_timestamp_millis(ms).ok_or(Error::Timestamp(ms))
}

pub fn encode_info(info: &ContactInfo) -> Result<String> { Ok(serde_json::to_string(info)?) }

pub fn encode_theme(theme: &Theme) -> Result<String> { Ok(serde_json::to_string(theme)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `projects` row.
pub struct RawProject {
  pub project_id: String,
  pub owner:      Option<String>,
  pub info_json:  String,
  pub theme_json: String,
  pub created_at: i64,
}

impl RawProject {
  pub fn into_project(self) -> Result<Project> {
    Ok(Project {
      id:         decode_uuid(&self.project_id)?,
      owner:      self.owner,
      info:       serde_json::from_str(&self.info_json)?,
      theme:      serde_json::from_str(&self.theme_json)?,
      created_at: decode_ms(self.created_at)?,
    })
  }
}

/// Raw values read directly from a `templates` row.
pub struct RawTemplate {
  pub template_id: String,
  pub theme_json:  String,
}

impl RawTemplate {
  /// The row key wins over whatever id the JSON document carries.
  pub fn into_theme(self) -> Result<Theme> {
    let id = decode_uuid(&self.template_id)?;
    let theme: Theme = serde_json::from_str(&self.theme_json)?;
    Ok(Theme { id, ..theme })
  }
}
