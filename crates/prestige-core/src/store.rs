//! The `ProjectStore` trait.
//!
//! Implemented by storage backends (the in-memory [`crate::memory`] store and
//! `prestige-store-sqlite`). The workflow and the terminal application depend
//! on this abstraction, not on any concrete backend.
//!
//! Contract shared by every backend:
//!
//! - Ids and `created_at` are assigned by the store, never by callers.
//! - `list_projects` is always ordered newest first.
//! - Rows that cannot be decoded are skipped, never surfaced as errors.
//! - Missing ids are "nothing to do": `update_project` returns `None`,
//!   deletes are no-ops.

use std::future::Future;

use uuid::Uuid;

use crate::model::{ContactInfo, Project, Theme, User};

/// Abstraction over a project/template store backend.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded async runtimes.
pub trait ProjectStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Projects ──────────────────────────────────────────────────────────

  /// Persist a new project with a fresh id and the current timestamp.
  fn save_project(
    &self,
    info: ContactInfo,
    theme: Theme,
    owner: Option<String>,
  ) -> impl Future<Output = Result<Project, Self::Error>> + Send + '_;

  /// Replace `info` and `theme` of an existing project. `id`, `owner` and
  /// `created_at` are left untouched. Returns `None` if `id` is unknown.
  fn update_project(
    &self,
    id: Uuid,
    info: ContactInfo,
    theme: Theme,
  ) -> impl Future<Output = Result<Option<Project>, Self::Error>> + Send + '_;

  /// Remove a project. Absent ids are ignored.
  fn delete_project(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Retrieve a project by id, regardless of owner.
  fn get_project(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Project>, Self::Error>> + Send + '_;

  /// Projects visible to `viewer` (see [`Project::is_visible_to`]), newest
  /// first.
  fn list_projects<'a>(
    &'a self,
    viewer: &'a User,
  ) -> impl Future<Output = Result<Vec<Project>, Self::Error>> + Send + 'a;

  // ── Templates ─────────────────────────────────────────────────────────

  /// Persist `theme` as a reusable template under a fresh id. The owner is
  /// recorded but not used to filter reads.
  fn save_template(
    &self,
    theme: Theme,
    owner: Option<String>,
  ) -> impl Future<Output = Result<Theme, Self::Error>> + Send + '_;

  /// Every stored template, newest first.
  fn list_templates(
    &self,
  ) -> impl Future<Output = Result<Vec<Theme>, Self::Error>> + Send + '_;

  /// Remove a template. Absent ids are ignored.
  fn delete_template(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
