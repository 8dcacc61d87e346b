//! In-memory [`ProjectStore`] for tests and throwaway sessions.

use std::{
  collections::HashMap,
  convert::Infallible,
  sync::{Mutex, MutexGuard, PoisonError},
};

use uuid::Uuid;

use crate::{
  model::{ContactInfo, Project, Theme, User},
  store::ProjectStore,
};

struct Row<T> {
  /// Insertion order; breaks ties between equal timestamps.
  seq:   u64,
  owner: Option<String>,
  value: T,
}

#[derive(Default)]
struct Inner {
  next_seq:  u64,
  projects:  HashMap<Uuid, Row<Project>>,
  templates: HashMap<Uuid, Row<Theme>>,
}

impl Inner {
  fn bump(&mut self) -> u64 {
    self.next_seq += 1;
    self.next_seq
  }
}

/// A [`ProjectStore`] holding everything in id-indexed maps.
#[derive(Default)]
pub struct MemoryStore {
  inner: Mutex<Inner>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl ProjectStore for MemoryStore {
  type Error = Infallible;

  async fn save_project(
    &self,
    info: ContactInfo,
    theme: Theme,
    owner: Option<String>,
  ) -> Result<Project, Infallible> {
    let project = Project {
      id: Uuid::new_v4(),
      owner: owner.clone(),
      info,
      theme,
      created_at: Project::timestamp_now(),
    };
    let mut inner = self.lock();
    let seq = inner.bump();
    inner
      .projects
      .insert(project.id, Row { seq, owner, value: project.clone() });
    Ok(project)
  }

  async fn update_project(
    &self,
    id: Uuid,
    info: ContactInfo,
    theme: Theme,
  ) -> Result<Option<Project>, Infallible> {
    let mut inner = self.lock();
    Ok(inner.projects.get_mut(&id).map(|row| {
      row.value.info = info;
      row.value.theme = theme;
      row.value.clone()
    }))
  }

  async fn delete_project(&self, id: Uuid) -> Result<(), Infallible> {
    self.lock().projects.remove(&id);
    Ok(())
  }

  async fn get_project(&self, id: Uuid) -> Result<Option<Project>, Infallible> {
    Ok(self.lock().projects.get(&id).map(|row| row.value.clone()))
  }

  async fn list_projects(&self, viewer: &User) -> Result<Vec<Project>, Infallible> {
    let inner = self.lock();
    let mut rows: Vec<&Row<Project>> = inner
      .projects
      .values()
      .filter(|row| row.value.is_visible_to(viewer))
      .collect();
    rows.sort_by(|a, b| {
      b.value
        .created_at
        .cmp(&a.value.created_at)
        .then(b.seq.cmp(&a.seq))
    });
    Ok(rows.into_iter().map(|row| row.value.clone()).collect())
  }

  async fn save_template(
    &self,
    theme: Theme,
    owner: Option<String>,
  ) -> Result<Theme, Infallible> {
    let template = Theme { id: Uuid::new_v4(), ..theme };
    let mut inner = self.lock();
    let seq = inner.bump();
    inner
      .templates
      .insert(template.id, Row { seq, owner, value: template.clone() });
    Ok(template)
  }

  async fn list_templates(&self) -> Result<Vec<Theme>, Infallible> {
    let inner = self.lock();
    let mut rows: Vec<&Row<Theme>> = inner.templates.values().collect();
    rows.sort_by(|a, b| b.seq.cmp(&a.seq));
    Ok(rows.into_iter().map(|row| row.value.clone()).collect())
  }

  async fn delete_template(&self, id: Uuid) -> Result<(), Infallible> {
    self.lock().templates.remove(&id);
    Ok(())
  }
}

impl MemoryStore {
  /// Owner recorded for a template, if any.
  pub fn template_owner(&self, id: Uuid) -> Option<String> {
    self.lock().templates.get(&id).and_then(|row| row.owner.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::proposal::fallback_themes;

  fn info(company: &str) -> ContactInfo {
    ContactInfo { company_name: company.into(), ..ContactInfo::default() }
  }

  fn theme() -> Theme { fallback_themes().remove(0) }

  #[tokio::test]
  async fn list_is_newest_first_and_filtered() {
    let store = MemoryStore::new();
    let a = store
      .save_project(info("A"), theme(), Some("jan@acme.com".into()))
      .await
      .unwrap();
    let b = store.save_project(info("B"), theme(), None).await.unwrap();
    let c = store
      .save_project(info("C"), theme(), Some("ewa@acme.com".into()))
      .await
      .unwrap();

    let jan = User::new("Jan", "jan@acme.com");
    let ids: Vec<_> = store
      .list_projects(&jan)
      .await
      .unwrap()
      .into_iter()
      .map(|p| p.id)
      .collect();
    assert_eq!(ids, vec![b.id, a.id]);

    let admin = User::admin("Administrator", "admin@prestige.com");
    let ids: Vec<_> = store
      .list_projects(&admin)
      .await
      .unwrap()
      .into_iter()
      .map(|p| p.id)
      .collect();
    assert_eq!(ids, vec![c.id, b.id, a.id]);
  }

  #[tokio::test]
  async fn update_keeps_identity() {
    let store = MemoryStore::new();
    let saved = store
      .save_project(info("A"), theme(), Some("jan@acme.com".into()))
      .await
      .unwrap();

    let mut new_theme = theme();
    new_theme.slogan = "Nowe hasło".into();
    let updated = store
      .update_project(saved.id, info("B"), new_theme.clone())
      .await
      .unwrap()
      .unwrap();

    assert_eq!(updated.id, saved.id);
    assert_eq!(updated.owner, saved.owner);
    assert_eq!(updated.created_at, saved.created_at);

    let fetched = store.get_project(saved.id).await.unwrap().unwrap();
    assert_eq!(fetched, updated);
    assert_eq!(fetched.info, info("B"));
    assert_eq!(fetched.theme, new_theme);
  }

  #[tokio::test]
  async fn created_at_has_millisecond_precision() {
    let store = MemoryStore::new();
    let saved = store.save_project(info("A"), theme(), None).await.unwrap();
    assert_eq!(saved.created_at.timestamp_subsec_nanos() % 1_000_000, 0);
  }

  #[tokio::test]
  async fn missing_ids_are_noops() {
    let store = MemoryStore::new();
    let missing = Uuid::new_v4();
    assert!(store.update_project(missing, info("A"), theme()).await.unwrap().is_none());
    store.delete_project(missing).await.unwrap();
    store.delete_template(missing).await.unwrap();
  }

  #[tokio::test]
  async fn templates_get_fresh_ids_and_owner_is_kept() {
    let store = MemoryStore::new();
    let original = theme();
    let saved = store
      .save_template(original.clone(), Some("jan@acme.com".into()))
      .await
      .unwrap();
    assert_ne!(saved.id, original.id);
    assert_eq!(store.template_owner(saved.id).as_deref(), Some("jan@acme.com"));

    store.delete_template(saved.id).await.unwrap();
    assert!(store.list_templates().await.unwrap().is_empty());
  }
}
