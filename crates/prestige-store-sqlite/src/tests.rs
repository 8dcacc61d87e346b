//! Integration tests for `SqliteStore`.

use prestige_core::{
  model::{ContactInfo, Theme, User},
  proposal::fallback_themes,
  store::ProjectStore,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn info(company: &str) -> ContactInfo {
  ContactInfo {
    full_name: "Jan Kowalski".into(),
    company_name: company.into(),
    ..ContactInfo::default()
  }
}

fn theme() -> Theme { fallback_themes().remove(0) }

fn jan() -> User { User::new("Jan", "jan@acme.com") }

// ─── Projects ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_and_get_round_trip() {
  let s = store().await;
  let mut t = theme();
  t.set_logo_bytes("image/png", b"\x89PNG");

  let saved = s
    .save_project(info("Acme"), t.clone(), Some("jan@acme.com".into()))
    .await
    .unwrap();

  let fetched = s.get_project(saved.id).await.unwrap().unwrap();
  assert_eq!(fetched, saved);
  assert_eq!(fetched.theme, t);
  assert_eq!(fetched.owner.as_deref(), Some("jan@acme.com"));
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get_project(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_is_newest_first() {
  let s = store().await;
  let mut ids = Vec::new();
  for company in ["A", "B", "C"] {
    ids.push(s.save_project(info(company), theme(), None).await.unwrap().id);
  }
  ids.reverse();

  let listed: Vec<_> = s
    .list_projects(&jan())
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.id)
    .collect();
  assert_eq!(listed, ids);
}

#[tokio::test]
async fn list_respects_visibility() {
  let s = store().await;
  let own = s
    .save_project(info("Own"), theme(), Some("jan@acme.com".into()))
    .await
    .unwrap();
  let legacy = s.save_project(info("Legacy"), theme(), None).await.unwrap();
  let other = s
    .save_project(info("Other"), theme(), Some("ewa@acme.com".into()))
    .await
    .unwrap();

  let visible: Vec<_> = s
    .list_projects(&jan())
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.id)
    .collect();
  assert_eq!(visible, vec![legacy.id, own.id]);

  let admin = User::admin("Administrator", "admin@prestige.com");
  let all = s.list_projects(&admin).await.unwrap();
  assert_eq!(all.len(), 3);
  assert_eq!(all[0].id, other.id);
}

#[tokio::test]
async fn update_preserves_identity() {
  let s = store().await;
  let saved = s
    .save_project(info("Acme"), theme(), Some("jan@acme.com".into()))
    .await
    .unwrap();

  let mut t = theme();
  t.slogan = "Zawsze do przodu.".into();
  let updated = s
    .update_project(saved.id, info("Acme Sp. z o.o."), t.clone())
    .await
    .unwrap()
    .expect("project exists");

  assert_eq!(updated.id, saved.id);
  assert_eq!(updated.owner, saved.owner);
  assert_eq!(updated.created_at, saved.created_at);
  assert_eq!(updated.info.company_name, "Acme Sp. z o.o.");
  assert_eq!(updated.theme, t);
}

#[tokio::test]
async fn update_missing_is_nothing_to_do() {
  let s = store().await;
  let result = s.update_project(Uuid::new_v4(), info("A"), theme()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn delete_project_and_missing_delete() {
  let s = store().await;
  let saved = s.save_project(info("A"), theme(), None).await.unwrap();
  s.delete_project(saved.id).await.unwrap();
  s.delete_project(saved.id).await.unwrap();
  assert!(s.list_projects(&jan()).await.unwrap().is_empty());
}

#[tokio::test]
async fn corrupt_rows_are_skipped() {
  let s = store().await;
  let good = s.save_project(info("Good"), theme(), None).await.unwrap();

  s.connection()
    .call(|conn| {
      conn.execute(
        "INSERT INTO projects (project_id, owner, info_json, theme_json, created_at)
         VALUES ('not-a-uuid', NULL, '{}', '{}', 0),
                ('6f9619ff-8b86-d011-b42d-00c04fc964ff', NULL, '{broken', '{}', 1)",
        [],
      )?;
      conn.execute(
        "INSERT INTO templates (template_id, owner, theme_json, created_at)
         VALUES ('6f9619ff-8b86-d011-b42d-00c04fc964ff', NULL, '[]', 0)",
        [],
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let listed = s.list_projects(&jan()).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].id, good.id);
  assert!(s.list_templates().await.unwrap().is_empty());
}

#[tokio::test]
async fn corrupt_row_reads_as_missing() {
  let s = store().await;
  let id = Uuid::parse_str("6f9619ff-8b86-d011-b42d-00c04fc964ff").unwrap();

  s.connection()
    .call(|conn| {
      conn.execute(
        "INSERT INTO projects (project_id, owner, info_json, theme_json, created_at)
         VALUES ('6f9619ff-8b86-d011-b42d-00c04fc964ff', NULL, '{broken', '{}', 1)",
        [],
      )?;
      Ok(())
    })
    .await
    .unwrap();

  assert!(s.get_project(id).await.unwrap().is_none());
  assert!(s.update_project(id, info("A"), theme()).await.unwrap().is_none());
}

// ─── Templates ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn templates_are_shared_and_newest_first() {
  let s = store().await;
  let original = theme().as_template();
  let first = s
    .save_template(original.clone(), Some("jan@acme.com".into()))
    .await
    .unwrap();
  let second = s
    .save_template(fallback_themes().remove(1), Some("ewa@acme.com".into()))
    .await
    .unwrap();

  assert_ne!(first.id, original.id);
  assert_eq!(first.name, "Classic Elegant (Szablon)");

  let listed: Vec<_> = s
    .list_templates()
    .await
    .unwrap()
    .into_iter()
    .map(|t| t.id)
    .collect();
  assert_eq!(listed, vec![second.id, first.id]);
}

#[tokio::test]
async fn delete_template_removes_it() {
  let s = store().await;
  let saved = s.save_template(theme(), None).await.unwrap();
  s.delete_template(saved.id).await.unwrap();
  s.delete_template(Uuid::new_v4()).await.unwrap();
  assert!(
    s.list_templates()
      .await
      .unwrap()
      .iter()
      .all(|t| t.id != saved.id)
  );
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn data_survives_reopen() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("prestige.db");

  let saved = {
    let s = SqliteStore::open(&path).await.unwrap();
    let saved = s.save_project(info("Acme"), theme(), None).await.unwrap();
    s.save_template(theme(), None).await.unwrap();
    saved
  };

  let s = SqliteStore::open(&path).await.unwrap();
  let fetched = s.get_project(saved.id).await.unwrap().unwrap();
  assert_eq!(fetched.info, saved.info);
  assert_eq!(s.list_templates().await.unwrap().len(), 1);
}
