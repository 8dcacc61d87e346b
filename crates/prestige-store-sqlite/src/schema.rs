//! SQL schema for the Prestige SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! layout so later migrations can be gated on it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS projects (
    project_id  TEXT PRIMARY KEY,
    owner       TEXT,             -- owner email; NULL on legacy rows
    info_json   TEXT NOT NULL,    -- ContactInfo document
    theme_json  TEXT NOT NULL,    -- Theme document
    created_at  INTEGER NOT NULL  -- epoch milliseconds; never updated
);

-- owner is recorded but reads are never filtered by it.
CREATE TABLE IF NOT EXISTS templates (
    template_id TEXT PRIMARY KEY,
    owner       TEXT,
    theme_json  TEXT NOT NULL,
    created_at  INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS projects_owner_idx   ON projects(owner);
CREATE INDEX IF NOT EXISTS projects_created_idx ON projects(created_at);

PRAGMA user_version = 1;
";
