//! Database schema and migrations for filevault.
//!
//! Migrations are applied sequentially when the database is first opened
//! or upgraded. The schema_version table tracks which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: users
    r#"
CREATE TABLE users (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    email            TEXT NOT NULL UNIQUE,
    password_digest  TEXT NOT NULL,           -- Argon2id PHC string
    created_at       TEXT NOT NULL DEFAULT (datetime('now'))
);
"#,
    // v2: file hierarchy nodes
    r#"
CREATE TABLE files (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id    INTEGER NOT NULL REFERENCES users(id),
    name        TEXT NOT NULL,
    node_type   TEXT NOT NULL CHECK (node_type IN ('folder', 'file', 'image')),
    parent_id   INTEGER REFERENCES files(id),  -- NULL for the root
    is_public   INTEGER NOT NULL DEFAULT 0,
    local_path  TEXT,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    CHECK ((node_type = 'folder') = (local_path IS NULL))
);

CREATE INDEX idx_files_owner_parent ON files(owner_id, parent_id);
"#,
    // v3: thumbnail work queue
    r#"
CREATE TABLE thumbnail_jobs (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id       INTEGER NOT NULL,
    file_id        INTEGER NOT NULL,
    attempts       INTEGER NOT NULL DEFAULT 0,
    claimed_until  INTEGER,                   -- unix seconds
    completed_at   TEXT,
    created_at     TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_thumbnail_jobs_pending ON thumbnail_jobs(completed_at, claimed_until);
"#,
];
