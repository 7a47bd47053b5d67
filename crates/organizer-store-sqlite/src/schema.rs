//! SQL schema for the organizer SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,      -- argon2 PHC string
    role          TEXT NOT NULL DEFAULT 'generic',  -- 'admin' | 'generic'
    created_at    TEXT NOT NULL,      -- ISO 8601 UTC; server-assigned
    updated_at    TEXT NOT NULL
);

-- Notes belong to exactly one user and go away with them.
CREATE TABLE IF NOT EXISTS notes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    note_date   TEXT NOT NULL,        -- YYYY-MM-DD
    content     TEXT NOT NULL,
    hidden      INTEGER NOT NULL DEFAULT 0,
    starred     INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS notes_owner_date_idx ON notes(user_id, note_date);

PRAGMA user_version = 1;
";
