//! SQL schema for the habit tracker SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id        TEXT PRIMARY KEY,
    email          TEXT NOT NULL UNIQUE,
    username       TEXT NOT NULL UNIQUE,
    password_hash  TEXT NOT NULL,    -- argon2 PHC string
    created_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS habits (
    habit_id     TEXT PRIMARY KEY,
    name         TEXT NOT NULL,
    description  TEXT,
    frequency    TEXT NOT NULL DEFAULT 'daily',  -- 'daily' | 'weekly' | 'monthly'
    created_at   TEXT NOT NULL,                  -- never updated
    updated_at   TEXT,
    owner_id     TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE
);

-- Completions are never updated, only inserted and deleted.
CREATE TABLE IF NOT EXISTS completions (
    completion_id   TEXT PRIMARY KEY,
    habit_id        TEXT NOT NULL REFERENCES habits(habit_id) ON DELETE CASCADE,
    completed_date  TEXT NOT NULL,   -- YYYY-MM-DD
    completed_at    TEXT NOT NULL,   -- RFC 3339 UTC; server-assigned
    notes           TEXT,
    rating          INTEGER CHECK (rating BETWEEN 1 AND 5),
    UNIQUE (habit_id, completed_date)
);

CREATE INDEX IF NOT EXISTS habits_owner_idx      ON habits(owner_id);
CREATE INDEX IF NOT EXISTS completions_habit_idx ON completions(habit_id, completed_date);

PRAGMA user_version = 1;
";
