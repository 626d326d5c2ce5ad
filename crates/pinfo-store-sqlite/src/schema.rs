//! SQL schema for the primary store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS personal_informations (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    correlation_id TEXT UNIQUE,      -- shared with the document store; NULL on legacy rows
    first_name     TEXT NOT NULL,
    last_name      TEXT NOT NULL,
    email          TEXT NOT NULL,
    date_of_birth  TEXT NOT NULL,    -- YYYY-MM-DD
    state          TEXT NOT NULL,
    city           TEXT NOT NULL,
    country        TEXT NOT NULL,
    image          TEXT,             -- blob key, relative to the blob root
    created_at     TEXT NOT NULL,    -- RFC 3339 UTC
    updated_at     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS personal_informations_name_idx
    ON personal_informations(first_name, last_name);

PRAGMA user_version = 1;
";
