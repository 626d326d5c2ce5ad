//! SQL schema for the document store.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per document. `seq` preserves insertion order, which is the order
-- lookups return ties in.
CREATE TABLE IF NOT EXISTS documents (
    seq        INTEGER PRIMARY KEY AUTOINCREMENT,
    id         TEXT NOT NULL UNIQUE,
    collection TEXT NOT NULL,
    body       TEXT NOT NULL,   -- JSON object
    deleted_at TEXT             -- RFC 3339 UTC; NULL while live
);

CREATE INDEX IF NOT EXISTS documents_collection_idx
    ON documents(collection, deleted_at);

PRAGMA user_version = 1;
";
