//! SQL schema for the AgroStudy SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,
    display_name  TEXT NOT NULL,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    created_at    TEXT NOT NULL    -- ISO 8601 UTC
);

-- One table for every owner-scoped collection. The payload column holds
-- the full row as JSON; id, owner_id and the timestamps are duplicated
-- into columns for filtering. The store is authoritative for the
-- timestamps and rewrites them into the payload on every write.
CREATE TABLE IF NOT EXISTS rows (
    collection  TEXT NOT NULL,
    id          TEXT NOT NULL,
    owner_id    TEXT NOT NULL REFERENCES users(user_id),
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    payload     TEXT NOT NULL,
    PRIMARY KEY (collection, id)
);

-- Object storage. Payloads are small (photos, PDFs); no streaming.
CREATE TABLE IF NOT EXISTS objects (
    bucket      TEXT NOT NULL,
    path        TEXT NOT NULL,
    bytes       BLOB NOT NULL,
    created_at  TEXT NOT NULL,
    PRIMARY KEY (bucket, path)
);

CREATE INDEX IF NOT EXISTS rows_owner_idx ON rows(collection, owner_id);

PRAGMA user_version = 1;
";
