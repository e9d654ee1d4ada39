//! SQL schema for the Rolodex SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS contacts (
    contact_id  TEXT PRIMARY KEY,
    firstname   TEXT NOT NULL,
    lastname    TEXT NOT NULL,
    email       TEXT NOT NULL UNIQUE,  -- exact-match; the constraint is the uniqueness arbiter
    created_at  TEXT NOT NULL          -- ISO 8601 UTC; server-assigned
);

-- A phone belongs to exactly one contact and is written in the same
-- transaction as its contact row. Deletes are issued explicitly; the
-- CASCADE clause is a backstop only.
CREATE TABLE IF NOT EXISTS phones (
    phone_id    TEXT PRIMARY KEY,
    contact_id  TEXT NOT NULL REFERENCES contacts(contact_id) ON DELETE CASCADE,
    phone_type  TEXT NOT NULL,         -- 'home' | 'office' | 'mobile' | free-form
    number      TEXT NOT NULL,
    position    INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS contacts_lastname_idx ON contacts(lastname, firstname);
CREATE INDEX IF NOT EXISTS phones_contact_idx    ON phones(contact_id);

PRAGMA user_version = 1;
";
