//! SQL schema for the Rolo SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS contacts (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name   TEXT NOT NULL,
    last_name    TEXT NOT NULL,
    email        TEXT NOT NULL,
    phone_number TEXT NOT NULL,
    birthday     TEXT NOT NULL,   -- calendar date, YYYY-MM-DD
    UNIQUE (phone_number)
);

CREATE INDEX IF NOT EXISTS contacts_first_name_idx ON contacts(first_name);
CREATE INDEX IF NOT EXISTS contacts_last_name_idx  ON contacts(last_name);
CREATE INDEX IF NOT EXISTS contacts_email_idx      ON contacts(email);

PRAGMA user_version = 1;
";
