//! SQL schema for the Affectation SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// No foreign keys: applications keep pointing at offers that have been
/// deleted.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS profiles (
    profile_id      TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    given_name      TEXT,
    email           TEXT NOT NULL UNIQUE,
    city            TEXT,
    track           TEXT,
    level           TEXT,
    skills          TEXT NOT NULL DEFAULT '[]',   -- JSON array of tags
    resume_text     TEXT,
    resume_blob_id  TEXT,                         -- weak ref into resume_blobs
    resume_filename TEXT,
    password_hash   TEXT,                         -- argon2 PHC string
    created_at      TEXT NOT NULL                 -- RFC 3339, micros, UTC
);

CREATE TABLE IF NOT EXISTS offers (
    offer_id          TEXT PRIMARY KEY,
    employer          TEXT NOT NULL,
    title             TEXT NOT NULL,
    city              TEXT,
    description       TEXT NOT NULL DEFAULT '',
    skills            TEXT NOT NULL DEFAULT '[]',
    application_count INTEGER NOT NULL DEFAULT 0 CHECK (application_count >= 0),
    created_at        TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS applications (
    application_id TEXT PRIMARY KEY,
    profile_id     TEXT NOT NULL,
    offer_id       TEXT NOT NULL,
    message        TEXT,
    status         TEXT NOT NULL DEFAULT 'submitted',
    created_at     TEXT NOT NULL,
    UNIQUE (profile_id, offer_id)
);

CREATE TABLE IF NOT EXISTS resume_blobs (
    blob_id      TEXT PRIMARY KEY,
    content      BLOB NOT NULL,
    media_type   TEXT NOT NULL,
    filename     TEXT NOT NULL,
    content_hash TEXT NOT NULL,                   -- SHA-256 hex
    uploaded_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS profiles_created_idx     ON profiles(created_at);
CREATE INDEX IF NOT EXISTS offers_created_idx       ON offers(created_at);
CREATE INDEX IF NOT EXISTS applications_profile_idx ON applications(profile_id);

PRAGMA user_version = 1;
";
