//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`)
//! so that lexical order is chronological order. Skill lists are compact JSON
//! arrays. UUIDs are hyphenated lowercase strings.

use std::str::FromStr as _;

use affectation_core::{
  application::{Application, ApplicationStatus},
  offer::Offer,
  profile::{Profile, ResumeRef},
  resume::ResumeBlob,
};
use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

/// The current time at storage precision, so a freshly built value equals
/// the same value read back.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Skills ──────────────────────────────────────────────────────────────────

pub fn encode_skills(skills: &[String]) -> Result<String> {
  Ok(serde_json::to_string(skills)?)
}

pub fn decode_skills(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── ApplicationStatus ───────────────────────────────────────────────────────

pub fn decode_status(s: &str) -> Result<ApplicationStatus> {
  ApplicationStatus::from_str(s).map_err(|_| Error::UnknownValue {
    column: "status",
    value:  s.to_owned(),
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const PROFILE_COLUMNS: &str = "profile_id, name, given_name, email, city, track, level, \
   skills, resume_text, resume_blob_id, resume_filename, password_hash, created_at";

/// Raw values read directly from a `profiles` row.
pub struct RawProfile {
  pub profile_id:      String,
  pub name:            String,
  pub given_name:      Option<String>,
  pub email:           String,
  pub city:            Option<String>,
  pub track:           Option<String>,
  pub level:           Option<String>,
  pub skills:          String,
  pub resume_text:     Option<String>,
  pub resume_blob_id:  Option<String>,
  pub resume_filename: Option<String>,
  pub password_hash:   Option<String>,
  pub created_at:      String,
}

impl RawProfile {
  /// Read a row selected with [`PROFILE_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      profile_id:      row.get(0)?,
      name:            row.get(1)?,
      given_name:      row.get(2)?,
      email:           row.get(3)?,
      city:            row.get(4)?,
      track:           row.get(5)?,
      level:           row.get(6)?,
      skills:          row.get(7)?,
      resume_text:     row.get(8)?,
      resume_blob_id:  row.get(9)?,
      resume_filename: row.get(10)?,
      password_hash:   row.get(11)?,
      created_at:      row.get(12)?,
    })
  }

  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      id:            decode_uuid(&self.profile_id)?,
      name:          self.name,
      given_name:    self.given_name,
      email:         self.email,
      city:          self.city,
      track:         self.track,
      level:         self.level,
      skills:        decode_skills(&self.skills)?,
      resume_text:   self.resume_text,
      resume:        decode_resume_ref(self.resume_blob_id, self.resume_filename)?,
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// A reference is present only when the blob id is set.
pub fn decode_resume_ref(
  blob_id: Option<String>,
  filename: Option<String>,
) -> Result<Option<ResumeRef>> {
  blob_id
    .map(|id| {
      Ok(ResumeRef {
        blob_id:  decode_uuid(&id)?,
        filename: filename.unwrap_or_else(|| "cv".to_owned()),
      })
    })
    .transpose()
}

pub const OFFER_COLUMNS: &str =
  "offer_id, employer, title, city, description, skills, application_count, created_at";

/// Raw values read directly from an `offers` row.
pub struct RawOffer {
  pub offer_id:          String,
  pub employer:          String,
  pub title:             String,
  pub city:              Option<String>,
  pub description:       String,
  pub skills:            String,
  pub application_count: i64,
  pub created_at:        String,
}

impl RawOffer {
  /// Read a row selected with [`OFFER_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      offer_id:          row.get(0)?,
      employer:          row.get(1)?,
      title:             row.get(2)?,
      city:              row.get(3)?,
      description:       row.get(4)?,
      skills:            row.get(5)?,
      application_count: row.get(6)?,
      created_at:        row.get(7)?,
    })
  }

  pub fn into_offer(self) -> Result<Offer> {
    Ok(Offer {
      id:                decode_uuid(&self.offer_id)?,
      employer:          self.employer,
      title:             self.title,
      city:              self.city,
      description:       self.description,
      skills:            decode_skills(&self.skills)?,
      // The CHECK constraint keeps the column non-negative.
      application_count: self.application_count.max(0) as u64,
      created_at:        decode_dt(&self.created_at)?,
    })
  }
}

pub const APPLICATION_COLUMNS: &str =
  "application_id, profile_id, offer_id, message, status, created_at";

/// Raw values read directly from an `applications` row.
pub struct RawApplication {
  pub application_id: String,
  pub profile_id:     String,
  pub offer_id:       String,
  pub message:        Option<String>,
  pub status:         String,
  pub created_at:     String,
}

impl RawApplication {
  /// Read a row selected with [`APPLICATION_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      application_id: row.get(0)?,
      profile_id:     row.get(1)?,
      offer_id:       row.get(2)?,
      message:        row.get(3)?,
      status:         row.get(4)?,
      created_at:     row.get(5)?,
    })
  }

  pub fn into_application(self) -> Result<Application> {
    Ok(Application {
      id:         decode_uuid(&self.application_id)?,
      profile_id: decode_uuid(&self.profile_id)?,
      offer_id:   decode_uuid(&self.offer_id)?,
      message:    self.message,
      status:     decode_status(&self.status)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `resume_blobs` row.
pub struct RawBlob {
  pub blob_id:      String,
  pub content:      Vec<u8>,
  pub media_type:   String,
  pub filename:     String,
  pub content_hash: String,
  pub uploaded_at:  String,
}

impl RawBlob {
  pub fn into_blob(self) -> Result<ResumeBlob> {
    Ok(ResumeBlob {
      blob_id:      decode_uuid(&self.blob_id)?,
      content:      self.content.into(),
      media_type:   self.media_type,
      filename:     self.filename,
      content_hash: self.content_hash,
      uploaded_at:  decode_dt(&self.uploaded_at)?,
    })
  }
}

/// Whether `e` is a UNIQUE/CHECK constraint violation.
pub fn is_constraint_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(err, _)
      if err.code == rusqlite::ErrorCode::ConstraintViolation
  )
}
