//! [`SqliteStore`]: the SQLite implementation of [`PlacementStore`].

use std::path::Path;

use affectation_core::{
  application::{Application, ApplicationStatus, NewApplication},
  offer::{NewOffer, Offer, OfferFilter, OfferOrder},
  profile::{NewProfile, Profile, ProfilePatch, ResumeRef},
  resume::{NewResumeBlob, ResumeBlob},
  store::PlacementStore,
};
use rusqlite::{OptionalExtension as _, types::Value};
use uuid::Uuid;

use crate::{
  Result,
  encode::{
    APPLICATION_COLUMNS, OFFER_COLUMNS, PROFILE_COLUMNS, RawApplication, RawBlob, RawOffer,
    RawProfile, decode_resume_ref, encode_dt, encode_skills, encode_uuid,
    is_constraint_violation, now,
  },
  schema::SCHEMA,
};

// ─── Row helpers ─────────────────────────────────────────────────────────────

fn select_profile(
  conn: &rusqlite::Connection,
  id: &str,
) -> rusqlite::Result<Option<RawProfile>> {
  conn
    .query_row(
      &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE profile_id = ?1"),
      rusqlite::params![id],
      RawProfile::from_row,
    )
    .optional()
}

fn select_offer(conn: &rusqlite::Connection, id: &str) -> rusqlite::Result<Option<RawOffer>> {
  conn
    .query_row(
      &format!("SELECT {OFFER_COLUMNS} FROM offers WHERE offer_id = ?1"),
      rusqlite::params![id],
      RawOffer::from_row,
    )
    .optional()
}

fn count_rows(conn: &rusqlite::Connection, sql: &str, params: impl rusqlite::Params) -> rusqlite::Result<u64> {
  let n: i64 = conn.query_row(sql, params, |r| r.get(0))?;
  Ok(n.max(0) as u64)
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Affectation store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── PlacementStore impl ─────────────────────────────────────────────────────

impl PlacementStore for SqliteStore {
  type Error = crate::Error;

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn insert_profile(
    &self,
    input: NewProfile,
    password_hash: Option<String>,
  ) -> Result<Option<Profile>> {
    let profile = Profile {
      id:            Uuid::new_v4(),
      name:          input.name,
      given_name:    input.given_name,
      email:         input.email,
      city:          input.city,
      track:         input.track,
      level:         input.level,
      skills:        input.skills,
      resume_text:   input.resume_text,
      resume:        None,
      password_hash,
      created_at:    now(),
    };

    let id_str     = encode_uuid(profile.id);
    let skills_str = encode_skills(&profile.skills)?;
    let at_str     = encode_dt(profile.created_at);
    let row = (
      profile.name.clone(),
      profile.given_name.clone(),
      profile.email.clone(),
      profile.city.clone(),
      profile.track.clone(),
      profile.level.clone(),
      profile.resume_text.clone(),
      profile.password_hash.clone(),
    );

    let inserted = self
      .conn
      .call(move |conn| {
        let (name, given_name, email, city, track, level, resume_text, password_hash) = row;
        match conn.execute(
          "INSERT INTO profiles (
             profile_id, name, given_name, email, city, track, level,
             skills, resume_text, password_hash, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            id_str,
            name,
            given_name,
            email,
            city,
            track,
            level,
            skills_str,
            resume_text,
            password_hash,
            at_str,
          ],
        ) {
          Ok(_) => Ok(true),
          Err(e) if is_constraint_violation(&e) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    Ok(inserted.then_some(profile))
  }

  async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| Ok(select_profile(conn, &id_str)?))
      .await?;
    raw.map(RawProfile::into_profile).transpose()
  }

  async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>> {
    let email = email.to_owned();
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE email = ?1"),
              rusqlite::params![email],
              RawProfile::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawProfile::into_profile).transpose()
  }

  async fn list_profiles(&self) -> Result<Vec<Profile>> {
    let raws: Vec<RawProfile> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map([], RawProfile::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawProfile::into_profile).collect()
  }

  async fn update_profile(&self, id: Uuid, patch: &ProfilePatch) -> Result<Option<Profile>> {
    // Build the SET clause from the supplied fields only.
    let mut sets: Vec<&'static str> = vec![];
    let mut values: Vec<Value> = vec![];
    let mut push = |column: &'static str, value: Value| {
      sets.push(column);
      values.push(value);
    };
    if let Some(v) = &patch.name {
      push("name", Value::Text(v.clone()));
    }
    if let Some(v) = &patch.given_name {
      push("given_name", Value::Text(v.clone()));
    }
    if let Some(v) = &patch.city {
      push("city", Value::Text(v.clone()));
    }
    if let Some(v) = &patch.track {
      push("track", Value::Text(v.clone()));
    }
    if let Some(v) = &patch.level {
      push("level", Value::Text(v.clone()));
    }
    if let Some(v) = &patch.skills {
      push("skills", Value::Text(encode_skills(v)?));
    }
    if let Some(v) = &patch.resume_text {
      push("resume_text", Value::Text(v.clone()));
    }

    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| {
        if !sets.is_empty() {
          let assignments = sets
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{column} = ?{}", i + 2))
            .collect::<Vec<_>>()
            .join(", ");
          let sql = format!("UPDATE profiles SET {assignments} WHERE profile_id = ?1");
          let params = std::iter::once(Value::Text(id_str.clone())).chain(values);
          conn.execute(&sql, rusqlite::params_from_iter(params))?;
        }
        Ok(select_profile(conn, &id_str)?)
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  async fn swap_resume(
    &self,
    profile_id: Uuid,
    resume: ResumeRef,
  ) -> Result<Option<Option<ResumeRef>>> {
    let id_str   = encode_uuid(profile_id);
    let blob_str = encode_uuid(resume.blob_id);
    let filename = resume.filename;

    let previous: Option<(Option<String>, Option<String>)> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let previous = tx
          .query_row(
            "SELECT resume_blob_id, resume_filename FROM profiles WHERE profile_id = ?1",
            rusqlite::params![id_str],
            |r| Ok((r.get::<_, Option<String>>(0)?, r.get::<_, Option<String>>(1)?)),
          )
          .optional()?;
        if previous.is_none() {
          return Ok(None);
        }
        tx.execute(
          "UPDATE profiles SET resume_blob_id = ?2, resume_filename = ?3 WHERE profile_id = ?1",
          rusqlite::params![id_str, blob_str, filename],
        )?;
        tx.commit()?;
        Ok(previous)
      })
      .await?;

    previous
      .map(|(blob_id, filename)| decode_resume_ref(blob_id, filename))
      .transpose()
  }

  async fn count_profiles(&self) -> Result<u64> {
    Ok(
      self
        .conn
        .call(|conn| Ok(count_rows(conn, "SELECT COUNT(*) FROM profiles", rusqlite::params![])?))
        .await?,
    )
  }

  // ── Résumé blobs ──────────────────────────────────────────────────────────

  async fn put_blob(&self, blob: NewResumeBlob) -> Result<ResumeBlob> {
    let stored = ResumeBlob {
      blob_id:      Uuid::new_v4(),
      content:      blob.content,
      media_type:   blob.media_type,
      filename:     blob.filename,
      content_hash: blob.content_hash,
      uploaded_at:  now(),
    };

    let id_str       = encode_uuid(stored.blob_id);
    let content      = stored.content.clone();
    let media_type   = stored.media_type.clone();
    let filename     = stored.filename.clone();
    let content_hash = stored.content_hash.clone();
    let at_str       = encode_dt(stored.uploaded_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO resume_blobs (blob_id, content, media_type, filename, content_hash, uploaded_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, &content[..], media_type, filename, content_hash, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(stored)
  }

  async fn get_blob(&self, blob_id: Uuid) -> Result<Option<ResumeBlob>> {
    let id_str = encode_uuid(blob_id);
    let raw: Option<RawBlob> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT blob_id, content, media_type, filename, content_hash, uploaded_at
               FROM resume_blobs WHERE blob_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawBlob {
                  blob_id:      row.get(0)?,
                  content:      row.get(1)?,
                  media_type:   row.get(2)?,
                  filename:     row.get(3)?,
                  content_hash: row.get(4)?,
                  uploaded_at:  row.get(5)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawBlob::into_blob).transpose()
  }

  async fn delete_blob(&self, blob_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(blob_id);
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM resume_blobs WHERE blob_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }

  // ── Offers ────────────────────────────────────────────────────────────────

  async fn insert_offer(&self, input: NewOffer) -> Result<Offer> {
    let offer = Offer {
      id:                Uuid::new_v4(),
      employer:          input.employer,
      title:             input.title,
      city:              input.city,
      description:       input.description,
      skills:            input.skills,
      application_count: 0,
      created_at:        now(),
    };

    let id_str      = encode_uuid(offer.id);
    let employer    = offer.employer.clone();
    let title       = offer.title.clone();
    let city        = offer.city.clone();
    let description = offer.description.clone();
    let skills_str  = encode_skills(&offer.skills)?;
    let at_str      = encode_dt(offer.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO offers (
             offer_id, employer, title, city, description, skills,
             application_count, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)",
          rusqlite::params![id_str, employer, title, city, description, skills_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(offer)
  }

  async fn get_offer(&self, id: Uuid) -> Result<Option<Offer>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| Ok(select_offer(conn, &id_str)?))
      .await?;
    raw.map(RawOffer::into_offer).transpose()
  }

  async fn list_offers(&self, filter: &OfferFilter) -> Result<Vec<Offer>> {
    let city      = filter.city.clone();
    let skill     = filter.skill.clone();
    let employer  = filter.employer.clone();
    let direction = match filter.order {
      OfferOrder::NewestFirst => "DESC",
      OfferOrder::OldestFirst => "ASC",
    };
    // SQLite treats a negative LIMIT as "no limit".
    let limit_val = filter.limit.map_or(-1, |l| l as i64);

    let raws: Vec<RawOffer> = self
      .conn
      .call(move |conn| {
        // Build WHERE clause dynamically.
        let mut conds: Vec<&'static str> = vec![];
        if city.is_some() {
          conds.push("city = ?1");
        }
        if skill.is_some() {
          conds.push("EXISTS (SELECT 1 FROM json_each(offers.skills) WHERE json_each.value = ?2)");
        }
        if employer.is_some() {
          conds.push("employer = ?3");
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let sql = format!(
          "SELECT {OFFER_COLUMNS} FROM offers
           {where_clause}
           ORDER BY created_at {direction}, rowid {direction}
           LIMIT ?4"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![city.as_deref(), skill.as_deref(), employer.as_deref(), limit_val],
            RawOffer::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawOffer::into_offer).collect()
  }

  async fn delete_offer(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM offers WHERE offer_id = ?1", rusqlite::params![id_str])?)
      })
      .await?;
    Ok(deleted > 0)
  }

  async fn count_offers(&self) -> Result<u64> {
    Ok(
      self
        .conn
        .call(|conn| Ok(count_rows(conn, "SELECT COUNT(*) FROM offers", rusqlite::params![])?))
        .await?,
    )
  }

  // ── Applications ──────────────────────────────────────────────────────────

  async fn record_application(&self, input: NewApplication) -> Result<Option<Application>> {
    let application = Application {
      id:         Uuid::new_v4(),
      profile_id: input.profile_id,
      offer_id:   input.offer_id,
      message:    input.message,
      status:     ApplicationStatus::Submitted,
      created_at: now(),
    };

    let id_str      = encode_uuid(application.id);
    let profile_str = encode_uuid(application.profile_id);
    let offer_str   = encode_uuid(application.offer_id);
    let message     = application.message.clone();
    let status_str  = application.status.to_string();
    let at_str      = encode_dt(application.created_at);

    // Insert and counter increment commit together or not at all.
    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        match tx.execute(
          "INSERT INTO applications (application_id, profile_id, offer_id, message, status, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, profile_str, offer_str, message, status_str, at_str],
        ) {
          Ok(_) => {}
          Err(e) if is_constraint_violation(&e) => return Ok(false),
          Err(e) => return Err(e.into()),
        }
        tx.execute(
          "UPDATE offers SET application_count = application_count + 1 WHERE offer_id = ?1",
          rusqlite::params![offer_str],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if inserted {
      tracing::debug!(application_id = %application.id, "application row committed");
    }
    Ok(inserted.then_some(application))
  }

  async fn find_application(&self, profile_id: Uuid, offer_id: Uuid) -> Result<Option<Application>> {
    let profile_str = encode_uuid(profile_id);
    let offer_str   = encode_uuid(offer_id);
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {APPLICATION_COLUMNS} FROM applications
                 WHERE profile_id = ?1 AND offer_id = ?2"
              ),
              rusqlite::params![profile_str, offer_str],
              RawApplication::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawApplication::into_application).transpose()
  }

  async fn list_applications(&self, profile_id: Uuid) -> Result<Vec<Application>> {
    let profile_str = encode_uuid(profile_id);
    let raws: Vec<RawApplication> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {APPLICATION_COLUMNS} FROM applications
           WHERE profile_id = ?1
           ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![profile_str], RawApplication::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawApplication::into_application).collect()
  }

  async fn count_applications(&self, profile_id: Option<Uuid>) -> Result<u64> {
    let profile_str = profile_id.map(encode_uuid);
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(match profile_str {
            Some(p) => count_rows(
              conn,
              "SELECT COUNT(*) FROM applications WHERE profile_id = ?1",
              rusqlite::params![p],
            )?,
            None => count_rows(conn, "SELECT COUNT(*) FROM applications", rusqlite::params![])?,
          })
        })
        .await?,
    )
  }
}
