//! Candidate profiles ("stagiaires").
//!
//! Field names on the wire follow the French camelCase vocabulary of the
//! platform's front end; Rust names stay English.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Résumé reference ────────────────────────────────────────────────────────

/// Weak reference from a profile to its stored résumé blob.
///
/// The blob's lifecycle is managed by the store; dropping a reference does not
/// cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRef {
  pub blob_id:  Uuid,
  pub filename: String,
}

// ─── Stored profile ──────────────────────────────────────────────────────────

/// A candidate profile as persisted by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
  pub id:            Uuid,
  #[serde(rename = "nom")]
  pub name:          String,
  #[serde(rename = "prenom")]
  pub given_name:    Option<String>,
  pub email:         String,
  #[serde(rename = "ville")]
  pub city:          Option<String>,
  #[serde(rename = "filiere")]
  pub track:         Option<String>,
  #[serde(rename = "niveau")]
  pub level:         Option<String>,
  #[serde(rename = "competences")]
  pub skills:        Vec<String>,
  #[serde(rename = "cvText")]
  pub resume_text:   Option<String>,
  #[serde(skip)]
  pub resume:        Option<ResumeRef>,
  /// argon2 PHC string. Never leaves the process.
  #[serde(skip)]
  pub password_hash: Option<String>,
  pub created_at:    DateTime<Utc>,
}

// ─── Projection ──────────────────────────────────────────────────────────────

/// Output shape of a profile (`StagiaireOut`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
  #[serde(flatten)]
  pub profile:     Profile,
  /// Download URL of the attached résumé, if any.
  pub cv_url:      Option<String>,
  pub cv_filename: Option<String>,
}

impl From<Profile> for ProfileView {
  fn from(profile: Profile) -> Self {
    let cv_url = profile
      .resume
      .as_ref()
      .map(|_| format!("/api/stagiaires/{}/cv", profile.id));
    let cv_filename = profile.resume.as_ref().map(|r| r.filename.clone());
    Self { profile, cv_url, cv_filename }
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Fields accepted when creating a profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewProfile {
  #[serde(rename = "nom")]
  pub name:        String,
  #[serde(rename = "prenom", default)]
  pub given_name:  Option<String>,
  pub email:       String,
  #[serde(rename = "ville", default)]
  pub city:        Option<String>,
  #[serde(rename = "filiere", default)]
  pub track:       Option<String>,
  #[serde(rename = "niveau", default)]
  pub level:       Option<String>,
  #[serde(rename = "competences", default)]
  pub skills:      Vec<String>,
  #[serde(rename = "cvText", alias = "cv_text", default)]
  pub resume_text: Option<String>,
}

/// A partial update: only `Some` fields are written.
///
/// JSON `null` and an absent key both deserialise to `None`, so neither can
/// clear a stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
  #[serde(rename = "nom", default)]
  pub name:        Option<String>,
  #[serde(rename = "prenom", default)]
  pub given_name:  Option<String>,
  #[serde(rename = "ville", default)]
  pub city:        Option<String>,
  #[serde(rename = "filiere", default)]
  pub track:       Option<String>,
  #[serde(rename = "niveau", default)]
  pub level:       Option<String>,
  #[serde(rename = "competences", default)]
  pub skills:      Option<Vec<String>>,
  #[serde(rename = "cvText", alias = "cv_text", default)]
  pub resume_text: Option<String>,
}

impl ProfilePatch {
  pub fn is_empty(&self) -> bool { *self == Self::default() }

  /// Apply the supplied fields to `profile` in place.
  pub fn apply(&self, profile: &mut Profile) {
    if let Some(v) = &self.name {
      profile.name = v.clone();
    }
    if let Some(v) = &self.given_name {
      profile.given_name = Some(v.clone());
    }
    if let Some(v) = &self.city {
      profile.city = Some(v.clone());
    }
    if let Some(v) = &self.track {
      profile.track = Some(v.clone());
    }
    if let Some(v) = &self.level {
      profile.level = Some(v.clone());
    }
    if let Some(v) = &self.skills {
      profile.skills = v.clone();
    }
    if let Some(v) = &self.resume_text {
      profile.resume_text = Some(v.clone());
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample() -> Profile {
    Profile {
      id:            Uuid::new_v4(),
      name:          "Durand".into(),
      given_name:    Some("Léa".into()),
      email:         "lea@example.com".into(),
      city:          Some("Lyon".into()),
      track:         None,
      level:         None,
      skills:        vec!["Python".into()],
      resume_text:   None,
      resume:        None,
      password_hash: Some("$argon2id$secret".into()),
      created_at:    Utc::now(),
    }
  }

  #[test]
  fn empty_patch_is_detected() {
    assert!(ProfilePatch::default().is_empty());
    let patch: ProfilePatch =
      serde_json::from_str(r#"{"ville":null,"competences":null}"#).unwrap();
    assert!(patch.is_empty());
  }

  #[test]
  fn patch_only_touches_supplied_fields() {
    let mut p = sample();
    let patch = ProfilePatch {
      level: Some("M2".into()),
      skills: Some(vec!["Rust".into(), "SQL".into()]),
      ..Default::default()
    };
    patch.apply(&mut p);
    assert_eq!(p.level.as_deref(), Some("M2"));
    assert_eq!(p.skills, vec!["Rust", "SQL"]);
    assert_eq!(p.city.as_deref(), Some("Lyon"));
    assert_eq!(p.name, "Durand");
  }

  #[test]
  fn view_hides_password_and_exposes_cv_url() {
    let mut p = sample();
    let id = p.id;
    p.resume = Some(ResumeRef { blob_id: Uuid::new_v4(), filename: "cv.pdf".into() });

    let json = serde_json::to_value(ProfileView::from(p)).unwrap();
    assert!(json.get("passwordHash").is_none());
    assert!(json.get("password_hash").is_none());
    assert_eq!(json["nom"], "Durand");
    assert_eq!(json["competences"][0], "Python");
    assert_eq!(json["cvUrl"], format!("/api/stagiaires/{id}/cv"));
    assert_eq!(json["cvFilename"], "cv.pdf");
  }

  #[test]
  fn view_without_resume_has_null_cv_url() {
    let json = serde_json::to_value(ProfileView::from(sample())).unwrap();
    assert!(json["cvUrl"].is_null());
  }
}
