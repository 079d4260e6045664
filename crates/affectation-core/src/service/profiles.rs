//! Profile Manager: candidate CRUD and résumé attachment.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error,
  Result,
  password::hash_password,
  profile::{NewProfile, ProfilePatch, ProfileView, ResumeRef},
  resume::{DEFAULT_MEDIA_TYPE, NewResumeBlob, ResumeBlob, is_allowed_media_type},
  service::lookup_id,
  store::PlacementStore,
};

pub(crate) const PROFILE_NOT_FOUND: &str = "Stagiaire non trouvé";

/// Response body of a successful résumé upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeUpload {
  pub message:     String,
  pub cv_id:       Uuid,
  pub cv_filename: String,
}

pub struct Profiles<'a, S> {
  store: &'a S,
}

impl<'a, S: PlacementStore> Profiles<'a, S> {
  pub fn new(store: &'a S) -> Self { Self { store } }

  /// Create a profile. The email must not be in use; `password`, when given,
  /// is stored as an argon2 hash.
  pub async fn create(
    &self,
    input: NewProfile,
    password: Option<&str>,
  ) -> Result<ProfileView> {
    if input.name.trim().is_empty() {
      return Err(Error::bad_request("Le nom est obligatoire"));
    }
    if !input.email.contains('@') {
      return Err(Error::bad_request("Email invalide"));
    }

    let existing = self
      .store
      .find_profile_by_email(&input.email)
      .await
      .map_err(Error::store)?;
    if existing.is_some() {
      return Err(Error::conflict("Email déjà utilisé"));
    }

    let password_hash = password.map(hash_password).transpose()?;

    // The store's unique index catches a concurrent create that slipped past
    // the lookup above.
    let profile = self
      .store
      .insert_profile(input, password_hash)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::conflict("Email déjà utilisé"))?;

    tracing::info!(profile_id = %profile.id, "profile created");
    Ok(profile.into())
  }

  pub async fn get(&self, id: &str) -> Result<ProfileView> {
    let id = lookup_id(id, PROFILE_NOT_FOUND)?;
    self
      .store
      .get_profile(id)
      .await
      .map_err(Error::store)?
      .map(ProfileView::from)
      .ok_or_else(|| Error::not_found(PROFILE_NOT_FOUND))
  }

  /// Merge the supplied fields of `patch` into the profile.
  pub async fn update(&self, id: &str, patch: &ProfilePatch) -> Result<ProfileView> {
    let id = lookup_id(id, PROFILE_NOT_FOUND)?;
    if patch.is_empty() {
      return Err(Error::bad_request("Aucun champ à mettre à jour"));
    }

    let profile = self
      .store
      .update_profile(id, patch)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(PROFILE_NOT_FOUND))?;

    tracing::info!(profile_id = %id, "profile updated");
    Ok(profile.into())
  }

  /// Every profile, newest first.
  pub async fn list(&self) -> Result<Vec<ProfileView>> {
    let profiles = self.store.list_profiles().await.map_err(Error::store)?;
    Ok(profiles.into_iter().map(ProfileView::from).collect())
  }

  /// Store `content` as the profile's résumé, replacing any previous one.
  ///
  /// The new blob is written and the reference switched before the old blob
  /// is removed, so a failure at any point leaves the profile pointing at a
  /// valid blob. Deleting the old blob is best-effort.
  pub async fn attach_resume(
    &self,
    id: &str,
    content: Bytes,
    filename: Option<String>,
    media_type: Option<String>,
  ) -> Result<ResumeUpload> {
    let id = lookup_id(id, PROFILE_NOT_FOUND)?;
    self
      .store
      .get_profile(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(PROFILE_NOT_FOUND))?;

    let media_type = media_type.unwrap_or_default();
    if !is_allowed_media_type(&media_type) {
      return Err(Error::bad_request("Format non autorisé"));
    }
    if content.is_empty() {
      return Err(Error::bad_request("Fichier vide"));
    }

    let filename = filename
      .filter(|f| !f.trim().is_empty())
      .unwrap_or_else(|| "cv".to_owned());

    let blob = self
      .store
      .put_blob(NewResumeBlob::new(content, filename.clone(), media_type))
      .await
      .map_err(Error::store)?;

    let new_ref = ResumeRef { blob_id: blob.blob_id, filename: filename.clone() };
    let previous = match self.store.swap_resume(id, new_ref).await {
      Ok(Some(previous)) => previous,
      Ok(None) => {
        // Profile vanished between the lookup and the swap.
        self.discard_blob(blob.blob_id).await;
        return Err(Error::not_found(PROFILE_NOT_FOUND));
      }
      Err(e) => {
        self.discard_blob(blob.blob_id).await;
        return Err(Error::store(e));
      }
    };

    if let Some(old) = previous {
      self.discard_blob(old.blob_id).await;
    }

    tracing::info!(
      profile_id = %id,
      blob_id = %blob.blob_id,
      size = blob.content.len(),
      "resume uploaded"
    );

    Ok(ResumeUpload {
      message:     "CV uploaded".to_owned(),
      cv_id:       blob.blob_id,
      cv_filename: filename,
    })
  }

  /// Fetch the résumé attached to a profile. The returned blob carries the
  /// filename recorded on the profile and a non-empty media type.
  pub async fn fetch_resume(&self, id: &str) -> Result<ResumeBlob> {
    let id = lookup_id(id, PROFILE_NOT_FOUND)?;
    let profile = self
      .store
      .get_profile(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(PROFILE_NOT_FOUND))?;

    let resume = profile
      .resume
      .ok_or_else(|| Error::not_found("Aucun CV pour ce stagiaire"))?;

    let mut blob = match self.store.get_blob(resume.blob_id).await {
      Ok(Some(blob)) => blob,
      Ok(None) => {
        tracing::error!(profile_id = %id, blob_id = %resume.blob_id, "resume blob missing");
        return Err(Error::Internal("Erreur lors de la lecture du CV".to_owned()));
      }
      Err(e) => {
        tracing::error!(profile_id = %id, error = %e, "resume blob read failed");
        return Err(Error::Internal("Erreur lors de la lecture du CV".to_owned()));
      }
    };

    blob.filename = resume.filename;
    if blob.media_type.is_empty() {
      blob.media_type = DEFAULT_MEDIA_TYPE.to_owned();
    }
    Ok(blob)
  }

  /// Delete a blob, logging instead of failing.
  async fn discard_blob(&self, blob_id: Uuid) {
    match self.store.delete_blob(blob_id).await {
      Ok(true) => tracing::debug!(%blob_id, "resume blob deleted"),
      Ok(false) => tracing::warn!(%blob_id, "resume blob already gone"),
      Err(e) => tracing::warn!(%blob_id, error = %e, "failed to delete resume blob"),
    }
  }
}
