//! Application Service: submission with per-pair deduplication.

use uuid::Uuid;

use crate::{
  Error,
  Result,
  application::{ApplicationSummary, NewApplication, SubmissionReceipt},
  service::{lookup_id, offers::OFFER_NOT_FOUND, profiles::PROFILE_NOT_FOUND},
  store::PlacementStore,
};

const ALREADY_APPLIED: &str = "Vous avez déjà postulé à cette offre";

pub struct Applications<'a, S> {
  store: &'a S,
}

impl<'a, S: PlacementStore> Applications<'a, S> {
  pub fn new(store: &'a S) -> Self { Self { store } }

  /// Apply to an offer on behalf of a profile.
  ///
  /// Both ids must parse, both documents must exist and the profile must not
  /// have applied to this offer before. On success the application is stored
  /// as `submitted` and the offer's counter goes up by one.
  pub async fn submit(
    &self,
    profile_id: &str,
    offer_id: &str,
    message: Option<String>,
  ) -> Result<SubmissionReceipt> {
    let (profile_id, offer_id) =
      match (Uuid::parse_str(profile_id.trim()), Uuid::parse_str(offer_id.trim())) {
        (Ok(p), Ok(o)) => (p, o),
        _ => return Err(Error::bad_request("ID stagiaire ou offre invalide")),
      };

    self
      .store
      .get_profile(profile_id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(PROFILE_NOT_FOUND))?;

    self
      .store
      .get_offer(offer_id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(OFFER_NOT_FOUND))?;

    let existing = self
      .store
      .find_application(profile_id, offer_id)
      .await
      .map_err(Error::store)?;
    if existing.is_some() {
      return Err(Error::conflict(ALREADY_APPLIED));
    }

    let message = message.filter(|m| !m.trim().is_empty());
    let application = self
      .store
      .record_application(NewApplication { profile_id, offer_id, message })
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::conflict(ALREADY_APPLIED))?;

    tracing::info!(
      application_id = %application.id,
      %profile_id,
      %offer_id,
      "application submitted"
    );

    Ok(SubmissionReceipt {
      status:         "ok".to_owned(),
      message:        "Candidature envoyée".to_owned(),
      candidature_id: application.id,
    })
  }

  /// A profile's applications, newest first, each with the offer's title and
  /// employer. A deleted offer yields `None` enrichment instead of an error.
  pub async fn list_for_profile(&self, profile_id: &str) -> Result<Vec<ApplicationSummary>> {
    let profile_id = lookup_id(profile_id, PROFILE_NOT_FOUND)?;
    let applications = self
      .store
      .list_applications(profile_id)
      .await
      .map_err(Error::store)?;

    let mut summaries = Vec::with_capacity(applications.len());
    for application in applications {
      let offer = self
        .store
        .get_offer(application.offer_id)
        .await
        .map_err(Error::store)?;
      let (offer_title, employer) = match offer {
        Some(o) => (Some(o.title), Some(o.employer)),
        None => (None, None),
      };
      summaries.push(ApplicationSummary { application, offer_title, employer });
    }
    Ok(summaries)
  }
}
