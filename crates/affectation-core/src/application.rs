//! Applications ("candidatures") linking a profile to an offer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// Review state of an application.
///
/// Only `Submitted` is reachable today; there is no transition endpoint.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ApplicationStatus {
  #[default]
  Submitted,
  Accepted,
  Rejected,
}

/// A stored application. The `(profile_id, offer_id)` pair is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
  #[serde(rename = "candidatureId")]
  pub id:         Uuid,
  #[serde(rename = "stagiaireId")]
  pub profile_id: Uuid,
  #[serde(rename = "offreId")]
  pub offer_id:   Uuid,
  pub message:    Option<String>,
  pub status:     ApplicationStatus,
  pub created_at: DateTime<Utc>,
}

/// Input for [`PlacementStore::record_application`](crate::store::PlacementStore::record_application).
#[derive(Debug, Clone)]
pub struct NewApplication {
  pub profile_id: Uuid,
  pub offer_id:   Uuid,
  pub message:    Option<String>,
}

/// An application enriched with the referenced offer's title and employer.
///
/// Both are `None` when the offer has since been deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
  #[serde(flatten)]
  pub application:  Application,
  #[serde(rename = "offreTitre")]
  pub offer_title:  Option<String>,
  #[serde(rename = "entrepriseNom")]
  pub employer:     Option<String>,
}

/// Acknowledgement returned by a successful submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
  pub status:         String,
  pub message:        String,
  pub candidature_id: Uuid,
}

#[cfg(test)]
mod tests {
  use std::str::FromStr as _;

  use super::*;

  #[test]
  fn status_text_round_trips() {
    for s in [
      ApplicationStatus::Submitted,
      ApplicationStatus::Accepted,
      ApplicationStatus::Rejected,
    ] {
      assert_eq!(ApplicationStatus::from_str(s.as_ref()).unwrap(), s);
    }
    assert_eq!(ApplicationStatus::default().to_string(), "submitted");
    assert!(ApplicationStatus::from_str("envoyée").is_err());
  }
}
