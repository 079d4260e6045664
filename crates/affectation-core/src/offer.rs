//! Internship offers ("offres") and their query type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An internship offer as persisted by the store.
///
/// `application_count` is denormalised: it is incremented each time an
/// application is recorded against the offer and never decremented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
  pub id:                Uuid,
  #[serde(rename = "entrepriseNom")]
  pub employer:          String,
  #[serde(rename = "titre")]
  pub title:             String,
  #[serde(rename = "ville")]
  pub city:              Option<String>,
  pub description:       String,
  #[serde(rename = "competences")]
  pub skills:            Vec<String>,
  #[serde(rename = "nbCandidatures")]
  pub application_count: u64,
  pub created_at:        DateTime<Utc>,
}

/// Fields accepted when publishing an offer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewOffer {
  #[serde(rename = "entrepriseNom")]
  pub employer:    String,
  #[serde(rename = "titre")]
  pub title:       String,
  #[serde(rename = "ville", default)]
  pub city:        Option<String>,
  #[serde(default)]
  pub description: String,
  #[serde(rename = "competences", default)]
  pub skills:      Vec<String>,
}

/// Sort direction over `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OfferOrder {
  #[default]
  NewestFirst,
  /// Insertion order; the natural scan order of the collection.
  OldestFirst,
}

/// Parameters for [`PlacementStore::list_offers`](crate::store::PlacementStore::list_offers).
///
/// All set filters must match.
#[derive(Debug, Clone, Default)]
pub struct OfferFilter {
  /// Exact match on the offer city.
  pub city:     Option<String>,
  /// The offer's skill list must contain this tag.
  pub skill:    Option<String>,
  /// Exact match on the employer name.
  pub employer: Option<String>,
  pub order:    OfferOrder,
  pub limit:    Option<usize>,
}

impl OfferFilter {
  /// The `limit` most recent offers, unfiltered.
  pub fn latest(limit: usize) -> Self {
    Self { limit: Some(limit), ..Self::default() }
  }

  /// Every offer in insertion order.
  pub fn scan() -> Self {
    Self { order: OfferOrder::OldestFirst, ..Self::default() }
  }
}
