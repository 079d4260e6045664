//! Recommendation Engine: rank offers by skill overlap with a profile.
//!
//! Scoring is a brute-force pass over every offer (no index), so the cost
//! grows with offers × skills. Fine for a single school's catalogue, not
//! beyond.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
  Error,
  Result,
  offer::{Offer, OfferFilter},
  service::{lookup_id, profiles::PROFILE_NOT_FOUND},
  store::PlacementStore,
};

/// An offer with its overlap score. `score` is `None` on the fallback path
/// (profile without skills).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
  #[serde(flatten)]
  pub offer: Offer,
  pub score: Option<usize>,
}

/// Score `offers` against `skills` and keep the best `top`.
///
/// The score is the size of the intersection between the two skill sets;
/// offers scoring zero are dropped. The sort is stable, so equal scores keep
/// the order of `offers`.
pub fn rank_offers(skills: &[String], offers: Vec<Offer>, top: usize) -> Vec<Recommendation> {
  let wanted: HashSet<&str> = skills.iter().map(String::as_str).collect();

  let mut ranked: Vec<Recommendation> = offers
    .into_iter()
    .filter_map(|offer| {
      let offered: HashSet<&str> = offer.skills.iter().map(String::as_str).collect();
      let score = wanted.intersection(&offered).count();
      (score > 0).then_some(Recommendation { offer, score: Some(score) })
    })
    .collect();

  ranked.sort_by(|a, b| b.score.cmp(&a.score));
  ranked.truncate(top);
  ranked
}

pub struct Recommender<'a, S> {
  store: &'a S,
}

impl<'a, S: PlacementStore> Recommender<'a, S> {
  pub fn new(store: &'a S) -> Self { Self { store } }

  /// Up to `top` offers for a profile, best match first.
  ///
  /// A profile with no skills gets the `top` most recent offers, unscored.
  pub async fn recommend(&self, profile_id: &str, top: usize) -> Result<Vec<Recommendation>> {
    let id = lookup_id(profile_id, PROFILE_NOT_FOUND)?;
    let profile = self
      .store
      .get_profile(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(PROFILE_NOT_FOUND))?;

    if profile.skills.is_empty() {
      let latest = self
        .store
        .list_offers(&OfferFilter::latest(top))
        .await
        .map_err(Error::store)?;
      tracing::debug!(profile_id = %id, count = latest.len(), "no skills, falling back to latest offers");
      return Ok(
        latest
          .into_iter()
          .map(|offer| Recommendation { offer, score: None })
          .collect(),
      );
    }

    let offers = self
      .store
      .list_offers(&OfferFilter::scan())
      .await
      .map_err(Error::store)?;
    let scanned = offers.len();
    let ranked = rank_offers(&profile.skills, offers, top);
    tracing::debug!(profile_id = %id, scanned, matched = ranked.len(), "offers ranked");
    Ok(ranked)
  }
}
