//! Statistics Aggregator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
  Error,
  Result,
  service::{lookup_id, profiles::PROFILE_NOT_FOUND},
  store::PlacementStore,
};

/// Bucket for applications to offers without a city.
pub const UNKNOWN_CITY: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileStats {
  pub total_candidatures: u64,
  /// Applications per offer city. Applications to deleted offers are counted
  /// in the total but not here.
  pub par_ville:          BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalStats {
  pub stagiaires:   u64,
  pub offres:       u64,
  pub candidatures: u64,
}

pub struct Stats<'a, S> {
  store: &'a S,
}

impl<'a, S: PlacementStore> Stats<'a, S> {
  pub fn new(store: &'a S) -> Self { Self { store } }

  pub async fn per_profile(&self, profile_id: &str) -> Result<ProfileStats> {
    let id = lookup_id(profile_id, PROFILE_NOT_FOUND)?;
    self
      .store
      .get_profile(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(PROFILE_NOT_FOUND))?;

    let total = self
      .store
      .count_applications(Some(id))
      .await
      .map_err(Error::store)?;

    let mut par_ville = BTreeMap::new();
    for application in self.store.list_applications(id).await.map_err(Error::store)? {
      let Some(offer) = self
        .store
        .get_offer(application.offer_id)
        .await
        .map_err(Error::store)?
      else {
        continue;
      };
      let city = offer.city.unwrap_or_else(|| UNKNOWN_CITY.to_owned());
      *par_ville.entry(city).or_insert(0) += 1;
    }

    Ok(ProfileStats { total_candidatures: total, par_ville })
  }

  pub async fn global(&self) -> Result<GlobalStats> {
    Ok(GlobalStats {
      stagiaires:   self.store.count_profiles().await.map_err(Error::store)?,
      offres:       self.store.count_offers().await.map_err(Error::store)?,
      candidatures: self.store.count_applications(None).await.map_err(Error::store)?,
    })
  }
}
