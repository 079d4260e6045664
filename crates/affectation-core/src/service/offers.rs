//! Offer Manager.

use crate::{
  Error,
  Result,
  offer::{NewOffer, Offer, OfferFilter},
  service::lookup_id,
  store::PlacementStore,
};

pub(crate) const OFFER_NOT_FOUND: &str = "Offre non trouvée";

pub struct Offers<'a, S> {
  store: &'a S,
}

impl<'a, S: PlacementStore> Offers<'a, S> {
  pub fn new(store: &'a S) -> Self { Self { store } }

  /// Publish an offer. Its application count starts at zero.
  pub async fn create(&self, input: NewOffer) -> Result<Offer> {
    if input.title.trim().is_empty() {
      return Err(Error::bad_request("Le titre est obligatoire"));
    }
    let offer = self.store.insert_offer(input).await.map_err(Error::store)?;
    tracing::info!(offer_id = %offer.id, employer = %offer.employer, "offer created");
    Ok(offer)
  }

  /// Offers matching every set filter, newest first.
  pub async fn list(&self, filter: &OfferFilter) -> Result<Vec<Offer>> {
    self.store.list_offers(filter).await.map_err(Error::store)
  }

  pub async fn get(&self, id: &str) -> Result<Offer> {
    let id = lookup_id(id, OFFER_NOT_FOUND)?;
    self
      .store
      .get_offer(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(OFFER_NOT_FOUND))
  }

  /// Delete an offer. Deleting an absent offer is `NotFound`, so a repeated
  /// delete never reports success. Applications referencing the offer are
  /// left in place.
  pub async fn delete(&self, id: &str) -> Result<()> {
    let id = lookup_id(id, OFFER_NOT_FOUND)?;
    if !self.store.delete_offer(id).await.map_err(Error::store)? {
      return Err(Error::not_found(OFFER_NOT_FOUND));
    }
    tracing::info!(offer_id = %id, "offer deleted");
    Ok(())
  }
}
