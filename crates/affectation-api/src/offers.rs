//! Handlers for `/offres` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/offres` | Optional `?entreprise=`, `?ville=`, `?competence=`; newest first |
//! | `POST`   | `/offres` | Body: [`NewOffer`]; returns 201 + stored offer |
//! | `GET`    | `/offres/{id}` | 404 if not found |
//! | `DELETE` | `/offres/{id}` | 404 if not found |

use affectation_core::{
  offer::{NewOffer, Offer, OfferFilter},
  service::Offers,
  store::PlacementStore,
};
use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
  ApiState,
  error::ApiError,
  extract::{Json, Query},
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub entreprise: Option<String>,
  pub ville:      Option<String>,
  pub competence: Option<String>,
}

impl ListParams {
  fn into_filter(self) -> OfferFilter {
    let present = |v: Option<String>| v.filter(|s| !s.is_empty());
    OfferFilter {
      employer: present(self.entreprise),
      city: present(self.ville),
      skill: present(self.competence),
      ..Default::default()
    }
  }
}

/// `GET /offres[?entreprise=…][&ville=…][&competence=…]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Offer>>, ApiError>
where
  S: PlacementStore + Clone + 'static,
{
  let offers = Offers::new(&*state.store).list(&params.into_filter()).await?;
  Ok(Json(offers))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /offres`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewOffer>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PlacementStore + Clone + 'static,
{
  let offer = Offers::new(&*state.store).create(body).await?;
  Ok((StatusCode::CREATED, Json(offer)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /offres/{id}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Offer>, ApiError>
where
  S: PlacementStore + Clone + 'static,
{
  Ok(Json(Offers::new(&*state.store).get(&id).await?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /offres/{id}`
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: PlacementStore + Clone + 'static,
{
  Offers::new(&*state.store).delete(&id).await?;
  Ok(Json(json!({ "message": "Offre supprimée" })))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_query_values_are_ignored() {
    let filter = ListParams {
      entreprise: Some(String::new()),
      ville:      Some("Dakar".to_owned()),
      competence: None,
    }
    .into_filter();
    assert!(filter.employer.is_none());
    assert_eq!(filter.city.as_deref(), Some("Dakar"));
    assert!(filter.skill.is_none());
    assert!(filter.limit.is_none());
  }
}
