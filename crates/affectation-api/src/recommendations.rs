//! Offer recommendations for a profile.
//!
//! Both routes accept `?top=N`; they differ only in the default.

use affectation_core::{
  service::{Recommendation, Recommender},
  store::PlacementStore,
};
use axum::extract::{Path, State};
use serde::Deserialize;

use crate::{
  ApiState,
  error::ApiError,
  extract::{Json, Query},
};

/// Default length of `/recommandations/{id}`.
pub const SHORT_LIST_TOP: usize = 5;
/// Default length of `/stagiaires/{id}/recommandations`.
pub const DEFAULT_TOP: usize = 10;

#[derive(Debug, Default, Deserialize)]
pub struct TopParams {
  pub top: Option<usize>,
}

async fn recommend<S>(
  state: &ApiState<S>,
  id: &str,
  top: usize,
) -> Result<Json<Vec<Recommendation>>, ApiError>
where
  S: PlacementStore + Clone + 'static,
{
  Ok(Json(Recommender::new(&*state.store).recommend(id, top).await?))
}

/// `GET /recommandations/{id}[?top=N]`
pub async fn short_list<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
  Query(params): Query<TopParams>,
) -> Result<Json<Vec<Recommendation>>, ApiError>
where
  S: PlacementStore + Clone + 'static,
{
  recommend(&state, &id, params.top.unwrap_or(SHORT_LIST_TOP)).await
}

/// `GET /stagiaires/{id}/recommandations[?top=N]`
pub async fn for_profile<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
  Query(params): Query<TopParams>,
) -> Result<Json<Vec<Recommendation>>, ApiError>
where
  S: PlacementStore + Clone + 'static,
{
  recommend(&state, &id, params.top.unwrap_or(DEFAULT_TOP)).await
}
