//! Handlers for `/stats`.

use affectation_core::{
  service::{GlobalStats, ProfileStats, Stats},
  store::PlacementStore,
};
use axum::extract::{Path, State};

use crate::{ApiState, error::ApiError, extract::Json};

/// `GET /stats/stagiaire/{id}`
pub async fn per_profile<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Json<ProfileStats>, ApiError>
where
  S: PlacementStore + Clone + 'static,
{
  Ok(Json(Stats::new(&*state.store).per_profile(&id).await?))
}

/// `GET /stats/global`
pub async fn global<S>(State(state): State<ApiState<S>>) -> Result<Json<GlobalStats>, ApiError>
where
  S: PlacementStore + Clone + 'static,
{
  Ok(Json(Stats::new(&*state.store).global().await?))
}
