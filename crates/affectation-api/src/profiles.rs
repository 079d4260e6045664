//! Handlers for `/stagiaires` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/stagiaires` | Newest first |
//! | `POST` | `/stagiaires` | Body: profile fields + optional `password` (also `?password=`); 201 |
//! | `GET`  | `/stagiaires/{id}` | 404 if not found |
//! | `PUT`  | `/stagiaires/{id}` | Partial update; 400 on empty body |

use affectation_core::{
  profile::{NewProfile, ProfilePatch, ProfileView},
  service::Profiles,
  store::PlacementStore,
};
use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;

use crate::{
  ApiState,
  error::ApiError,
  extract::{Json, Query},
};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /stagiaires`
pub async fn list<S>(State(state): State<ApiState<S>>) -> Result<Json<Vec<ProfileView>>, ApiError>
where
  S: PlacementStore + Clone + 'static,
{
  Ok(Json(Profiles::new(&*state.store).list().await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  #[serde(flatten)]
  pub profile:  NewProfile,
  #[serde(default)]
  pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateParams {
  pub password: Option<String>,
}

/// `POST /stagiaires[?password=…]`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<CreateParams>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PlacementStore + Clone + 'static,
{
  let password = body
    .password
    .or(params.password)
    .filter(|p| !p.is_empty());
  let view = Profiles::new(&*state.store)
    .create(body.profile, password.as_deref())
    .await?;
  Ok((StatusCode::CREATED, Json(view)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /stagiaires/{id}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Json<ProfileView>, ApiError>
where
  S: PlacementStore + Clone + 'static,
{
  Ok(Json(Profiles::new(&*state.store).get(&id).await?))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /stagiaires/{id}`. Only the supplied fields are written.
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
  Json(patch): Json<ProfilePatch>,
) -> Result<Json<ProfileView>, ApiError>
where
  S: PlacementStore + Clone + 'static,
{
  Ok(Json(Profiles::new(&*state.store).update(&id, &patch).await?))
}
