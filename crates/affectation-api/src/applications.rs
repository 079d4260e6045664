//! Handlers for applications.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/candidater`, `/stagiaires/candidater` | Body: `{"stagiaireId","offreId","message"?}` |
//! | `GET`  | `/stagiaires/{id}/candidatures` | Newest first, enriched with offer title and employer |

use affectation_core::{
  application::{ApplicationSummary, SubmissionReceipt},
  service::Applications,
  store::PlacementStore,
};
use axum::extract::{Path, State};
use serde::Deserialize;

use crate::{ApiState, error::ApiError, extract::Json};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBody {
  pub stagiaire_id: String,
  pub offre_id:     String,
  #[serde(default)]
  pub message:      Option<String>,
}

/// `POST /candidater`
pub async fn submit<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<SubmitBody>,
) -> Result<Json<SubmissionReceipt>, ApiError>
where
  S: PlacementStore + Clone + 'static,
{
  let receipt = Applications::new(&*state.store)
    .submit(&body.stagiaire_id, &body.offre_id, body.message)
    .await?;
  Ok(Json(receipt))
}

/// `GET /stagiaires/{id}/candidatures`
pub async fn list_for_profile<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Vec<ApplicationSummary>>, ApiError>
where
  S: PlacementStore + Clone + 'static,
{
  Ok(Json(Applications::new(&*state.store).list_for_profile(&id).await?))
}
