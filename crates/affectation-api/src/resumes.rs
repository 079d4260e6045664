//! Résumé upload and download.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/stagiaires/{id}/upload-cv` | Multipart, field `file`; PDF/DOC/DOCX only |
//! | `GET`  | `/stagiaires/{id}/cv` | Raw bytes as an attachment |

use affectation_core::{
  service::{Profiles, ResumeUpload},
  store::PlacementStore,
};
use axum::{
  body::Body,
  extract::{Multipart, Path, State, multipart::MultipartRejection},
  http::{StatusCode, header},
  response::Response,
};
use bytes::Bytes;

use crate::{ApiState, error::ApiError, extract::Json};

/// Multipart field carrying the file.
const FILE_FIELD: &str = "file";

/// `POST /stagiaires/{id}/upload-cv`
pub async fn upload<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
  multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ResumeUpload>, ApiError>
where
  S: PlacementStore + Clone + 'static,
{
  let mut multipart = multipart?;
  let mut file: Option<(Bytes, Option<String>, Option<String>)> = None;
  while let Some(field) = multipart.next_field().await.map_err(ApiError::multipart)? {
    if field.name() != Some(FILE_FIELD) {
      continue;
    }
    let filename = field.file_name().map(str::to_owned);
    let media_type = field.content_type().map(str::to_owned);
    let content = field.bytes().await.map_err(ApiError::multipart)?;
    file = Some((content, filename, media_type));
    break;
  }

  let (content, filename, media_type) =
    file.ok_or_else(|| ApiError::BadRequest("Aucun fichier fourni".to_owned()))?;

  let upload = Profiles::new(&*state.store)
    .attach_resume(&id, content, filename, media_type)
    .await?;
  Ok(Json(upload))
}

/// `GET /stagiaires/{id}/cv`
pub async fn download<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Response, ApiError>
where
  S: PlacementStore + Clone + 'static,
{
  let blob = Profiles::new(&*state.store).fetch_resume(&id).await?;

  let content_disposition = format!("attachment; filename=\"{}\"", header_safe(&blob.filename));
  let etag = format!("\"{}\"", blob.content_hash);

  Response::builder()
    .status(StatusCode::OK)
    .header(header::CONTENT_TYPE, blob.media_type)
    .header(header::CONTENT_DISPOSITION, content_disposition)
    .header(header::ETAG, etag)
    .body(Body::from(blob.content))
    .map_err(|e| ApiError::Internal(format!("Failed to build response: {e}")))
}

/// Strip characters that would break a quoted header parameter.
fn header_safe(filename: &str) -> String {
  filename
    .chars()
    .map(|c| if c == '"' || c == '\\' || c.is_control() { '_' } else { c })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn header_safe_replaces_quotes_and_controls() {
    assert_eq!(header_safe("mon \"cv\".pdf"), "mon _cv_.pdf");
    assert_eq!(header_safe("a\r\nb.pdf"), "a__b.pdf");
    assert_eq!(header_safe("résumé.pdf"), "résumé.pdf");
  }
}
