//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error is rendered as `{"detail": "<message>"}`.

use axum::{
  Json,
  extract::{
    multipart::{MultipartError, MultipartRejection},
    rejection::{JsonRejection, QueryRejection},
  },
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

const INTERNAL: &str = "Erreur interne du serveur";
const TOO_LARGE: &str = "Fichier trop volumineux";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  Unauthorized(String),

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  Conflict(String),

  #[error("{0}")]
  PayloadTooLarge(String),

  #[error("{0}")]
  Internal(String),
}

impl ApiError {
  /// Map an extractor failure: 413 survives, anything else is a bad request.
  fn rejected(status: StatusCode, text: String) -> Self {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
      return Self::PayloadTooLarge(TOO_LARGE.to_owned());
    }
    Self::BadRequest(format!("Requête invalide : {text}"))
  }

  /// Map a failure while reading a multipart body.
  pub fn multipart(e: MultipartError) -> Self { Self::rejected(e.status(), e.body_text()) }
}

impl From<JsonRejection> for ApiError {
  fn from(r: JsonRejection) -> Self { Self::rejected(r.status(), r.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(r: QueryRejection) -> Self { Self::rejected(r.status(), r.body_text()) }
}

impl From<MultipartRejection> for ApiError {
  fn from(r: MultipartRejection) -> Self { Self::rejected(r.status(), r.body_text()) }
}

impl From<affectation_core::Error> for ApiError {
  fn from(e: affectation_core::Error) -> Self {
    use affectation_core::Error as E;
    match e {
      E::BadRequest(m) => Self::BadRequest(m),
      E::NotFound(m) => Self::NotFound(m),
      E::Conflict(m) => Self::Conflict(m),
      E::Unauthorized => Self::Unauthorized(E::Unauthorized.to_string()),
      E::Internal(m) => Self::Internal(m),
      E::Store(source) => {
        tracing::error!(error = %source, "store failure");
        Self::Internal(INTERNAL.to_owned())
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let mut res = (status, Json(json!({ "detail": self.to_string() }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    res
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn core_errors_keep_their_message() {
    let e: ApiError = affectation_core::Error::conflict("Email déjà utilisé").into();
    assert!(matches!(&e, ApiError::Conflict(m) if m == "Email déjà utilisé"));
    assert_eq!(e.into_response().status(), StatusCode::CONFLICT);
  }

  #[test]
  fn store_errors_hide_details() {
    let source = std::io::Error::other("disk on fire");
    let e: ApiError = affectation_core::Error::store(source).into();
    assert_eq!(e.to_string(), INTERNAL);
  }

  #[test]
  fn oversized_bodies_stay_413() {
    let e = ApiError::rejected(StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded".to_owned());
    assert!(matches!(&e, ApiError::PayloadTooLarge(m) if m == TOO_LARGE));

    let e = ApiError::rejected(StatusCode::UNPROCESSABLE_ENTITY, "missing field `titre`".to_owned());
    assert!(matches!(&e, ApiError::BadRequest(m) if m.contains("titre")));
  }

  #[test]
  fn unauthorized_sets_challenge_header() {
    let res = ApiError::from(affectation_core::Error::Unauthorized).into_response();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.headers()[header::WWW_AUTHENTICATE], "Bearer");
  }
}
