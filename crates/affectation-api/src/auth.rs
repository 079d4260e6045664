//! Bearer-token authentication: `POST /login`, `GET /me` and the
//! [`Authenticated`] extractor.
//!
//! Tokens are HS256 JWTs whose `sub` is the profile id.

use affectation_core::{
  profile::{Profile, ProfileView},
  service::{Profiles, authenticate},
  store::PlacementStore,
};
use axum::{
  extract::{FromRequestParts, State},
  http::{header, request::Parts},
};
use chrono::{TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiState, error::ApiError, extract::Json};

const INVALID_TOKEN: &str = "Jeton invalide ou expiré";
const MISSING_TOKEN: &str = "Authentification requise";

/// JWT payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  pub sub:   String,
  pub email: String,
  pub iat:   i64,
  pub exp:   i64,
}

/// Signing material plus token lifetime, built once at startup.
pub struct TokenKeys {
  encoding: EncodingKey,
  decoding: DecodingKey,
  ttl:      TimeDelta,
}

impl TokenKeys {
  pub fn new(secret: &[u8], ttl_hours: u32) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret),
      decoding: DecodingKey::from_secret(secret),
      ttl:      TimeDelta::hours(i64::from(ttl_hours)),
    }
  }

  /// Sign a token for `profile`.
  pub fn issue(&self, profile: &Profile) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
      sub:   profile.id.to_string(),
      email: profile.email.clone(),
      iat:   now.timestamp(),
      exp:   (now + self.ttl).timestamp(),
    };
    encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
      tracing::error!(error = %e, "failed to sign token");
      ApiError::Internal("Erreur lors de la génération du jeton".to_owned())
    })
  }

  /// Check signature and expiry.
  pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
      .map(|data| data.claims)
      .map_err(|_| ApiError::Unauthorized(INVALID_TOKEN.to_owned()))
  }
}

// ─── Extractor ────────────────────────────────────────────────────────────────

/// Present in a handler means the request carried a valid bearer token.
#[derive(Debug, Clone)]
pub struct Authenticated {
  pub profile_id: Uuid,
  pub email:      String,
}

impl<S> FromRequestParts<ApiState<S>> for Authenticated
where
  S: PlacementStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &ApiState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = parts
      .headers
      .get(header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .and_then(|v| v.strip_prefix("Bearer "))
      .ok_or_else(|| ApiError::Unauthorized(MISSING_TOKEN.to_owned()))?;

    let claims = state.tokens.verify(token.trim())?;
    let profile_id = Uuid::parse_str(&claims.sub)
      .map_err(|_| ApiError::Unauthorized(INVALID_TOKEN.to_owned()))?;

    Ok(Self { profile_id, email: claims.email })
  }
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
  pub access_token: String,
  pub token_type:   String,
}

/// `POST /login`, body: `{"email":"…","password":"…"}`
pub async fn login<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<TokenResponse>, ApiError>
where
  S: PlacementStore + Clone + 'static,
{
  let profile = authenticate(&*state.store, &body.email, &body.password).await?;
  let access_token = state.tokens.issue(&profile)?;
  tracing::info!(profile_id = %profile.id, "login succeeded");
  Ok(Json(TokenResponse { access_token, token_type: "bearer".to_owned() }))
}

/// `GET /me`: the caller's own profile.
pub async fn me<S>(
  State(state): State<ApiState<S>>,
  auth: Authenticated,
) -> Result<Json<ProfileView>, ApiError>
where
  S: PlacementStore + Clone + 'static,
{
  let view = Profiles::new(&*state.store)
    .get(&auth.profile_id.to_string())
    .await?;
  Ok(Json(view))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn keys() -> TokenKeys { TokenKeys::new(b"test-secret", 1) }

  fn profile() -> Profile {
    Profile {
      id:            Uuid::new_v4(),
      name:          "Ndiaye".to_owned(),
      given_name:    None,
      email:         "fatou@example.com".to_owned(),
      city:          None,
      track:         None,
      level:         None,
      skills:        vec![],
      resume_text:   None,
      resume:        None,
      password_hash: None,
      created_at:    Utc::now(),
    }
  }

  #[test]
  fn issued_token_verifies() {
    let keys = keys();
    let p = profile();
    let claims = keys.verify(&keys.issue(&p).unwrap()).unwrap();
    assert_eq!(claims.sub, p.id.to_string());
    assert_eq!(claims.email, p.email);
    assert_eq!(claims.exp - claims.iat, 3600);
  }

  #[test]
  fn token_from_other_secret_is_rejected() {
    let token = TokenKeys::new(b"other", 1).issue(&profile()).unwrap();
    assert!(matches!(keys().verify(&token), Err(ApiError::Unauthorized(_))));
  }

  #[test]
  fn expired_token_is_rejected() {
    let keys = keys();
    let past = Utc::now().timestamp() - 7200;
    let claims = Claims {
      sub:   Uuid::new_v4().to_string(),
      email: "x@example.com".to_owned(),
      iat:   past - 3600,
      exp:   past,
    };
    let token = encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding).unwrap();
    assert!(matches!(keys.verify(&token), Err(ApiError::Unauthorized(_))));
  }

  #[test]
  fn garbage_token_is_rejected() {
    assert!(keys().verify("not.a.jwt").is_err());
  }
}
