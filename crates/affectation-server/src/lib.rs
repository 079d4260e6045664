//! HTTP server assembly for the Affectation platform.
//!
//! Wraps the [`affectation_api`] router with the health probe, CORS, request
//! tracing and the upload size limit.

use std::{path::PathBuf, sync::Arc};

use affectation_api::{ApiState, TokenKeys, api_router};
use affectation_core::store::PlacementStore;
use axum::{Json, Router, extract::DefaultBodyLimit, routing::get};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `AFFECTATION_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:             String,
  #[serde(default = "default_port")]
  pub port:             u16,
  #[serde(default = "default_store_path")]
  pub store_path:       PathBuf,
  /// HS256 signing secret for access tokens.
  pub jwt_secret:       String,
  #[serde(default = "default_token_ttl_hours")]
  pub token_ttl_hours:  u32,
  /// Upper bound on any request body, résumé uploads included.
  #[serde(default = "default_max_upload_bytes")]
  pub max_upload_bytes: usize,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8000 }

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/affectation/affectation.db") }

fn default_token_ttl_hours() -> u32 { 24 }

fn default_max_upload_bytes() -> usize { 10 * 1024 * 1024 }

// ─── Router ───────────────────────────────────────────────────────────────────

/// `GET /`
async fn health() -> Json<Value> { Json(json!({ "message": "API Stagiaire OK" })) }

/// Build the complete application router over `store`.
pub fn router<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: PlacementStore + Clone + 'static,
{
  let state = ApiState {
    store,
    tokens: Arc::new(TokenKeys::new(config.jwt_secret.as_bytes(), config.token_ttl_hours)),
  };

  Router::new()
    .route("/", get(health))
    .nest("/api", api_router(state))
    .layer(DefaultBodyLimit::disable())
    .layer(RequestBodyLimitLayer::new(config.max_upload_bytes))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests;
