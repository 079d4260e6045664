//! JSON REST API for the Affectation placement platform.
//!
//! Exposes an axum [`Router`] backed by any
//! [`affectation_core::store::PlacementStore`]. CORS, tracing, body limits
//! and the listener are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", affectation_api::api_router(state))
//! ```

pub mod applications;
pub mod auth;
pub mod error;
pub mod extract;
pub mod offers;
pub mod profiles;
pub mod recommendations;
pub mod resumes;
pub mod stats;

use std::sync::Arc;

use affectation_core::store::PlacementStore;
use axum::{
  Router,
  routing::{get, post},
};

pub use auth::{Authenticated, TokenKeys};
pub use error::ApiError;

/// Shared state threaded through all handlers.
#[derive(Clone)]
pub struct ApiState<S: PlacementStore> {
  pub store:  Arc<S>,
  pub tokens: Arc<TokenKeys>,
}

/// Build a fully-materialised API router over `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: PlacementStore + Clone + 'static,
{
  Router::new()
    // Auth
    .route("/login", post(auth::login::<S>))
    .route("/me", get(auth::me::<S>))
    // Profiles
    .route("/stagiaires", get(profiles::list::<S>).post(profiles::create::<S>))
    .route("/stagiaires/{id}", get(profiles::get_one::<S>).put(profiles::update::<S>))
    .route("/stagiaires/{id}/upload-cv", post(resumes::upload::<S>))
    .route("/stagiaires/{id}/cv", get(resumes::download::<S>))
    // Applications
    .route("/candidater", post(applications::submit::<S>))
    .route("/stagiaires/candidater", post(applications::submit::<S>))
    .route("/stagiaires/{id}/candidatures", get(applications::list_for_profile::<S>))
    // Recommendations
    .route("/recommandations/{id}", get(recommendations::short_list::<S>))
    .route("/stagiaires/{id}/recommandations", get(recommendations::for_profile::<S>))
    // Offers
    .route("/offres", get(offers::list::<S>).post(offers::create::<S>))
    .route("/offres/{id}", get(offers::get_one::<S>).delete(offers::delete_one::<S>))
    // Stats
    .route("/stats/stagiaire/{id}", get(stats::per_profile::<S>))
    .route("/stats/global", get(stats::global::<S>))
    .with_state(state)
}
