//! Error types for `affectation-core`.
//!
//! Messages are user-facing and therefore written in French.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed identifier, empty upload, unsupported media type, empty patch.
  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  NotFound(String),

  /// Duplicate email or duplicate application.
  #[error("{0}")]
  Conflict(String),

  #[error("Email ou mot de passe incorrect")]
  Unauthorized,

  #[error("{0}")]
  Internal(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error. Used as `.map_err(Error::store)`.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }

  pub fn bad_request(msg: impl Into<String>) -> Self { Self::BadRequest(msg.into()) }

  pub fn not_found(msg: impl Into<String>) -> Self { Self::NotFound(msg.into()) }

  pub fn conflict(msg: impl Into<String>) -> Self { Self::Conflict(msg.into()) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
