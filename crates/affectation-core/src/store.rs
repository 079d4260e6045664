//! The `PlacementStore` trait: the document store behind every manager.
//!
//! The trait is implemented by storage backends (e.g.
//! `affectation-store-sqlite`). The managers in [`crate::service`] depend on
//! this abstraction, never on a concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  application::{Application, NewApplication},
  offer::{NewOffer, Offer, OfferFilter},
  profile::{NewProfile, Profile, ProfilePatch, ResumeRef},
  resume::{NewResumeBlob, ResumeBlob},
};

/// Abstraction over the profile, offer and application collections plus the
/// résumé blob store.
///
/// Lookups return `Ok(None)` when the document is absent; the managers turn
/// that into a user-facing error. Timestamps are assigned by the store.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PlacementStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Persist a new profile. Returns `Ok(None)` if the email is already
  /// taken.
  fn insert_profile(
    &self,
    input: NewProfile,
    password_hash: Option<String>,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  fn get_profile(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  fn find_profile_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + 'a;

  /// All profiles, newest first.
  fn list_profiles(
    &self,
  ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send + '_;

  /// Write the `Some` fields of `patch`. Returns the refreshed profile, or
  /// `None` if it does not exist.
  fn update_profile<'a>(
    &'a self,
    id: Uuid,
    patch: &'a ProfilePatch,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + 'a;

  /// Atomically point a profile at a new résumé and return the reference it
  /// replaced. The outer `None` means the profile does not exist.
  fn swap_resume(
    &self,
    profile_id: Uuid,
    resume: ResumeRef,
  ) -> impl Future<Output = Result<Option<Option<ResumeRef>>, Self::Error>> + Send + '_;

  fn count_profiles(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Résumé blobs ──────────────────────────────────────────────────────

  fn put_blob(
    &self,
    blob: NewResumeBlob,
  ) -> impl Future<Output = Result<ResumeBlob, Self::Error>> + Send + '_;

  fn get_blob(
    &self,
    blob_id: Uuid,
  ) -> impl Future<Output = Result<Option<ResumeBlob>, Self::Error>> + Send + '_;

  /// Returns `false` if nothing was deleted.
  fn delete_blob(
    &self,
    blob_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Offers ────────────────────────────────────────────────────────────

  /// Persist a new offer with a zero application count.
  fn insert_offer(
    &self,
    input: NewOffer,
  ) -> impl Future<Output = Result<Offer, Self::Error>> + Send + '_;

  fn get_offer(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Offer>, Self::Error>> + Send + '_;

  fn list_offers<'a>(
    &'a self,
    filter: &'a OfferFilter,
  ) -> impl Future<Output = Result<Vec<Offer>, Self::Error>> + Send + 'a;

  /// Returns `false` if no offer matched.
  fn delete_offer(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn count_offers(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Applications ──────────────────────────────────────────────────────

  /// Record an application with status `submitted` and increment the
  /// offer's application count, as one atomic write.
  ///
  /// Returns `Ok(None)` if the `(profile, offer)` pair already exists; the
  /// counter is then left untouched.
  fn record_application(
    &self,
    input: NewApplication,
  ) -> impl Future<Output = Result<Option<Application>, Self::Error>> + Send + '_;

  fn find_application(
    &self,
    profile_id: Uuid,
    offer_id: Uuid,
  ) -> impl Future<Output = Result<Option<Application>, Self::Error>> + Send + '_;

  /// All applications of a profile, newest first.
  fn list_applications(
    &self,
    profile_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Application>, Self::Error>> + Send + '_;

  /// Count applications, optionally restricted to one profile.
  fn count_applications(
    &self,
    profile_id: Option<Uuid>,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
