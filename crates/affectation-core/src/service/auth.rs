//! Credential check backing the login endpoint.

use crate::{
  Error,
  Result,
  password::verify_password,
  profile::Profile,
  store::PlacementStore,
};

/// Return the profile owning `email` if `password` matches its stored hash.
///
/// Unknown email, a profile created without a password, and a wrong password
/// are indistinguishable to the caller.
pub async fn authenticate<S: PlacementStore>(
  store: &S,
  email: &str,
  password: &str,
) -> Result<Profile> {
  let profile = store
    .find_profile_by_email(email)
    .await
    .map_err(Error::store)?
    .ok_or(Error::Unauthorized)?;

  let hash = profile.password_hash.as_deref().ok_or(Error::Unauthorized)?;
  if !verify_password(password, hash) {
    tracing::warn!(profile_id = %profile.id, "login rejected: bad password");
    return Err(Error::Unauthorized);
  }
  Ok(profile)
}
