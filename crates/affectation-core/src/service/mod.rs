//! Managers: the operations of the platform, each bound to a store handle.
//!
//! Every manager borrows a [`PlacementStore`](crate::store::PlacementStore)
//! at construction and is cheap to build per request:
//!
//! ```rust,ignore
//! let view = Profiles::new(&*store).get(&id).await?;
//! ```

mod applications;
mod auth;
mod offers;
mod profiles;
mod recommend;
mod stats;

pub use applications::Applications;
pub use auth::authenticate;
pub use offers::Offers;
pub use profiles::{Profiles, ResumeUpload};
pub use recommend::{Recommendation, Recommender, rank_offers};
pub use stats::{GlobalStats, ProfileStats, Stats, UNKNOWN_CITY};

use uuid::Uuid;

use crate::{Error, Result};

/// Parse an identifier taken from a URL path. A malformed id cannot name an
/// existing document, so it is reported as `NotFound` with `not_found_msg`.
pub(crate) fn lookup_id(raw: &str, not_found_msg: &str) -> Result<Uuid> {
  Uuid::parse_str(raw.trim()).map_err(|_| Error::not_found(not_found_msg))
}
