//! Core types, the store trait and the managers of the Affectation internship
//! placement platform.
//!
//! No HTTP or database dependencies: the managers in [`service`] run against
//! any [`store::PlacementStore`].

pub mod application;
pub mod error;
pub mod offer;
pub mod password;
pub mod profile;
pub mod resume;
pub mod service;
pub mod store;

pub use error::{Error, Result};
