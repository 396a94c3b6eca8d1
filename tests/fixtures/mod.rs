//! Test fixtures for ev-trip-planner.
//!
//! Provides realistic test data including:
//! - Real French city centres and motorway charging areas
//! - In-memory collaborators (router, station directory, geocoder)

pub mod french_locations;
pub mod mocks;

pub use french_locations::*;
