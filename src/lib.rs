//! ev-trip-planner
//!
//! Plans electric-vehicle road trips: computes how many charging stops a
//! trip needs, places them along the route, picks a real station near each
//! one and reports the final route and timing.

pub mod catalog;
pub mod chargetrip;
pub mod coordinate;
pub mod error;
pub mod format;
pub mod geocoding;
pub mod haversine;
pub mod irve;
pub mod model;
pub mod nominatim;
pub mod ors;
pub mod osrm;
pub mod osrm_data;
pub mod planner;
pub mod polyline;
pub mod service;
pub mod settings;
pub mod traits;
