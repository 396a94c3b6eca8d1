//! Haversine distance estimate (fallback when the routing engine fails).
//!
//! Uses great-circle distance and an assumed cruising speed.
//! Less accurate than a road route (ignores roads) but always available.

use crate::coordinate::Coordinate;

/// Average driving speed assumption for time estimation.
pub const DEFAULT_SPEED_KMH: f64 = 90.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate haversine distance between two points in kilometers.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lon - from.lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Straight-line trip estimator.
///
/// Stands in for a road route when the routing engine is unavailable:
/// distance is the great-circle distance and time assumes a constant speed.
#[derive(Debug, Clone)]
pub struct StraightLineEstimate {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for StraightLineEstimate {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl StraightLineEstimate {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    pub fn distance_km(&self, from: Coordinate, to: Coordinate) -> f64 {
        haversine_km(from, to)
    }

    /// Convert a distance in km to driving time in hours.
    pub fn hours_for(&self, km: f64) -> f64 {
        km / self.speed_kmh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_same_point() {
        let p = Coordinate::new(48.8566, 2.3522);
        let dist = haversine_km(p, p);
        assert!(dist < 0.001, "Same point should have ~0 distance");
    }

    #[test]
    fn test_haversine_known_distance() {
        // Paris to Lyon, ~392 km as the crow flies
        let dist = haversine_km(Coordinate::new(48.8566, 2.3522), Coordinate::new(45.7640, 4.8357));
        assert!(dist > 380.0 && dist < 400.0, "Paris to Lyon should be ~392km, got {}", dist);
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = Coordinate::new(43.2965, 5.3698);
        let b = Coordinate::new(43.6047, 1.4442);
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn test_reasonable_travel_time() {
        let estimate = StraightLineEstimate::default();
        // 180 km at 90 km/h = 2 hours
        assert!((estimate.hours_for(180.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_custom_speed() {
        let estimate = StraightLineEstimate::new(120.0);
        assert!((estimate.hours_for(60.0) - 0.5).abs() < 1e-12);
    }
}
