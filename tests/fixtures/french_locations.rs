//! Real French city centres and motorway service areas.
//!
//! Coordinates sourced from OpenStreetMap.

use ev_trip_planner::coordinate::Coordinate;
use ev_trip_planner::model::{ChargingStation, PowerRating};

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

pub const PARIS: Location = Location::new("Paris", 48.8566, 2.3522);
pub const LYON: Location = Location::new("Lyon", 45.7640, 4.8357);
pub const MARSEILLE: Location = Location::new("Marseille", 43.2965, 5.3698);
pub const LILLE: Location = Location::new("Lille", 50.6292, 3.0573);
pub const TOULOUSE: Location = Location::new("Toulouse", 43.6047, 1.4442);
pub const BORDEAUX: Location = Location::new("Bordeaux", 44.8378, -0.5792);
pub const NANTES: Location = Location::new("Nantes", 47.2184, -1.5536);
pub const ORLEANS: Location = Location::new("Orléans", 47.9030, 1.9093);

pub const CITIES: &[Location] = &[PARIS, LYON, MARSEILLE, LILLE, TOULOUSE, BORDEAUX, NANTES, ORLEANS];

// ============================================================================
// Motorway charging areas (A6 / A7 / A10)
// ============================================================================

pub const CHARGING_AREAS: &[Location] = &[
    Location::new("Aire de Venoy Soleil Levant", 47.7886, 3.6464),
    Location::new("Aire de Beaune Tailly", 46.9958, 4.8214),
    Location::new("Aire de Mâcon Saint-Albain", 46.4318, 4.8798),
    Location::new("Aire de Montélimar Est", 44.5323, 4.7725),
    Location::new("Aire de Lançon-Provence", 43.5897, 5.2111),
    Location::new("Aire de Blois Villerbon", 47.6556, 1.3667),
    Location::new("Aire de Poitiers Jaunay-Marigny", 46.6789, 0.3569),
];

/// Charging areas as directory entries (distance filled in by the directory).
pub fn charging_stations() -> Vec<ChargingStation> {
    CHARGING_AREAS
        .iter()
        .map(|area| ChargingStation {
            name: area.name.to_string(),
            address: format!("{}, autoroute", area.name),
            city: None,
            location: area.coords(),
            distance_km: 0.0,
            power: PowerRating::Kw(150.0),
        })
        .collect()
}

/// Looks up a city by name, case-insensitive.
pub fn city(name: &str) -> Option<&'static Location> {
    CITIES.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}
