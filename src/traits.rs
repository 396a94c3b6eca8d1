//! Collaborator seams for the trip planner.
//!
//! Each external data source sits behind one of these traits so the planner
//! can be driven by HTTP clients in production and by fixtures in tests.

use crate::coordinate::Coordinate;
use crate::error::{GeocodeError, RouteError};
use crate::model::{ChargingStation, PlaceSuggestion, RouteResult, Vehicle};

/// Resolves a free-text place name to coordinates.
pub trait GeocodingProvider {
    fn resolve(&self, place: &str) -> Result<Coordinate, GeocodeError>;
}

/// Suggests places for partial input.
///
/// Failures are absorbed: implementations return an empty list.
pub trait PlaceAutocomplete {
    fn suggest(&self, partial: &str) -> Vec<PlaceSuggestion>;
}

/// Computes a drivable route through waypoints, in the given order.
pub trait RouteProvider {
    fn route(&self, waypoints: &[Coordinate]) -> Result<RouteResult, RouteError>;
}

/// Finds charging stations near a point.
///
/// Returns stations nearest first. Never fails: an unreachable directory
/// and an empty area both yield an empty list.
pub trait ChargingStationLocator {
    fn nearby(&self, point: Coordinate, radius_km: f64) -> Vec<ChargingStation>;
}

/// Supplies vehicle specifications.
pub trait VehicleCatalog {
    fn list(&self) -> Vec<Vehicle>;

    fn get(&self, id: &str) -> Option<Vehicle> {
        self.list().into_iter().find(|vehicle| vehicle.id == id)
    }
}

impl<T: RouteProvider + ?Sized> RouteProvider for Box<T> {
    fn route(&self, waypoints: &[Coordinate]) -> Result<RouteResult, RouteError> {
        (**self).route(waypoints)
    }
}

impl<T: GeocodingProvider + ?Sized> GeocodingProvider for Box<T> {
    fn resolve(&self, place: &str) -> Result<Coordinate, GeocodeError> {
        (**self).resolve(place)
    }
}

impl<T: VehicleCatalog + ?Sized> VehicleCatalog for Box<T> {
    fn list(&self) -> Vec<Vehicle> {
        (**self).list()
    }

    fn get(&self, id: &str) -> Option<Vehicle> {
        (**self).get(id)
    }
}
