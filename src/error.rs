//! Error types for the collaborators and the request layer.

use thiserror::Error;

/// Errors from resolving a place name to coordinates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeocodeError {
    /// The service answered but knows no such place.
    #[error("place not found: {0}")]
    NotFound(String),

    #[error("geocoding request failed: {0}")]
    Transport(String),

    #[error("malformed geocoding response: {0}")]
    Malformed(String),
}

/// Errors from a routing engine. Never surfaced past the planner.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("at least two waypoints are required, got {0}")]
    TooFewWaypoints(usize),

    #[error("routing request failed: {0}")]
    Transport(String),

    #[error("routing service returned HTTP {0}")]
    Status(u16),

    #[error("malformed routing response: {0}")]
    Malformed(String),

    #[error("no route found through the given waypoints")]
    NoRoute,
}

/// Errors from a remote vehicle catalog; absorbed by the fallback list.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Transport(String),

    #[error("catalog service returned HTTP {0}")]
    Status(u16),

    #[error("malformed catalog response: {0}")]
    Malformed(String),

    #[error("catalog returned no vehicles")]
    Empty,
}

/// Failures visible to whoever asks for a trip.
///
/// Besides an unknown vehicle and an ungeocodable city, a catalog entry
/// without a positive range is refused here rather than planned as a
/// zero-stop trip the car could never finish.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("vehicle not found: {0}")]
    VehicleNotFound(String),

    #[error("could not geocode city: {city}")]
    Geocoding { city: String },

    #[error("vehicle {id} has no usable range ({range_km} km)")]
    InvalidVehicleRange { id: String, range_km: f64 },
}

impl From<reqwest::Error> for RouteError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Status(status.as_u16()),
            None if err.is_decode() => Self::Malformed(err.to_string()),
            None => Self::Transport(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Status(status.as_u16()),
            None if err.is_decode() => Self::Malformed(err.to_string()),
            None => Self::Transport(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_error_display() {
        let err = PlanError::VehicleNotFound("42".to_string());
        assert_eq!(err.to_string(), "vehicle not found: 42");

        let err = PlanError::Geocoding {
            city: "Atlantis".to_string(),
        };
        assert!(err.to_string().contains("Atlantis"));
    }

    #[test]
    fn test_route_error_display() {
        assert!(RouteError::TooFewWaypoints(1).to_string().contains('1'));
        assert!(RouteError::Status(503).to_string().contains("503"));
    }
}
