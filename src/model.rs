//! Data carried between the collaborators and the planner.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::polyline::Polyline;

/// Vehicle specification as supplied by a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub make: String,
    pub model: String,
    pub version: String,
    /// Nominal full-charge range.
    pub range_km: f64,
    pub battery_kwh: f64,
}

impl Vehicle {
    pub fn new(
        id: impl Into<String>,
        make: impl Into<String>,
        model: impl Into<String>,
        version: impl Into<String>,
        range_km: f64,
        battery_kwh: f64,
    ) -> Self {
        Self {
            id: id.into(),
            make: make.into(),
            model: model.into(),
            version: version.into(),
            range_km,
            battery_kwh,
        }
    }

    /// "Make Model Version", skipping an empty version.
    pub fn display_name(&self) -> String {
        if self.version.is_empty() {
            format!("{} {}", self.make, self.model)
        } else {
            format!("{} {} {}", self.make, self.model, self.version)
        }
    }
}

/// One answer from a routing engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    pub polyline: Polyline,
    pub distance_km: f64,
    pub duration_h: f64,
}

/// Maximum charging power of a station, when the directory knows it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum PowerRating {
    Kw(f64),
    #[default]
    Unknown,
}

impl fmt::Display for PowerRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kw(kw) => write!(f, "{kw} kW"),
            Self::Unknown => f.write_str("N/A"),
        }
    }
}

impl FromStr for PowerRating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("n/a") || trimmed.is_empty() {
            return Ok(Self::Unknown);
        }
        let number = trimmed.trim_end_matches("kW").trim_end_matches("kw").trim();
        number
            .parse::<f64>()
            .map(Self::Kw)
            .map_err(|_| format!("invalid power rating: {s}"))
    }
}

impl From<PowerRating> for String {
    fn from(value: PowerRating) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for PowerRating {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A charging station returned by a directory lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargingStation {
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub location: Coordinate,
    /// Great-circle distance from the query point.
    pub distance_km: f64,
    pub power: PowerRating,
}

/// A scheduled charging stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// 1-based position along the trip.
    pub stop_number: usize,
    pub location: Coordinate,
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub power: PowerRating,
    pub charging_time_minutes: u32,
    /// `false` for a placeholder stop with no real station nearby.
    pub found: bool,
}

/// Full itinerary produced by the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    pub total_distance_km: f64,
    pub num_stops: usize,
    pub stops: Vec<Stop>,
    pub driving_time_h: f64,
    pub charging_time_h: f64,
    pub total_time_h: f64,
    /// Geometry of the final route; `None` when routing failed.
    pub route_coords: Option<Polyline>,
    pub usable_range_km: f64,
    pub safety_margin_km: f64,
}

impl TripPlan {
    /// Stops for which no real station was found.
    pub fn placeholder_stops(&self) -> impl Iterator<Item = &Stop> {
        self.stops.iter().filter(|stop| !stop.found)
    }
}

/// A ranked autocomplete answer for partial place input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSuggestion {
    pub label: String,
    pub city: String,
    pub location: Coordinate,
}
