//! In-memory collaborators for planner and service tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::Mutex;

use ev_trip_planner::coordinate::Coordinate;
use ev_trip_planner::error::{GeocodeError, RouteError};
use ev_trip_planner::haversine::haversine_km;
use ev_trip_planner::model::{ChargingStation, PowerRating, RouteResult};
use ev_trip_planner::polyline::Polyline;
use ev_trip_planner::traits::{ChargingStationLocator, GeocodingProvider, RouteProvider};

use super::french_locations::{CITIES, charging_stations};

/// Road distance factor over the great-circle distance.
pub const DETOUR_FACTOR: f64 = 1.2;

pub const AVERAGE_SPEED_KMH: f64 = 100.0;

/// Deterministic router: straight segments densified into a polyline,
/// distance = great-circle distance x [`DETOUR_FACTOR`].
#[derive(Debug, Default)]
pub struct LineRouter {
    calls: Mutex<Vec<Vec<Coordinate>>>,
}

impl LineRouter {
    pub fn calls(&self) -> Vec<Vec<Coordinate>> {
        self.calls.lock().unwrap().clone()
    }
}

impl RouteProvider for LineRouter {
    fn route(&self, waypoints: &[Coordinate]) -> Result<RouteResult, RouteError> {
        self.calls.lock().unwrap().push(waypoints.to_vec());
        if waypoints.len() < 2 {
            return Err(RouteError::TooFewWaypoints(waypoints.len()));
        }
        Ok(straight_route(waypoints, 20))
    }
}

/// Route through `waypoints` with `per_leg` points per leg.
pub fn straight_route(waypoints: &[Coordinate], per_leg: usize) -> RouteResult {
    let mut points = vec![waypoints[0]];
    let mut distance_km = 0.0;
    for leg in waypoints.windows(2) {
        distance_km += haversine_km(leg[0], leg[1]) * DETOUR_FACTOR;
        for step in 1..=per_leg {
            points.push(leg[0].lerp(leg[1], step as f64 / per_leg as f64));
        }
    }
    RouteResult {
        polyline: Polyline::new(points),
        distance_km,
        duration_h: distance_km / AVERAGE_SPEED_KMH,
    }
}

/// Router answering from a queue of canned results, recording each request.
#[derive(Debug)]
pub struct ScriptedRouter {
    answers: RefCell<VecDeque<Result<RouteResult, RouteError>>>,
    calls: RefCell<Vec<Vec<Coordinate>>>,
}

impl ScriptedRouter {
    pub fn new(answers: Vec<Result<RouteResult, RouteError>>) -> Self {
        Self {
            answers: RefCell::new(answers.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<Coordinate>> {
        self.calls.borrow().clone()
    }
}

impl RouteProvider for ScriptedRouter {
    fn route(&self, waypoints: &[Coordinate]) -> Result<RouteResult, RouteError> {
        self.calls.borrow_mut().push(waypoints.to_vec());
        self.answers
            .borrow_mut()
            .pop_front()
            .unwrap_or(Err(RouteError::Transport("no scripted answer".to_string())))
    }
}

/// Router that always fails.
#[derive(Debug, Default)]
pub struct DownRouter;

impl RouteProvider for DownRouter {
    fn route(&self, _waypoints: &[Coordinate]) -> Result<RouteResult, RouteError> {
        Err(RouteError::Transport("connection refused".to_string()))
    }
}

/// Station directory over a fixed list, filtering by great-circle radius.
#[derive(Debug)]
pub struct Directory {
    stations: Vec<ChargingStation>,
    queries: Mutex<Vec<Coordinate>>,
}

impl Directory {
    pub fn new(stations: Vec<ChargingStation>) -> Self {
        Self {
            stations,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn motorway() -> Self {
        Self::new(charging_stations())
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn queries(&self) -> Vec<Coordinate> {
        self.queries.lock().unwrap().clone()
    }
}

impl ChargingStationLocator for Directory {
    fn nearby(&self, point: Coordinate, radius_km: f64) -> Vec<ChargingStation> {
        self.queries.lock().unwrap().push(point);
        let mut found: Vec<ChargingStation> = self
            .stations
            .iter()
            .map(|station| ChargingStation {
                distance_km: haversine_km(point, station.location),
                ..station.clone()
            })
            .filter(|station| station.distance_km <= radius_km)
            .collect();
        found.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        found
    }
}

/// Directory that has a station exactly at every queried point.
#[derive(Debug, Default)]
pub struct EchoLocator;

impl ChargingStationLocator for EchoLocator {
    fn nearby(&self, point: Coordinate, _radius_km: f64) -> Vec<ChargingStation> {
        vec![ChargingStation {
            name: format!("Station {:.3}", point.lat),
            address: "Echo".to_string(),
            city: Some("Echoville".to_string()),
            location: point,
            distance_km: 0.0,
            power: PowerRating::Kw(50.0),
        }]
    }
}

/// Geocoder over the fixture city list.
#[derive(Debug, Default)]
pub struct CityGeocoder;

impl GeocodingProvider for CityGeocoder {
    fn resolve(&self, place: &str) -> Result<Coordinate, GeocodeError> {
        CITIES
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(place))
            .map(|c| c.coords())
            .ok_or_else(|| GeocodeError::NotFound(place.to_string()))
    }
}
