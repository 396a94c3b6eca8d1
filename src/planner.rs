//! Trip planner: schedules charging stops along a road route.
//!
//! The stop count comes from the initial start-to-end route and the stops
//! are spread evenly along that same route. Totals are then taken from the
//! final route through every chosen station, so they describe the path the
//! driver actually takes.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::coordinate::Coordinate;
use crate::haversine::{DEFAULT_SPEED_KMH, StraightLineEstimate};
use crate::model::{PowerRating, Stop, TripPlan, Vehicle};
use crate::polyline::Polyline;
use crate::traits::{ChargingStationLocator, RouteProvider};

/// Fraction of the battery kept in reserve.
pub const DEFAULT_SAFETY_MARGIN: f64 = 0.10;

/// Radius searched around each stop position.
pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 50.0;

pub const DEFAULT_CHARGING_TIME_MINUTES: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanOptions {
    /// Minutes spent at every charging stop.
    pub charging_time_minutes: u32,
    /// Fraction of nominal range never scheduled (0.0..1.0).
    pub safety_margin: f64,
    /// Radius for the station lookup around each stop position.
    pub search_radius_km: f64,
    /// Speed used to estimate driving time when routing fails.
    pub fallback_speed_kmh: f64,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            charging_time_minutes: DEFAULT_CHARGING_TIME_MINUTES,
            safety_margin: DEFAULT_SAFETY_MARGIN,
            search_radius_km: DEFAULT_SEARCH_RADIUS_KM,
            fallback_speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl PlanOptions {
    pub fn with_charging_time(mut self, minutes: u32) -> Self {
        self.charging_time_minutes = minutes;
        self
    }
}

/// Range the planner may schedule between two charges.
pub fn usable_range_km(range_km: f64, safety_margin: f64) -> f64 {
    range_km * (1.0 - safety_margin)
}

/// Number of charging stops for a trip of `distance_km`.
///
/// `floor(distance / usable_range)`, and zero whenever the trip fits in a
/// single charge. A non-positive usable range schedules nothing.
pub fn required_stops(distance_km: f64, usable_range_km: f64) -> usize {
    if !is_positive(usable_range_km) || !distance_km.is_finite() || distance_km <= usable_range_km {
        return 0;
    }
    (distance_km / usable_range_km).floor() as usize
}

/// Plan a trip from `start` to `end`, inserting charging stops.
///
/// Never fails: a routing failure falls back to a straight-line estimate
/// and a failed station lookup yields a placeholder stop.
pub fn plan<R, L>(
    start: Coordinate,
    end: Coordinate,
    vehicle: &Vehicle,
    router: &R,
    locator: &L,
    options: &PlanOptions,
) -> TripPlan
where
    R: RouteProvider + ?Sized,
    L: ChargingStationLocator + Sync + ?Sized,
{
    let estimate = StraightLineEstimate::new(options.fallback_speed_kmh);

    let initial = match router.route(&[start, end]) {
        Ok(route) => Some(route),
        Err(err) => {
            warn!(%err, "initial route failed, using straight-line distance");
            None
        }
    };

    let approx_distance_km = initial
        .as_ref()
        .map_or_else(|| estimate.distance_km(start, end), |route| route.distance_km);

    let usable_range = usable_range_km(vehicle.range_km, options.safety_margin);
    let num_stops = required_stops(approx_distance_km, usable_range);

    info!(
        vehicle = %vehicle.id,
        range_km = vehicle.range_km,
        usable_range_km = usable_range,
        distance_km = approx_distance_km,
        num_stops,
        "computed charging stop count"
    );

    let guide = initial
        .as_ref()
        .map(|route| &route.polyline)
        .filter(|polyline| !polyline.is_empty());

    // Lookups are independent; indexed collect keeps stop order.
    let stops: Vec<Stop> = (0..num_stops)
        .into_par_iter()
        .map(|index| place_stop(index + 1, num_stops, start, end, guide, locator, options))
        .collect();

    let mut waypoints = Vec::with_capacity(num_stops + 2);
    waypoints.push(start);
    waypoints.extend(stops.iter().map(|stop| stop.location));
    waypoints.push(end);

    let (distance_km, driving_time_h, route_coords) = match router.route(&waypoints) {
        Ok(route) => {
            let polyline = Some(route.polyline).filter(|polyline| !polyline.is_empty());
            (route.distance_km, route.duration_h, polyline)
        }
        Err(err) => {
            warn!(%err, waypoints = waypoints.len(), "final route failed, estimating driving time");
            (approx_distance_km, estimate.hours_for(approx_distance_km), None)
        }
    };

    let charging_time_h = num_stops as f64 * f64::from(options.charging_time_minutes) / 60.0;
    let driving_time_h = round2(driving_time_h);
    let charging_time_h = round2(charging_time_h);

    TripPlan {
        total_distance_km: round2(distance_km),
        num_stops,
        stops,
        driving_time_h,
        charging_time_h,
        total_time_h: round2(driving_time_h + charging_time_h),
        route_coords,
        usable_range_km: usable_range,
        safety_margin_km: vehicle.range_km * options.safety_margin,
    }
}

fn place_stop<L>(
    stop_number: usize,
    num_stops: usize,
    start: Coordinate,
    end: Coordinate,
    guide: Option<&Polyline>,
    locator: &L,
    options: &PlanOptions,
) -> Stop
where
    L: ChargingStationLocator + ?Sized,
{
    let ratio = stop_number as f64 / (num_stops + 1) as f64;
    let target = guide
        .and_then(|polyline| polyline.point_at_ratio(ratio))
        .unwrap_or_else(|| start.lerp(end, ratio));

    debug!(stop_number, %target, radius_km = options.search_radius_km, "searching charging station");

    match locator.nearby(target, options.search_radius_km).into_iter().next() {
        Some(station) => {
            debug!(stop_number, station = %station.name, distance_km = station.distance_km, "station chosen");
            Stop {
                stop_number,
                location: station.location,
                name: station.name,
                address: station.address,
                city: station.city,
                power: station.power,
                charging_time_minutes: options.charging_time_minutes,
                found: true,
            }
        }
        None => {
            warn!(stop_number, %target, "no charging station found, keeping placeholder stop");
            Stop {
                stop_number,
                location: target,
                name: format!("Charging zone {stop_number}"),
                address: format!(
                    "No charging station found within {} km",
                    options.search_radius_km
                ),
                city: None,
                power: PowerRating::Unknown,
                charging_time_minutes: options.charging_time_minutes,
                found: false,
            }
        }
    }
}

/// `false` for zero, negatives and NaN.
pub(crate) fn is_positive(value: f64) -> bool {
    !value.is_nan() && value > 0.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
