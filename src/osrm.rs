//! OSRM HTTP adapter for road routes (self-hosted alternative to ORS).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coordinate::Coordinate;
use crate::error::RouteError;
use crate::model::RouteResult;
use crate::polyline::Polyline;
use crate::traits::RouteProvider;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    /// Snap radius in meters applied to every waypoint.
    pub snap_radius_m: u32,
    pub timeout_secs: Option<u64>,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            snap_radius_m: 500,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout_secs.map(std::time::Duration::from_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, waypoints: &[Coordinate]) -> String {
        let coords = waypoints
            .iter()
            .map(|c| format!("{:.6},{:.6}", c.lon, c.lat))
            .collect::<Vec<_>>()
            .join(";");
        let radiuses = vec![self.config.snap_radius_m.to_string(); waypoints.len()].join(";");

        format!(
            "{}/route/v1/{}/{}?overview=full&geometries=geojson&radiuses={}",
            self.config.base_url, self.config.profile, coords, radiuses
        )
    }
}

impl RouteProvider for OsrmClient {
    fn route(&self, waypoints: &[Coordinate]) -> Result<RouteResult, RouteError> {
        if waypoints.len() < 2 {
            return Err(RouteError::TooFewWaypoints(waypoints.len()));
        }

        let url = self.route_url(waypoints);
        debug!(%url, "OSRM route");

        // Rejections (NoRoute, InvalidQuery) come back as 400 with a JSON body.
        let resp = self.client.get(url).send()?;
        let status = resp.status();
        match resp.json::<OsrmRouteResponse>() {
            Ok(body) => body.into_route(),
            Err(_) if !status.is_success() => Err(RouteError::Status(status.as_u16())),
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Meters.
    distance: f64,
    /// Seconds.
    duration: f64,
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

impl OsrmRouteResponse {
    fn into_route(self) -> Result<RouteResult, RouteError> {
        if self.code != "Ok" {
            return match self.code.as_str() {
                "NoRoute" | "NoSegment" => Err(RouteError::NoRoute),
                _ => Err(RouteError::Malformed(self.message.unwrap_or(self.code))),
            };
        }

        let route = self.routes.into_iter().next().ok_or(RouteError::NoRoute)?;
        Ok(RouteResult {
            polyline: Polyline::from_lon_lat(&route.geometry.coordinates),
            distance_km: route.distance / 1000.0,
            duration_h: route.duration / 3600.0,
        })
    }
}
