//! OpenRouteService HTTP adapter: geocoding, autocomplete and directions.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::coordinate::Coordinate;
use crate::error::{GeocodeError, RouteError};
use crate::geocoding::{MIN_QUERY_LEN, PlaceCandidate, rank_suggestions};
use crate::model::{PlaceSuggestion, RouteResult};
use crate::polyline::Polyline;
use crate::traits::{GeocodingProvider, PlaceAutocomplete, RouteProvider};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrsConfig {
    pub base_url: String,
    pub api_key: String,
    /// Directions profile, e.g. `driving-car`.
    pub profile: String,
    /// Radius (meters) within which each waypoint is snapped to a road.
    pub snap_radius_m: u32,
    pub geocode_timeout_secs: u64,
    /// No timeout on route computation unless set.
    pub route_timeout_secs: Option<u64>,
    /// Appended to free-text geocoding queries.
    pub country_name: String,
    /// ISO code bounding autocomplete results.
    pub country_code: String,
    /// Raw candidates requested per autocomplete call.
    pub autocomplete_size: u32,
}

impl Default for OrsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openrouteservice.org".to_string(),
            api_key: String::new(),
            profile: "driving-car".to_string(),
            snap_radius_m: 500,
            geocode_timeout_secs: 5,
            route_timeout_secs: None,
            country_name: "France".to_string(),
            country_code: "FR".to_string(),
            autocomplete_size: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrsClient {
    config: OrsConfig,
    client: reqwest::blocking::Client,
}

impl OrsClient {
    pub fn new(config: OrsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.route_timeout_secs.map(Duration::from_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn geocode_timeout(&self) -> Duration {
        Duration::from_secs(self.config.geocode_timeout_secs)
    }

    fn scoped_text(&self, place: &str) -> String {
        if self.config.country_name.is_empty() {
            place.to_string()
        } else {
            format!("{}, {}", place, self.config.country_name)
        }
    }

    fn autocomplete_candidates(&self, partial: &str) -> Result<Vec<PlaceCandidate>, reqwest::Error> {
        let url = format!("{}/geocode/autocomplete", self.config.base_url);
        let size = self.config.autocomplete_size.to_string();

        let body = self
            .client
            .get(url)
            .query(&[
                ("api_key", self.config.api_key.as_str()),
                ("text", partial),
                ("boundary.country", self.config.country_code.as_str()),
                ("size", size.as_str()),
                ("layers", "locality"),
            ])
            .timeout(self.geocode_timeout())
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<FeatureCollection<[f64; 2], PlaceProperties>>())?;

        Ok(body.features.into_iter().map(candidate_from).collect())
    }
}

impl GeocodingProvider for OrsClient {
    fn resolve(&self, place: &str) -> Result<Coordinate, GeocodeError> {
        let url = format!("{}/geocode/search", self.config.base_url);
        let text = self.scoped_text(place);
        debug!(%text, "ORS geocode search");

        let body = self
            .client
            .get(url)
            .query(&[
                ("api_key", self.config.api_key.as_str()),
                ("text", text.as_str()),
                ("size", "1"),
            ])
            .timeout(self.geocode_timeout())
            .send()?
            .error_for_status()?
            .json::<FeatureCollection<[f64; 2], PlaceProperties>>()?;

        first_point(body).ok_or_else(|| GeocodeError::NotFound(place.to_string()))
    }
}

impl PlaceAutocomplete for OrsClient {
    fn suggest(&self, partial: &str) -> Vec<PlaceSuggestion> {
        if partial.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }

        match self.autocomplete_candidates(partial) {
            Ok(candidates) => rank_suggestions(partial, candidates),
            Err(err) => {
                warn!(%partial, %err, "ORS autocomplete failed");
                Vec::new()
            }
        }
    }
}

impl RouteProvider for OrsClient {
    fn route(&self, waypoints: &[Coordinate]) -> Result<RouteResult, RouteError> {
        if waypoints.len() < 2 {
            return Err(RouteError::TooFewWaypoints(waypoints.len()));
        }

        let url = format!(
            "{}/v2/directions/{}/geojson",
            self.config.base_url, self.config.profile
        );
        let request = DirectionsRequest {
            coordinates: waypoints.iter().map(|c| c.lon_lat()).collect(),
            radiuses: vec![self.config.snap_radius_m; waypoints.len()],
        };

        debug!(waypoints = waypoints.len(), "ORS directions");

        let body = self
            .client
            .post(url)
            .header("Authorization", &self.config.api_key)
            .json(&request)
            .send()?
            .error_for_status()?
            .json::<FeatureCollection<Vec<[f64; 2]>, RouteProperties>>()?;

        route_from_collection(body)
    }
}

#[derive(Debug, Serialize)]
struct DirectionsRequest {
    coordinates: Vec<[f64; 2]>,
    radiuses: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection<C, P> {
    #[serde(default)]
    features: Vec<Feature<C, P>>,
}

#[derive(Debug, Deserialize)]
struct Feature<C, P> {
    geometry: Geometry<C>,
    #[serde(default)]
    properties: P,
}

#[derive(Debug, Deserialize)]
struct Geometry<C> {
    coordinates: C,
}

#[derive(Debug, Default, Deserialize)]
struct PlaceProperties {
    locality: Option<String>,
    name: Option<String>,
    county: Option<String>,
    region: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RouteProperties {
    summary: Option<RouteSummary>,
}

#[derive(Debug, Default, Deserialize)]
struct RouteSummary {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

fn candidate_from(feature: Feature<[f64; 2], PlaceProperties>) -> PlaceCandidate {
    let PlaceProperties {
        locality,
        name,
        county,
        region,
    } = feature.properties;
    PlaceCandidate {
        locality,
        name,
        county,
        region,
        location: Coordinate::from_lon_lat(feature.geometry.coordinates),
    }
}

fn first_point(body: FeatureCollection<[f64; 2], PlaceProperties>) -> Option<Coordinate> {
    body.features
        .into_iter()
        .next()
        .map(|feature| Coordinate::from_lon_lat(feature.geometry.coordinates))
}

fn route_from_collection(
    body: FeatureCollection<Vec<[f64; 2]>, RouteProperties>,
) -> Result<RouteResult, RouteError> {
    let feature = body.features.into_iter().next().ok_or(RouteError::NoRoute)?;
    let summary = feature
        .properties
        .summary
        .ok_or_else(|| RouteError::Malformed("missing route summary".to_string()))?;

    Ok(RouteResult {
        polyline: Polyline::from_lon_lat(&feature.geometry.coordinates),
        distance_km: summary.distance / 1000.0,
        duration_h: summary.duration / 3600.0,
    })
}
