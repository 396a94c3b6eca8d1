//! Nominatim (OpenStreetMap) geocoder, used as the secondary provider.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coordinate::Coordinate;
use crate::error::GeocodeError;
use crate::traits::GeocodingProvider;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Nominatim's usage policy requires an identifying user agent.
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Appended to free-text queries.
    pub country_name: String,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "ev_planner".to_string(),
            timeout_secs: 5,
            country_name: "France".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::blocking::Client,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }
}

impl GeocodingProvider for NominatimClient {
    fn resolve(&self, place: &str) -> Result<Coordinate, GeocodeError> {
        let query = if self.config.country_name.is_empty() {
            place.to_string()
        } else {
            format!("{}, {}", place, self.config.country_name)
        };
        debug!(%query, "Nominatim search");

        let results = self
            .client
            .get(format!("{}/search", self.config.base_url))
            .query(&[("q", query.as_str()), ("format", "jsonv2"), ("limit", "1")])
            .send()?
            .error_for_status()?
            .json::<Vec<NominatimResult>>()?;

        let result = results
            .first()
            .ok_or_else(|| GeocodeError::NotFound(place.to_string()))?;
        result.coordinate()
    }
}

/// Raw Nominatim search hit; coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
}

impl NominatimResult {
    fn coordinate(&self) -> Result<Coordinate, GeocodeError> {
        let lat = self
            .lat
            .parse()
            .map_err(|_| GeocodeError::Malformed(format!("invalid latitude {:?}", self.lat)))?;
        let lon = self
            .lon
            .parse()
            .map_err(|_| GeocodeError::Malformed(format!("invalid longitude {:?}", self.lon)))?;
        Ok(Coordinate::new(lat, lon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = NominatimConfig::default();
        assert_eq!(config.base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.user_agent, "ev_planner");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_result_parsing() {
        let json = r#"[{"lat": "43.6047", "lon": "1.4442", "display_name": "Toulouse"}]"#;
        let results: Vec<NominatimResult> = serde_json::from_str(json).unwrap();
        assert_eq!(results[0].coordinate(), Ok(Coordinate::new(43.6047, 1.4442)));
    }

    #[test]
    fn test_invalid_latitude_is_malformed() {
        let result = NominatimResult {
            lat: "north".to_string(),
            lon: "1.0".to_string(),
        };
        assert!(matches!(result.coordinate(), Err(GeocodeError::Malformed(_))));
    }

    #[test]
    fn test_empty_result() {
        let results: Vec<NominatimResult> = serde_json::from_str("[]").unwrap();
        assert!(results.is_empty());
    }
}
