//! Charging-station directory backed by the French IRVE open dataset.
//!
//! Records are queried with a server-side distance filter; the distance the
//! planner sees is recomputed locally from each station's coordinates.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::coordinate::Coordinate;
use crate::haversine::haversine_km;
use crate::model::{ChargingStation, PowerRating};
use crate::traits::ChargingStationLocator;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IrveConfig {
    /// Records endpoint of the `bornes-irve` dataset.
    pub base_url: String,
    /// Raw records requested per lookup, sorted locally afterwards.
    pub limit: u32,
    pub timeout_secs: u64,
}

impl Default for IrveConfig {
    fn default() -> Self {
        Self {
            base_url: "https://opendata.reseaux-energies.fr/api/explore/v2.1/catalog/datasets/bornes-irve/records"
                .to_string(),
            limit: 10,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IrveClient {
    config: IrveConfig,
    client: reqwest::blocking::Client,
}

impl IrveClient {
    pub fn new(config: IrveConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn fetch(&self, point: Coordinate, radius_km: f64) -> Result<Vec<IrveRecord>, reqwest::Error> {
        let filter = distance_filter(point, radius_km);
        let limit = self.config.limit.to_string();

        self.client
            .get(&self.config.base_url)
            .query(&[("where", filter.as_str()), ("limit", limit.as_str())])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<IrveResponse>())
            .map(|body| parse_records(body.results))
    }
}

impl ChargingStationLocator for IrveClient {
    fn nearby(&self, point: Coordinate, radius_km: f64) -> Vec<ChargingStation> {
        match self.fetch(point, radius_km) {
            Ok(records) => {
                debug!(%point, radius_km, raw = records.len(), "IRVE lookup");
                stations_by_distance(point, records)
            }
            Err(err) => {
                warn!(%point, radius_km, %err, "IRVE lookup failed");
                Vec::new()
            }
        }
    }
}

/// ODSQL clause selecting stations within `radius_km` of `point`.
fn distance_filter(point: Coordinate, radius_km: f64) -> String {
    format!(
        "distance(geo_point_borne, geom'POINT({} {})', {}km)",
        point.lon, point.lat, radius_km
    )
}

/// Decode records one by one; a malformed record is skipped, not the batch.
fn parse_records(results: Vec<Value>) -> Vec<IrveRecord> {
    results
        .into_iter()
        .filter_map(|raw| match serde_json::from_value(raw) {
            Ok(record) => Some(record),
            Err(err) => {
                debug!(%err, "skipping malformed IRVE record");
                None
            }
        })
        .collect()
}

/// Convert raw records into stations sorted nearest first.
fn stations_by_distance(point: Coordinate, records: Vec<IrveRecord>) -> Vec<ChargingStation> {
    let mut stations: Vec<ChargingStation> = records
        .into_iter()
        .filter_map(|record| record.into_station(point))
        .collect();
    stations.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    stations
}

#[derive(Debug, Deserialize)]
struct IrveResponse {
    #[serde(default)]
    results: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct IrveRecord {
    geo_point_borne: Option<GeoPoint>,
    n_enseigne: Option<String>,
    n_operateur: Option<String>,
    ad_station: Option<String>,
    commune: Option<String>,
    puiss_max: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct GeoPoint {
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IrveRecord {
    fn into_station(self, origin: Coordinate) -> Option<ChargingStation> {
        let geo = self.geo_point_borne?;
        let location = Coordinate::new(geo.lat?, geo.lon?);

        Some(ChargingStation {
            name: non_empty(self.n_enseigne)
                .or_else(|| non_empty(self.n_operateur))
                .unwrap_or_else(|| "Unknown station".to_string()),
            address: non_empty(self.ad_station).unwrap_or_else(|| "Unknown address".to_string()),
            city: non_empty(self.commune),
            location,
            distance_km: haversine_km(origin, location),
            power: self.puiss_max.as_ref().map_or(PowerRating::Unknown, power_rating),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn power_rating(value: &Value) -> PowerRating {
    match value {
        Value::Number(n) => n.as_f64().map_or(PowerRating::Unknown, PowerRating::Kw),
        Value::String(s) => s.parse().unwrap_or(PowerRating::Unknown),
        _ => PowerRating::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Coordinate = Coordinate::new(46.5, 3.3);

    fn record(lat: f64, lon: f64, name: &str) -> IrveRecord {
        IrveRecord {
            geo_point_borne: Some(GeoPoint {
                lat: Some(lat),
                lon: Some(lon),
            }),
            n_enseigne: Some(name.to_string()),
            ..IrveRecord::default()
        }
    }

    #[test]
    fn test_distance_filter() {
        let filter = distance_filter(Coordinate::new(46.5, 3.25), 50.0);
        assert_eq!(filter, "distance(geo_point_borne, geom'POINT(3.25 46.5)', 50km)");
    }

    #[test]
    fn test_sorted_nearest_first() {
        let stations = stations_by_distance(
            ORIGIN,
            vec![
                record(46.9, 3.3, "far"),
                record(46.51, 3.3, "near"),
                record(46.7, 3.3, "middle"),
            ],
        );
        let names: Vec<&str> = stations.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["near", "middle", "far"]);
        assert!(stations[0].distance_km < 2.0);
    }

    #[test]
    fn test_records_without_coordinates_dropped() {
        let stations = stations_by_distance(ORIGIN, vec![IrveRecord::default(), record(46.5, 3.3, "ok")]);
        assert_eq!(stations.len(), 1);
    }

    #[test]
    fn test_parse_record_fields() {
        let json = r#"{"total_count": 2, "results": [
            {"n_enseigne": "", "n_operateur": "Izivia", "ad_station": "Aire de Moulins",
             "commune": "Moulins", "puiss_max": 150,
             "geo_point_borne": {"lon": 3.33, "lat": 46.56}},
            {"n_enseigne": null, "n_operateur": null, "ad_station": null,
             "puiss_max": "22", "geo_point_borne": {"lon": 3.4, "lat": 46.6}}
        ]}"#;
        let body: IrveResponse = serde_json::from_str(json).unwrap();
        let stations = stations_by_distance(ORIGIN, parse_records(body.results));

        assert_eq!(stations[0].name, "Izivia");
        assert_eq!(stations[0].city.as_deref(), Some("Moulins"));
        assert_eq!(stations[0].power, PowerRating::Kw(150.0));
        assert_eq!(stations[1].name, "Unknown station");
        assert_eq!(stations[1].address, "Unknown address");
        assert_eq!(stations[1].power, PowerRating::Kw(22.0));
    }

    #[test]
    fn test_partial_coordinates_drop_only_that_record() {
        let json = r#"{"results": [
            {"n_enseigne": "Ionity", "ad_station": "Aire de Moulins",
             "geo_point_borne": {"lon": 3.33, "lat": 46.56}},
            {"n_enseigne": "Partial", "geo_point_borne": {"lon": 3.4}},
            {"n_enseigne": "Null", "geo_point_borne": {"lon": null, "lat": 46.6}},
            {"n_enseigne": "Text", "geo_point_borne": {"lon": "3.4", "lat": "46.6"}},
            {"n_enseigne": "Nowhere"}
        ]}"#;
        let body: IrveResponse = serde_json::from_str(json).unwrap();
        let stations = stations_by_distance(ORIGIN, parse_records(body.results));

        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].name, "Ionity");
        assert_eq!(stations[0].location, Coordinate::new(46.56, 3.33));
    }

    #[test]
    fn test_power_rating_values() {
        assert_eq!(power_rating(&Value::from(7.4)), PowerRating::Kw(7.4));
        assert_eq!(power_rating(&Value::from("N/A")), PowerRating::Unknown);
        assert_eq!(power_rating(&Value::Bool(true)), PowerRating::Unknown);
    }

    #[test]
    fn test_unreachable_directory_is_empty() {
        let client = IrveClient::new(IrveConfig {
            base_url: "http://127.0.0.1:9/records".to_string(),
            timeout_secs: 1,
            ..IrveConfig::default()
        })
        .unwrap();
        assert!(client.nearby(ORIGIN, 50.0).is_empty());
    }
}
