//! Chargetrip GraphQL vehicle catalog with a static fallback.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::catalog::fallback_vehicles;
use crate::error::CatalogError;
use crate::model::Vehicle;
use crate::traits::VehicleCatalog;

/// Range assumed for entries that do not report one.
const DEFAULT_RANGE_KM: f64 = 300.0;

/// Battery size assumed for entries that do not report one.
const DEFAULT_BATTERY_KWH: f64 = 50.0;

const VEHICLE_LIST_QUERY: &str = r"
query vehicleList($size: Int) {
  vehicleList(page: 0, size: $size) {
    id
    naming { make model version }
    battery { usable_kwh full_kwh }
    range { chargetrip_range { best worst } }
  }
}
";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargetripConfig {
    pub base_url: String,
    pub client_id: Option<String>,
    pub app_id: Option<String>,
    pub page_size: u32,
    pub timeout_secs: u64,
}

impl Default for ChargetripConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.chargetrip.io/graphql".to_string(),
            client_id: None,
            app_id: None,
            page_size: 50,
            timeout_secs: 10,
        }
    }
}

impl ChargetripConfig {
    /// Both credentials are present.
    pub fn is_configured(&self) -> bool {
        self.client_id.as_deref().is_some_and(|id| !id.is_empty())
            && self.app_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct ChargetripCatalog {
    config: ChargetripConfig,
    client: reqwest::blocking::Client,
    fallback: Vec<Vehicle>,
}

impl ChargetripCatalog {
    pub fn new(config: ChargetripConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            client,
            fallback: fallback_vehicles(),
        })
    }

    /// Replace the list served when the remote catalog fails.
    pub fn with_fallback(mut self, vehicles: Vec<Vehicle>) -> Self {
        self.fallback = vehicles;
        self
    }

    fn fetch(&self) -> Result<Vec<Vehicle>, CatalogError> {
        let body = json!({
            "query": VEHICLE_LIST_QUERY,
            "variables": { "size": self.config.page_size },
        });

        let response = self
            .client
            .post(&self.config.base_url)
            .header("x-client-id", self.config.client_id.as_deref().unwrap_or_default())
            .header("x-app-id", self.config.app_id.as_deref().unwrap_or_default())
            .json(&body)
            .send()?
            .error_for_status()?
            .json::<GraphQlResponse>()?;

        let vehicles = vehicles_from_response(response)?;
        debug!(count = vehicles.len(), "Chargetrip catalog fetched");
        Ok(vehicles)
    }
}

impl VehicleCatalog for ChargetripCatalog {
    fn list(&self) -> Vec<Vehicle> {
        match self.fetch() {
            Ok(vehicles) => vehicles,
            Err(err) => {
                warn!(%err, "vehicle catalog unavailable, serving fallback list");
                self.fallback.clone()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<VehicleListData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct VehicleListData {
    #[serde(rename = "vehicleList", default)]
    vehicle_list: Vec<Option<RawVehicle>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawVehicle {
    id: Option<String>,
    naming: Option<Naming>,
    battery: Option<Battery>,
    range: Option<RangeInfo>,
}

#[derive(Debug, Deserialize)]
struct Naming {
    make: Option<String>,
    model: Option<String>,
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Battery {
    usable_kwh: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RangeInfo {
    chargetrip_range: Option<ChargetripRange>,
}

#[derive(Debug, Deserialize)]
struct ChargetripRange {
    best: Option<f64>,
}

fn vehicles_from_response(response: GraphQlResponse) -> Result<Vec<Vehicle>, CatalogError> {
    let Some(data) = response.data else {
        let message = response
            .errors
            .into_iter()
            .map(|err| err.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(CatalogError::Malformed(if message.is_empty() {
            "missing data".to_string()
        } else {
            message
        }));
    };

    let vehicles: Vec<Vehicle> = data
        .vehicle_list
        .into_iter()
        .flatten()
        .filter_map(RawVehicle::into_vehicle)
        .collect();

    if vehicles.is_empty() {
        return Err(CatalogError::Empty);
    }
    Ok(vehicles)
}

impl RawVehicle {
    fn into_vehicle(self) -> Option<Vehicle> {
        let naming = self.naming?;
        let range_km = self
            .range
            .and_then(|range| range.chargetrip_range)
            .and_then(|range| range.best)
            .filter(|km| *km > 0.0)
            .unwrap_or(DEFAULT_RANGE_KM);
        let battery_kwh = self
            .battery
            .and_then(|battery| battery.usable_kwh)
            .filter(|kwh| *kwh > 0.0)
            .unwrap_or(DEFAULT_BATTERY_KWH);

        Some(Vehicle {
            id: self.id?,
            make: naming.make?,
            model: naming.model?,
            version: naming.version.unwrap_or_default(),
            range_km,
            battery_kwh,
        })
    }
}
