//! Layered application configuration.
//!
//! Defaults, then an optional TOML file, then `EVTRIP_`-prefixed
//! environment variables using `__` between nested keys
//! (e.g. `EVTRIP_ORS__API_KEY`, `EVTRIP_PLANNER__SAFETY_MARGIN`).

use std::path::Path;

use ::config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::{Deserialize, Serialize};

use crate::chargetrip::ChargetripConfig;
use crate::irve::IrveConfig;
use crate::nominatim::NominatimConfig;
use crate::ors::OrsConfig;
use crate::osrm::OsrmConfig;
use crate::planner::PlanOptions;

/// Default config file stem, looked up in the working directory.
pub const DEFAULT_CONFIG_NAME: &str = "ev-trip";

pub const ENV_PREFIX: &str = "EVTRIP";

/// Which engine computes road routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingBackend {
    #[default]
    Ors,
    Osrm,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub routing: RoutingBackend,
    pub ors: OrsConfig,
    pub nominatim: NominatimConfig,
    pub osrm: OsrmConfig,
    pub irve: IrveConfig,
    pub chargetrip: ChargetripConfig,
    pub planner: PlanOptions,
}

impl AppConfig {
    /// Load from `path` (required when given, else `ev-trip.toml` if present)
    /// with environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let builder = match path {
            Some(path) => Config::builder().add_source(File::from(path).required(true)),
            None => Config::builder().add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };
        Self::finish(builder)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use ::config::FileFormat;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.routing, RoutingBackend::Ors);
        assert_eq!(config.planner.safety_margin, 0.10);
        assert_eq!(config.planner.search_radius_km, 50.0);
        assert_eq!(config.irve.limit, 10);
        assert!(!config.chargetrip.is_configured());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml = r#"
            routing = "osrm"

            [ors]
            api_key = "secret"

            [planner]
            charging_time_minutes = 45
            safety_margin = 0.15
        "#;
        let builder = Config::builder().add_source(File::from_str(toml, FileFormat::Toml));
        let config = AppConfig::finish(builder).unwrap();

        assert_eq!(config.routing, RoutingBackend::Osrm);
        assert_eq!(config.ors.api_key, "secret");
        assert_eq!(config.ors.profile, "driving-car");
        assert_eq!(config.planner.charging_time_minutes, 45);
        assert_eq!(config.planner.safety_margin, 0.15);
        assert_eq!(config.planner.fallback_speed_kmh, 90.0);
        assert_eq!(config.nominatim.timeout_secs, 5);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        assert!(AppConfig::load(Some(Path::new("/nonexistent/ev-trip.toml"))).is_err());
    }
}
