//! ev-trip CLI
//!
//! Plans electric-vehicle trips from the command line.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use ev_trip_planner::catalog::StaticCatalog;
use ev_trip_planner::chargetrip::ChargetripCatalog;
use ev_trip_planner::format::{format_hours, render_itinerary};
use ev_trip_planner::geocoding::FallbackGeocoder;
use ev_trip_planner::irve::IrveClient;
use ev_trip_planner::nominatim::NominatimClient;
use ev_trip_planner::ors::OrsClient;
use ev_trip_planner::osrm::OsrmClient;
use ev_trip_planner::service::{TripRequest, TripService};
use ev_trip_planner::settings::{AppConfig, RoutingBackend};
use ev_trip_planner::traits::{PlaceAutocomplete, RouteProvider, VehicleCatalog};

#[derive(Parser)]
#[command(name = "ev-trip")]
#[command(author, version, about = "Electric-vehicle trip planner", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to ./ev-trip.toml when present)
    #[arg(short, long, env = "EVTRIP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available vehicles
    Vehicles,

    /// Plan a trip between two cities
    Plan {
        /// Vehicle id (see `vehicles`)
        #[arg(long)]
        vehicle: String,

        /// Departure city
        from: String,

        /// Destination city
        to: String,

        /// Minutes spent at each charging stop
        #[arg(long)]
        charging_minutes: Option<u32>,

        /// Print the full response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Suggest cities for partial input
    Suggest {
        /// Partial city name
        query: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if config.ors.api_key.is_empty() {
        warn!("no OpenRouteService API key configured (EVTRIP_ORS__API_KEY)");
    }

    let ors = OrsClient::new(config.ors.clone()).context("failed to build ORS client")?;
    let catalog = build_catalog(&config)?;

    match cli.command {
        Commands::Vehicles => {
            for vehicle in catalog.list() {
                println!(
                    "{:<26} {:<40} {:>6.0} km {:>5.0} kWh",
                    vehicle.id,
                    vehicle.display_name(),
                    vehicle.range_km,
                    vehicle.battery_kwh
                );
            }
        }
        Commands::Suggest { query } => {
            for suggestion in ors.suggest(&query) {
                println!("{} {}", suggestion.label, suggestion.location);
            }
        }
        Commands::Plan {
            vehicle,
            from,
            to,
            charging_minutes,
            json,
        } => {
            let nominatim =
                NominatimClient::new(config.nominatim.clone()).context("failed to build Nominatim client")?;
            let locator = IrveClient::new(config.irve.clone()).context("failed to build IRVE client")?;
            let router = build_router(&config, &ors)?;
            let geocoder = FallbackGeocoder::new(ors, nominatim);

            let service = TripService::new(geocoder, router, locator, catalog, config.planner.clone());
            let request = TripRequest {
                vehicle_id: vehicle,
                start_city: from,
                end_city: to,
                charging_time_minutes: charging_minutes,
            };

            let response = service.plan_trip(&request)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print!("{}", render_itinerary(&response));
                if response.trip.num_stops == 0 {
                    println!(
                        "No charging needed: {} of driving.",
                        format_hours(response.trip.driving_time_h)
                    );
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_catalog(config: &AppConfig) -> anyhow::Result<Box<dyn VehicleCatalog>> {
    if config.chargetrip.is_configured() {
        let catalog =
            ChargetripCatalog::new(config.chargetrip.clone()).context("failed to build Chargetrip client")?;
        Ok(Box::new(catalog))
    } else {
        warn!("Chargetrip credentials missing, using built-in vehicle list");
        Ok(Box::new(StaticCatalog::default()))
    }
}

fn build_router(config: &AppConfig, ors: &OrsClient) -> anyhow::Result<Box<dyn RouteProvider>> {
    Ok(match config.routing {
        RoutingBackend::Ors => Box::new(ors.clone()),
        RoutingBackend::Osrm => {
            Box::new(OsrmClient::new(config.osrm.clone()).context("failed to build OSRM client")?)
        }
    })
}
