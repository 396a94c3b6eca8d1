//! Request handling: resolves a vehicle and two city names into a plan.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::coordinate::Coordinate;
use crate::error::PlanError;
use crate::model::{TripPlan, Vehicle};
use crate::planner::{PlanOptions, is_positive, plan};
use crate::traits::{ChargingStationLocator, GeocodingProvider, RouteProvider, VehicleCatalog};

/// What a caller asks for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    pub vehicle_id: String,
    pub start_city: String,
    pub end_city: String,
    /// Overrides the configured minutes per charging stop.
    #[serde(default)]
    pub charging_time_minutes: Option<u32>,
}

/// A resolved trip endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub city: String,
    pub location: Coordinate,
}

/// What the caller gets back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripResponse {
    pub vehicle: Vehicle,
    pub start: Endpoint,
    pub end: Endpoint,
    pub trip: TripPlan,
}

#[derive(Debug)]
pub struct TripService<G, R, L, C> {
    geocoder: G,
    router: R,
    locator: L,
    catalog: C,
    options: PlanOptions,
}

impl<G, R, L, C> TripService<G, R, L, C>
where
    G: GeocodingProvider,
    R: RouteProvider,
    L: ChargingStationLocator + Sync,
    C: VehicleCatalog,
{
    pub fn new(geocoder: G, router: R, locator: L, catalog: C, options: PlanOptions) -> Self {
        Self {
            geocoder,
            router,
            locator,
            catalog,
            options,
        }
    }

    pub fn vehicles(&self) -> Vec<Vehicle> {
        self.catalog.list()
    }

    /// Plan a trip. Fails only when the vehicle or a city cannot be resolved.
    #[instrument(skip(self), fields(vehicle = %request.vehicle_id))]
    pub fn plan_trip(&self, request: &TripRequest) -> Result<TripResponse, PlanError> {
        let vehicle = self
            .catalog
            .get(&request.vehicle_id)
            .ok_or_else(|| PlanError::VehicleNotFound(request.vehicle_id.clone()))?;

        if !is_positive(vehicle.range_km) {
            return Err(PlanError::InvalidVehicleRange {
                id: vehicle.id,
                range_km: vehicle.range_km,
            });
        }

        let start = self.locate(&request.start_city)?;
        let end = self.locate(&request.end_city)?;

        let options = match request.charging_time_minutes {
            Some(minutes) => self.options.clone().with_charging_time(minutes),
            None => self.options.clone(),
        };

        let trip = plan(
            start.location,
            end.location,
            &vehicle,
            &self.router,
            &self.locator,
            &options,
        );

        info!(
            from = %start.city,
            to = %end.city,
            distance_km = trip.total_distance_km,
            stops = trip.num_stops,
            total_time_h = trip.total_time_h,
            "trip planned"
        );

        Ok(TripResponse {
            vehicle,
            start,
            end,
            trip,
        })
    }

    fn locate(&self, city: &str) -> Result<Endpoint, PlanError> {
        match self.geocoder.resolve(city) {
            Ok(location) => Ok(Endpoint {
                city: city.to_string(),
                location,
            }),
            Err(err) => {
                warn!(%city, %err, "could not geocode city");
                Err(PlanError::Geocoding {
                    city: city.to_string(),
                })
            }
        }
    }
}
