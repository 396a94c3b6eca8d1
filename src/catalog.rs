//! In-memory vehicle catalog and the built-in fallback list.

use crate::model::Vehicle;
use crate::traits::VehicleCatalog;

/// Well-known vehicles served when no remote catalog answers.
pub fn fallback_vehicles() -> Vec<Vehicle> {
    vec![
        Vehicle::new("1", "Tesla", "Model 3", "Long Range", 580.0, 75.0),
        Vehicle::new("2", "Tesla", "Model Y", "Long Range", 533.0, 75.0),
        Vehicle::new("3", "Renault", "Zoe", "R135", 395.0, 52.0),
    ]
}

/// A fixed list of vehicles.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    vehicles: Vec<Vehicle>,
}

impl StaticCatalog {
    pub fn new(vehicles: Vec<Vehicle>) -> Self {
        Self { vehicles }
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new(fallback_vehicles())
    }
}

impl VehicleCatalog for StaticCatalog {
    fn list(&self) -> Vec<Vehicle> {
        self.vehicles.clone()
    }

    fn get(&self, id: &str) -> Option<Vehicle> {
        self.vehicles.iter().find(|vehicle| vehicle.id == id).cloned()
    }
}
