//! In-memory vehicle repository

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use fleet_domain::model::LocationUpdate;
use fleet_domain::repository::VehicleRepository;
use fleet_types::{Error, Result, Vehicle};

use crate::sample::sample_fleet;

/// Vehicle store held in memory; each instance is isolated
#[derive(Debug, Default)]
pub struct InMemoryVehicleRepository {
    vehicles: RwLock<Vec<Vehicle>>,
}

impl InMemoryVehicleRepository {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the given vehicles
    pub fn with_vehicles(vehicles: Vec<Vehicle>) -> Self {
        Self {
            vehicles: RwLock::new(vehicles),
        }
    }

    /// Create a store seeded with the built-in sample fleet
    pub fn with_sample_fleet() -> Self {
        Self::with_vehicles(sample_fleet())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Vehicle>>> {
        self.vehicles
            .read()
            .map_err(|_| Error::Repository("vehicle store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Vehicle>>> {
        self.vehicles
            .write()
            .map_err(|_| Error::Repository("vehicle store lock poisoned".to_string()))
    }
}

impl VehicleRepository for InMemoryVehicleRepository {
    fn find_all(&self) -> Result<Vec<Vehicle>> {
        Ok(self.read()?.clone())
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Vehicle>> {
        Ok(self.read()?.iter().find(|v| v.id == id).cloned())
    }

    fn insert(&self, vehicle: Vehicle) -> Result<()> {
        let mut vehicles = self.write()?;
        match vehicles.iter_mut().find(|v| v.id == vehicle.id) {
            Some(existing) => *existing = vehicle,
            None => vehicles.push(vehicle),
        }
        Ok(())
    }

    fn update_location(&self, id: &str, update: &LocationUpdate) -> Result<Option<Vehicle>> {
        let mut vehicles = self.write()?;
        let Some(vehicle) = vehicles.iter_mut().find(|v| v.id == id) else {
            return Ok(None);
        };
        update.apply_to(vehicle, Utc::now());
        tracing::debug!(id, lat = update.latitude, lng = update.longitude, "updated local vehicle position");
        Ok(Some(vehicle.clone()))
    }
}
