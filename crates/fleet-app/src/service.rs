//! Vehicle Service - fleet data access with offline fallback
//!
//! The UI must always have something to render. Every remote call goes
//! through the gateway first; when it fails the service answers from the
//! local repository instead:
//! 1. List: any failure or unknown body shape yields the repository contents
//! 2. By id: failure falls back to the repository record, else "not found"
//! 3. Location update: failure mutates the repository record, else "not found"

use std::sync::Arc;

use fleet_domain::model::LocationUpdate;
use fleet_domain::repository::{VehicleGateway, VehicleRepository};
use fleet_domain::service::ListPayload;
use fleet_store::InMemoryVehicleRepository;
use fleet_types::{Error, Result, Vehicle};
use tracing::{error, info, warn};

/// Where a fleet snapshot came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FleetOrigin {
    /// Live API data
    Remote,
    /// Local sample data; `reason` describes the API failure
    Fallback { reason: String },
}

/// One fetch of the whole fleet
#[derive(Debug, Clone, PartialEq)]
pub struct FleetSnapshot {
    pub vehicles: Vec<Vehicle>,
    pub origin: FleetOrigin,
}

impl FleetSnapshot {
    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, FleetOrigin::Fallback { .. })
    }
}

/// Fleet data access used by the tracking page
#[derive(Clone)]
pub struct VehicleService {
    gateway: Arc<dyn VehicleGateway>,
    fallback: Arc<dyn VehicleRepository>,
}

impl std::fmt::Debug for VehicleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VehicleService").finish_non_exhaustive()
    }
}

impl VehicleService {
    pub fn new(gateway: Arc<dyn VehicleGateway>, fallback: Arc<dyn VehicleRepository>) -> Self {
        Self { gateway, fallback }
    }

    /// Service whose fallback is a fresh copy of the built-in sample fleet
    pub fn with_sample_fallback(gateway: Arc<dyn VehicleGateway>) -> Self {
        Self::new(gateway, Arc::new(InMemoryVehicleRepository::with_sample_fleet()))
    }

    /// Fetch the fleet, reporting whether fallback data was used. Never fails.
    pub async fn fetch_fleet(&self) -> FleetSnapshot {
        let body = match self.gateway.list_vehicles().await {
            Ok(body) => body,
            Err(e) => return self.fallback_fleet(format!("Erro ao buscar veículos: {}", e)),
        };

        match ListPayload::detect(body).into_vehicles() {
            Ok(vehicles) => {
                info!(count = vehicles.len(), "received vehicles from API");
                FleetSnapshot {
                    vehicles,
                    origin: FleetOrigin::Remote,
                }
            }
            Err(reason) => {
                self.fallback_fleet(format!("Formato de resposta não reconhecido: {}", reason))
            }
        }
    }

    /// Fetch the fleet; failures are masked with fallback data
    pub async fn get_vehicles(&self) -> Vec<Vehicle> {
        self.fetch_fleet().await.vehicles
    }

    /// Fetch one vehicle; falls back to the local record with the same id
    pub async fn get_vehicle_by_id(&self, id: &str) -> Result<Vehicle> {
        match self.gateway.get_vehicle(id).await {
            Ok(vehicle) => Ok(vehicle),
            Err(e) => {
                warn!(id, error = %e, "failed to fetch vehicle, trying local data");
                self.fallback
                    .find_by_id(id)?
                    .ok_or_else(|| Error::VehicleNotFound(id.to_string()))
            }
        }
    }

    /// Push a new position; on failure the local record is moved instead
    pub async fn update_vehicle_location(
        &self,
        id: &str,
        latitude: f64,
        longitude: f64,
        speed: f64,
    ) -> Result<Vehicle> {
        let update = LocationUpdate::new(latitude, longitude, speed);
        match self.gateway.update_location(id, &update).await {
            Ok(vehicle) => Ok(vehicle),
            Err(e) => {
                warn!(id, error = %e, "failed to update vehicle location, updating local data");
                self.fallback
                    .update_location(id, &update)?
                    .ok_or_else(|| Error::VehicleNotFound(id.to_string()))
            }
        }
    }

    fn fallback_fleet(&self, reason: String) -> FleetSnapshot {
        warn!(reason = %reason, "using sample vehicles");
        let vehicles = self.fallback.find_all().unwrap_or_else(|e| {
            error!(error = %e, "fallback repository unavailable");
            Vec::new()
        });
        FleetSnapshot {
            vehicles,
            origin: FleetOrigin::Fallback { reason },
        }
    }
}
