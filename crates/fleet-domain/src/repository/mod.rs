//! Repository and gateway trait definitions

use async_trait::async_trait;
use fleet_types::{Error, TransportError, Vehicle};

use crate::model::LocationUpdate;

/// Local vehicle storage (the fallback data set)
pub trait VehicleRepository: Send + Sync {
    /// All vehicles, in insertion order
    fn find_all(&self) -> Result<Vec<Vehicle>, Error>;

    /// Find a vehicle by its id
    fn find_by_id(&self, id: &str) -> Result<Option<Vehicle>, Error>;

    /// Insert a vehicle, replacing any record with the same id
    fn insert(&self, vehicle: Vehicle) -> Result<(), Error>;

    /// Move a vehicle; returns the updated record, or `None` if the id is unknown
    fn update_location(
        &self,
        id: &str,
        update: &LocationUpdate,
    ) -> Result<Option<Vehicle>, Error>;
}

/// Remote vehicle API
#[async_trait]
pub trait VehicleGateway: Send + Sync {
    /// Raw body of the list endpoint; its shape varies between deployments
    async fn list_vehicles(&self) -> Result<serde_json::Value, TransportError>;

    /// Fetch a single vehicle
    async fn get_vehicle(&self, id: &str) -> Result<Vehicle, TransportError>;

    /// Send a new position for a vehicle
    async fn update_location(
        &self,
        id: &str,
        update: &LocationUpdate,
    ) -> Result<Vehicle, TransportError>;
}
