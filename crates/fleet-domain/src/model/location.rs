//! Location update payload

use chrono::{DateTime, SecondsFormat, Utc};
use fleet_types::Vehicle;
use serde::{Deserialize, Serialize};

/// New position and speed for one vehicle; serializes as the PATCH body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "velocidade")]
    pub speed: f64,
}

impl LocationUpdate {
    pub fn new(latitude: f64, longitude: f64, speed: f64) -> Self {
        Self {
            latitude,
            longitude,
            speed,
        }
    }

    /// Write position, speed and a fresh timestamp into `vehicle`
    pub fn apply_to(&self, vehicle: &mut Vehicle, now: DateTime<Utc>) {
        vehicle.latitude = self.latitude;
        vehicle.longitude = self.longitude;
        vehicle.speed = self.speed;
        vehicle.last_update = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    }
}
