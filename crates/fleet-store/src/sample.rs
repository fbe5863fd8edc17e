//! Built-in sample fleet shown when the API is unreachable

use chrono::{SecondsFormat, Utc};
use fleet_types::{Vehicle, VehicleStatus, VehicleType};

/// The five sample vehicles, timestamped now
pub fn sample_fleet() -> Vec<Vehicle> {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    let entry = |id: &str,
                 plate: &str,
                 model: &str,
                 vehicle_type: VehicleType,
                 status: VehicleStatus,
                 driver: &str,
                 (latitude, longitude): (f64, f64),
                 speed: f64| Vehicle {
        id: id.to_string(),
        plate: plate.to_string(),
        model: model.to_string(),
        vehicle_type,
        status,
        driver: Some(driver.to_string()),
        last_update: now.clone(),
        latitude,
        longitude,
        speed,
    };

    vec![
        entry(
            "1",
            "ABC-1234",
            "Toyota Corolla",
            VehicleType::Car,
            VehicleStatus::Active,
            "João Silva",
            (-15.7801, -47.9292),
            65.0,
        ),
        entry(
            "2",
            "DEF-5678",
            "Ford Cargo",
            VehicleType::Truck,
            VehicleStatus::InMotion,
            "Maria Oliveira",
            (-23.5505, -46.6333),
            45.0,
        ),
        entry(
            "3",
            "GHI-9012",
            "Honda CG",
            VehicleType::Motorcycle,
            VehicleStatus::Stopped,
            "Carlos Santos",
            (-22.9068, -43.1729),
            0.0,
        ),
        entry(
            "4",
            "JKL-3456",
            "Mercedes Sprinter",
            VehicleType::Van,
            VehicleStatus::Inactive,
            "Ana Costa",
            (-30.0277, -51.2287),
            0.0,
        ),
        entry(
            "5",
            "MNO-7890",
            "Volvo B270F",
            VehicleType::Bus,
            VehicleStatus::Maintenance,
            "Ana Costa",
            (-19.9167, -43.9345),
            0.0,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_five_vehicles_with_unique_ids() {
        let fleet = sample_fleet();
        assert_eq!(fleet.len(), 5);
        let ids: HashSet<_> = fleet.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_first_vehicle() {
        let fleet = sample_fleet();
        assert_eq!(fleet[0].id, "1");
        assert_eq!(fleet[0].plate, "ABC-1234");
        assert!(fleet[0].last_update_at().is_some());
    }

    #[test]
    fn test_every_type_is_represented() {
        let fleet = sample_fleet();
        for kind in VehicleType::ALL {
            assert!(fleet.iter().any(|v| v.vehicle_type == kind));
        }
    }
}
