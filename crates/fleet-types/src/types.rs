//! Vehicle record and its enumerations

use serde::{de, Deserialize, Deserializer, Serialize};

/// Accept the vehicle id as either a JSON string or a JSON number
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Text(s) => Ok(s),
        RawId::Int(n) => Ok(n.to_string()),
        RawId::Float(f) if f.fract() == 0.0 => Ok(format!("{}", f as i64)),
        RawId::Float(f) => Err(de::Error::custom(format!("invalid vehicle id: {}", f))),
    }
}

/// Vehicle classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    #[serde(rename = "CARRO")]
    Car,
    #[serde(rename = "CAMINHÃO")]
    Truck,
    #[serde(rename = "MOTO")]
    Motorcycle,
    #[serde(rename = "VAN")]
    Van,
    #[serde(rename = "ÔNIBUS")]
    Bus,
}

impl VehicleType {
    pub const ALL: [VehicleType; 5] = [
        VehicleType::Car,
        VehicleType::Truck,
        VehicleType::Motorcycle,
        VehicleType::Van,
        VehicleType::Bus,
    ];

    /// Display label (same text the API uses)
    pub fn label(&self) -> &'static str {
        match self {
            VehicleType::Car => "CARRO",
            VehicleType::Truck => "CAMINHÃO",
            VehicleType::Motorcycle => "MOTO",
            VehicleType::Van => "VAN",
            VehicleType::Bus => "ÔNIBUS",
        }
    }
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Operational status reported by the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleStatus {
    #[serde(rename = "ATIVO")]
    Active,
    #[serde(rename = "INATIVO")]
    Inactive,
    #[serde(rename = "MANUTENÇÃO")]
    Maintenance,
    #[serde(rename = "PARADO")]
    Stopped,
    #[serde(rename = "EM MOVIMENTO")]
    InMotion,
}

impl VehicleStatus {
    pub const ALL: [VehicleStatus; 5] = [
        VehicleStatus::Active,
        VehicleStatus::Inactive,
        VehicleStatus::Maintenance,
        VehicleStatus::Stopped,
        VehicleStatus::InMotion,
    ];

    /// Display label (same text the API uses)
    pub fn label(&self) -> &'static str {
        match self {
            VehicleStatus::Active => "ATIVO",
            VehicleStatus::Inactive => "INATIVO",
            VehicleStatus::Maintenance => "MANUTENÇÃO",
            VehicleStatus::Stopped => "PARADO",
            VehicleStatus::InMotion => "EM MOVIMENTO",
        }
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A tracked fleet vehicle as delivered by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Unique within a fleet snapshot
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// License plate (e.g., "ABC-1234")
    #[serde(rename = "placa")]
    pub plate: String,
    /// Model name (e.g., "Toyota Corolla")
    #[serde(rename = "modelo")]
    pub model: String,
    #[serde(rename = "tipo")]
    pub vehicle_type: VehicleType,
    pub status: VehicleStatus,
    #[serde(rename = "motorista", default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    /// ISO-8601 timestamp of the last position report
    #[serde(rename = "ultimaAtualizacao")]
    pub last_update: String,
    pub latitude: f64,
    pub longitude: f64,
    /// km/h
    #[serde(rename = "velocidade")]
    pub speed: f64,
}

impl Vehicle {
    /// Parsed `last_update`, if it is valid RFC 3339
    pub fn last_update_at(&self) -> Option<chrono::DateTime<chrono::FixedOffset>> {
        chrono::DateTime::parse_from_rfc3339(&self.last_update).ok()
    }
}
