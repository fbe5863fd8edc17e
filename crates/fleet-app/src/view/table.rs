//! Tabular views of the fleet
//!
//! Two layouts: the full table tab, and the compact table that stands in
//! for the map when the tile map is disabled.

use fleet_types::Vehicle;

use super::format::{driver_label, format_speed, format_timestamp};

pub const FLEET_COLUMNS: [&str; 7] = [
    "Placa",
    "Modelo",
    "Tipo",
    "Status",
    "Velocidade",
    "Motorista",
    "Última atualização",
];

pub const FALLBACK_COLUMNS: [&str; 3] = ["Placa", "Modelo", "Status"];

pub const MAP_UNAVAILABLE_TITLE: &str = "Não foi possível carregar o mapa";
pub const MAP_UNAVAILABLE_DETAIL: &str = "O mapa está desativado ou indisponível nesta instalação.";
pub const FALLBACK_TABLE_TITLE: &str = "Visualização Alternativa de Veículos";
pub const FALLBACK_EMPTY_MESSAGE: &str = "Nenhum veículo encontrado para exibir.";

/// A row of text cells bound to its vehicle
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow<'a> {
    pub vehicle: &'a Vehicle,
    pub cells: Vec<String>,
    pub selected: bool,
}

/// Rows for the full table tab, one cell per [`FLEET_COLUMNS`] entry
pub fn fleet_rows<'a>(vehicles: &'a [Vehicle], selected: Option<&Vehicle>) -> Vec<TableRow<'a>> {
    vehicles
        .iter()
        .map(|vehicle| TableRow {
            vehicle,
            cells: vec![
                vehicle.plate.clone(),
                vehicle.model.clone(),
                vehicle.vehicle_type.label().to_string(),
                vehicle.status.label().to_string(),
                format_speed(vehicle.speed),
                driver_label(vehicle.driver.as_deref()).to_string(),
                format_timestamp(&vehicle.last_update),
            ],
            selected: selected.is_some_and(|s| s.id == vehicle.id),
        })
        .collect()
}

/// Rows for the map-unavailable table, one cell per [`FALLBACK_COLUMNS`] entry
pub fn fallback_rows(vehicles: &[Vehicle]) -> Vec<TableRow<'_>> {
    vehicles
        .iter()
        .map(|vehicle| TableRow {
            vehicle,
            cells: vec![
                vehicle.plate.clone(),
                vehicle.model.clone(),
                vehicle.status.label().to_string(),
            ],
            selected: false,
        })
        .collect()
}
