//! Vehicle list view model
//!
//! Everything the list panel draws, computed without a UI toolkit.

use fleet_types::Vehicle;

use super::format::{format_speed, format_timestamp, vehicle_count};
use super::style::BadgeTone;

pub const LIST_TITLE: &str = "Lista de Veículos";
pub const EMPTY_MESSAGE: &str = "Nenhum veículo encontrado";

/// One rendered row
#[derive(Debug, Clone, PartialEq)]
pub struct ListRow<'a> {
    pub vehicle: &'a Vehicle,
    pub selected: bool,
    pub badge: BadgeTone,
    pub driver_line: Option<String>,
    pub speed_label: String,
    pub updated_line: String,
}

/// Selectable list of vehicles
#[derive(Debug, Clone, Copy)]
pub struct VehicleListView<'a> {
    vehicles: &'a [Vehicle],
    selected: Option<&'a Vehicle>,
}

impl<'a> VehicleListView<'a> {
    pub fn new(vehicles: &'a [Vehicle], selected: Option<&'a Vehicle>) -> Self {
        Self { vehicles, selected }
    }

    pub fn title(&self) -> &'static str {
        LIST_TITLE
    }

    /// `Total: N veículos`
    pub fn count_line(&self) -> String {
        vehicle_count(self.vehicles.len())
    }

    /// Placeholder text when there is nothing to list
    pub fn empty_message(&self) -> Option<&'static str> {
        self.vehicles.is_empty().then_some(EMPTY_MESSAGE)
    }

    /// Selection is by id only, so a refreshed record stays highlighted
    pub fn is_selected(&self, vehicle: &Vehicle) -> bool {
        self.selected.is_some_and(|s| s.id == vehicle.id)
    }

    pub fn rows(&self) -> Vec<ListRow<'a>> {
        self.vehicles
            .iter()
            .map(|vehicle| ListRow {
                vehicle,
                selected: self.is_selected(vehicle),
                badge: BadgeTone::for_status(vehicle.status),
                driver_line: vehicle
                    .driver
                    .as_deref()
                    .filter(|d| !d.is_empty())
                    .map(|d| format!("Motorista: {}", d)),
                speed_label: format_speed(vehicle.speed),
                updated_line: format!(
                    "Última atualização: {}",
                    format_timestamp(&vehicle.last_update)
                ),
            })
            .collect()
    }

    /// Activate row `index`; calls `on_select` with that vehicle.
    /// Returns false when the index is out of range.
    pub fn click<F>(&self, index: usize, on_select: F) -> bool
    where
        F: FnOnce(&'a Vehicle),
    {
        match self.vehicles.get(index) {
            Some(vehicle) => {
                on_select(vehicle);
                true
            }
            None => false,
        }
    }
}
