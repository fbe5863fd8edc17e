//! Table tab: the whole fleet in a grid

use eframe::egui::{self, RichText, ScrollArea, Ui};
use fleet_app::view::fleet_rows;
use fleet_app::view::format::vehicle_count;
use fleet_app::view::table::FLEET_COLUMNS;
use fleet_types::Vehicle;

/// Render the table; returns the vehicle whose plate was clicked
pub fn show(ui: &mut Ui, vehicles: &[Vehicle], selected: Option<&Vehicle>) -> Option<Vehicle> {
    let mut clicked = None;

    ui.label(RichText::new(vehicle_count(vehicles.len())).weak());
    ui.add_space(4.0);

    ScrollArea::both()
        .id_salt("fleet_table_scroll")
        .show(ui, |ui| {
            egui::Grid::new("fleet_table")
                .striped(true)
                .num_columns(FLEET_COLUMNS.len())
                .spacing([20.0, 6.0])
                .show(ui, |ui| {
                    for column in FLEET_COLUMNS {
                        ui.label(RichText::new(column).strong());
                    }
                    ui.end_row();

                    for row in fleet_rows(vehicles, selected) {
                        let mut cells = row.cells.iter();
                        if let Some(plate) = cells.next() {
                            if ui.selectable_label(row.selected, plate).clicked() {
                                clicked = Some(row.vehicle.clone());
                            }
                        }
                        for cell in cells {
                            ui.label(cell);
                        }
                        ui.end_row();
                    }
                });
        });

    clicked
}
