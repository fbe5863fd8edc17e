//! Vehicle list side panel

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use fleet_app::view::VehicleListView;
use fleet_types::Vehicle;

use crate::theme;

/// Render the list; returns the clicked vehicle
pub fn show(ui: &mut Ui, view: &VehicleListView<'_>) -> Option<Vehicle> {
    let mut clicked_index = None;

    ui.heading(view.title());
    ui.label(RichText::new(view.count_line()).weak());
    ui.separator();

    if let Some(message) = view.empty_message() {
        ui.add_space(20.0);
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(message).weak());
        });
        return None;
    }

    ScrollArea::vertical()
        .id_salt("vehicle_list_scroll")
        .show(ui, |ui| {
            for (index, row) in view.rows().iter().enumerate() {
                let fill = if row.selected {
                    ui.visuals().selection.bg_fill
                } else {
                    theme::CARD_FILL
                };

                let response = egui::Frame::new()
                    .fill(fill)
                    .corner_radius(6.0)
                    .inner_margin(egui::Margin::same(8))
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(&row.vehicle.plate).strong());
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                let (bg, fg) = theme::badge(row.badge);
                                egui::Frame::new()
                                    .fill(bg)
                                    .corner_radius(8.0)
                                    .inner_margin(egui::Margin::symmetric(6, 1))
                                    .show(ui, |ui| {
                                        ui.label(RichText::new(row.vehicle.status.label()).color(fg).small());
                                    });
                            });
                        });
                        ui.label(&row.vehicle.model);
                        if let Some(driver) = &row.driver_line {
                            ui.label(RichText::new(driver).small());
                        }
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(&row.speed_label).color(Color32::LIGHT_BLUE));
                            ui.label(RichText::new(&row.updated_line).small().weak());
                        });
                    })
                    .response
                    .interact(egui::Sense::click());

                if response.clicked() {
                    clicked_index = Some(index);
                }
                ui.add_space(4.0);
            }
        });

    let mut clicked = None;
    if let Some(index) = clicked_index {
        view.click(index, |vehicle| clicked = Some(vehicle.clone()));
    }
    clicked
}
