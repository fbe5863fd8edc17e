//! Map area of the tracking page

use eframe::egui::{self, Color32, RichText};
use fleet_app::config::Config;
use fleet_app::tracking::TrackingState;
use fleet_app::view::style::table_chip;
use fleet_app::view::table::{
    FALLBACK_COLUMNS, FALLBACK_EMPTY_MESSAGE, FALLBACK_TABLE_TITLE, MAP_UNAVAILABLE_DETAIL,
    MAP_UNAVAILABLE_TITLE,
};
use fleet_app::view::{fallback_rows, MarkerLayer};
use fleet_domain::model::LatLng;
use fleet_infra::TileFetcher;
use fleet_types::Vehicle;
use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::canvas::CanvasSurface;
use crate::theme;
use crate::tiles::TileLayer;

/// Interactive map, or a plain table when the map is unavailable.
/// Which one is decided once, at construction.
pub enum MapView {
    Interactive(InteractiveMap),
    Fallback,
}

pub struct InteractiveMap {
    layer: MarkerLayer<CanvasSurface>,
    synced_revision: Option<u64>,
    view: (LatLng, u8),
}

impl MapView {
    pub fn new(config: &Config, runtime: Handle) -> Self {
        if !config.tracking.map_enabled {
            info!("map disabled by configuration");
            return MapView::Fallback;
        }
        match TileFetcher::new(config.tile_source()) {
            Ok(fetcher) => {
                let surface = CanvasSurface::new(TileLayer::new(fetcher, runtime));
                let view = (LatLng::default(), fleet_app::tracking::OVERVIEW_ZOOM);
                MapView::Interactive(InteractiveMap {
                    layer: MarkerLayer::new(surface, view.0, view.1),
                    synced_revision: None,
                    view,
                })
            }
            Err(e) => {
                warn!(error = %e, "tile client unavailable, showing table instead of map");
                MapView::Fallback
            }
        }
    }

    /// Render; returns the vehicle whose marker or row was clicked
    pub fn show(&mut self, ui: &mut egui::Ui, state: &TrackingState) -> Option<Vehicle> {
        match self {
            MapView::Interactive(map) => map.show(ui, state),
            MapView::Fallback => show_fallback(ui, state.vehicles()),
        }
    }
}

impl InteractiveMap {
    fn show(&mut self, ui: &mut egui::Ui, state: &TrackingState) -> Option<Vehicle> {
        if self.synced_revision != Some(state.revision()) {
            self.layer.sync(state.vehicles());
            self.synced_revision = Some(state.revision());
        }

        let view = (state.center(), state.zoom());
        if view != self.view {
            self.layer.set_view(view.0, view.1);
            self.view = view;
        }

        let handle = self.layer.surface_mut().show(ui)?;
        self.layer.click(&handle, |vehicle| {
            info!(id = %vehicle.id, plate = %vehicle.plate, "marker clicked");
        })
    }
}

fn show_fallback(ui: &mut egui::Ui, vehicles: &[Vehicle]) -> Option<Vehicle> {
    let mut clicked = None;

    ui.label(RichText::new(MAP_UNAVAILABLE_TITLE).strong().color(Color32::LIGHT_RED));
    ui.label(RichText::new(MAP_UNAVAILABLE_DETAIL).weak());
    ui.add_space(8.0);
    ui.heading(FALLBACK_TABLE_TITLE);
    ui.add_space(4.0);

    if vehicles.is_empty() {
        ui.label(FALLBACK_EMPTY_MESSAGE);
        return None;
    }

    egui::ScrollArea::vertical()
        .id_salt("fallback_table_scroll")
        .show(ui, |ui| {
            egui::Grid::new("fallback_table")
                .striped(true)
                .num_columns(FALLBACK_COLUMNS.len())
                .spacing([24.0, 6.0])
                .show(ui, |ui| {
                    for column in FALLBACK_COLUMNS {
                        ui.label(RichText::new(column).strong());
                    }
                    ui.end_row();

                    for row in fallback_rows(vehicles) {
                        if ui.selectable_label(false, &row.cells[0]).clicked() {
                            clicked = Some(row.vehicle.clone());
                        }
                        ui.label(&row.cells[1]);
                        let (fill, text) = table_chip(row.vehicle.status);
                        egui::Frame::new()
                            .fill(theme::color(fill))
                            .corner_radius(4.0)
                            .inner_margin(egui::Margin::symmetric(6, 2))
                            .show(ui, |ui| {
                                ui.label(RichText::new(&row.cells[2]).color(theme::color(text)).small());
                            });
                        ui.end_row();
                    }
                });
        });

    clicked
}
