//! Tracking page: header, tabs, map, list and vehicle details

use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, Ui};
use fleet_app::config::Config;
use fleet_app::poller::{FleetPoller, PollEvent};
use fleet_app::service::VehicleService;
use fleet_app::tracking::{Tab, TrackingState};
use fleet_app::view::format::{driver_label, format_speed, format_timestamp, refresh_interval_label};
use fleet_app::view::VehicleListView;
use fleet_types::Vehicle;
use tokio::runtime::Runtime;
use tracing::{debug, warn};

use crate::map_view::MapView;
use crate::theme;
use crate::{list_panel, table_panel};

pub const APP_TITLE: &str = "Rastreamento de Veículos";

type DetailResult = Result<Vehicle, String>;

/// Main application state
pub struct FleetApp {
    state: TrackingState,
    /// Map area; dropped before the runtime
    map: MapView,
    poll_events: Receiver<PollEvent>,
    poller: FleetPoller,
    poller_stopped: bool,
    detail_tx: Sender<DetailResult>,
    detail_rx: Receiver<DetailResult>,
    detail_loading: bool,
    interval_label: String,
    service: Arc<VehicleService>,
    runtime: Runtime,
}

impl FleetApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: Config,
        runtime: Runtime,
        service: VehicleService,
    ) -> Self {
        let mut style = (*cc.egui_ctx.style()).clone();
        style.interaction.tooltip_delay = 0.3;
        style.animation_time = 0.1;
        cc.egui_ctx.set_style(style);

        let service = Arc::new(service);
        let (poll_tx, poll_events) = channel();
        let repaint_ctx = cc.egui_ctx.clone();
        let poller = FleetPoller::spawn(
            runtime.handle(),
            service.clone(),
            config.poll_interval(),
            poll_tx,
            Arc::new(move || repaint_ctx.request_repaint()),
        );
        let (detail_tx, detail_rx) = channel();

        Self {
            state: TrackingState::new(),
            map: MapView::new(&config, runtime.handle().clone()),
            poll_events,
            poller,
            poller_stopped: false,
            detail_tx,
            detail_rx,
            detail_loading: false,
            interval_label: refresh_interval_label(config.poll_interval()),
            service,
            runtime,
        }
    }

    /// Apply everything the background tasks sent since the last frame
    fn drain_events(&mut self) {
        while !self.poller_stopped {
            match self.poll_events.try_recv() {
                Ok(PollEvent::Started { seq }) => self.state.begin_fetch(seq),
                Ok(PollEvent::Completed { seq, snapshot }) => {
                    self.state.apply_snapshot(seq, snapshot);
                }
                Ok(PollEvent::Failed { seq, message }) => {
                    self.state.apply_failure(seq, &message);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!(running = self.poller.is_running(), "fleet poller stopped");
                    self.state.set_error("A atualização automática foi interrompida.");
                    self.poller_stopped = true;
                }
            }
        }

        while let Ok(result) = self.detail_rx.try_recv() {
            self.detail_loading = false;
            match result {
                Ok(vehicle) => self.state.apply_vehicle(vehicle),
                Err(message) => self.state.set_error(message),
            }
        }
    }

    fn refresh_selected(&mut self, ctx: &egui::Context) {
        let Some(id) = self.state.selected().map(|v| v.id.clone()) else {
            return;
        };
        debug!(id = %id, "refreshing vehicle details");
        self.detail_loading = true;

        let service = self.service.clone();
        let tx = self.detail_tx.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let result = service
                .get_vehicle_by_id(&id)
                .await
                .map_err(|e| e.to_string());
            if tx.send(result).is_ok() {
                ctx.request_repaint();
            }
        });
    }

    fn render_header(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading(APP_TITLE);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let loading = self.state.is_loading();
                let label = if loading { "Atualizando..." } else { "Atualizar agora" };
                if ui.add_enabled(!loading, egui::Button::new(label)).clicked() {
                    self.poller.refresh_now();
                }
                if loading {
                    ui.spinner();
                }
            });
        });

        ui.horizontal(|ui| {
            ui.label(RichText::new(&self.interval_label).small().weak());
            if let Some(at) = self.state.last_refreshed() {
                ui.label(
                    RichText::new(format!("Atualizado às {}", at.format("%H:%M:%S")))
                        .small()
                        .weak(),
                );
            }
        });
    }

    fn render_banners(&mut self, ui: &mut Ui) {
        let mut dismiss = false;
        if let Some(message) = self.state.error() {
            egui::Frame::new()
                .fill(theme::ERROR_FILL)
                .corner_radius(4.0)
                .inner_margin(egui::Margin::same(8))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(message).color(Color32::WHITE));
                        if ui.small_button("Fechar").clicked() {
                            dismiss = true;
                        }
                    });
                });
            ui.add_space(4.0);
        }
        if dismiss {
            self.state.dismiss_error();
        }

        if let Some(notice) = self.state.notice() {
            egui::Frame::new()
                .fill(theme::NOTICE_FILL)
                .corner_radius(4.0)
                .inner_margin(egui::Margin::same(8))
                .show(ui, |ui| {
                    ui.label(RichText::new(notice).color(Color32::WHITE));
                });
            ui.add_space(4.0);
        }
    }

    fn render_tab_bar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            for tab in Tab::ALL {
                let selected = self.state.tab == tab;
                if ui.selectable_label(selected, tab.label()).clicked() {
                    self.state.tab = tab;
                }
                ui.add_space(8.0);
            }
        });
    }

    fn render_details(&mut self, ui: &mut Ui) {
        let Some(vehicle) = self.state.selected().cloned() else {
            return;
        };

        let mut refresh = false;
        let mut close = false;

        egui::Frame::new()
            .fill(theme::CARD_FILL)
            .corner_radius(6.0)
            .inner_margin(egui::Margin::same(12))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Detalhes do Veículo").strong().size(16.0));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Fechar").clicked() {
                            close = true;
                        }
                        let label = if self.detail_loading { "Atualizando..." } else { "Atualizar detalhes" };
                        if ui.add_enabled(!self.detail_loading, egui::Button::new(label)).clicked() {
                            refresh = true;
                        }
                    });
                });
                ui.add_space(6.0);

                egui::Grid::new("vehicle_details")
                    .num_columns(4)
                    .spacing([16.0, 4.0])
                    .show(ui, |ui| {
                        detail(ui, "Placa", &vehicle.plate);
                        detail(ui, "Modelo", &vehicle.model);
                        ui.end_row();
                        detail(ui, "Tipo", vehicle.vehicle_type.label());
                        detail(ui, "Status", vehicle.status.label());
                        ui.end_row();
                        detail(ui, "Motorista", driver_label(vehicle.driver.as_deref()));
                        detail(ui, "Velocidade", &format_speed(vehicle.speed));
                        ui.end_row();
                        detail(ui, "Latitude", &format!("{:.6}", vehicle.latitude));
                        detail(ui, "Longitude", &format!("{:.6}", vehicle.longitude));
                        ui.end_row();
                        detail(ui, "Última atualização", &format_timestamp(&vehicle.last_update));
                        ui.end_row();
                    });
            });

        if refresh {
            self.refresh_selected(ui.ctx());
        }
        if close {
            self.state.clear_selection();
        }
    }
}

fn detail(ui: &mut Ui, name: &str, value: &str) {
    ui.label(RichText::new(name).weak());
    ui.label(value);
}

impl eframe::App for FleetApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(4.0);
            self.render_header(ui);
            ui.add_space(4.0);
            self.render_banners(ui);
            self.render_tab_bar(ui);
            ui.add_space(4.0);
        });

        let mut clicked: Option<Vehicle> = None;

        match self.state.tab {
            Tab::Map => {
                egui::SidePanel::right("vehicle_list")
                    .default_width(320.0)
                    .resizable(true)
                    .show(ctx, |ui| {
                        let view = VehicleListView::new(self.state.vehicles(), self.state.selected());
                        if let Some(vehicle) = list_panel::show(ui, &view) {
                            clicked = Some(vehicle);
                        }
                    });

                if self.state.selected().is_some() {
                    egui::TopBottomPanel::bottom("vehicle_details").show(ctx, |ui| {
                        ui.add_space(6.0);
                        self.render_details(ui);
                        ui.add_space(6.0);
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    if let Some(vehicle) = self.map.show(ui, &self.state) {
                        clicked = Some(vehicle);
                    }
                });
            }
            Tab::Table => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    if let Some(vehicle) =
                        table_panel::show(ui, self.state.vehicles(), self.state.selected())
                    {
                        clicked = Some(vehicle);
                    }
                });
            }
        }

        if let Some(vehicle) = clicked {
            debug!(id = %vehicle.id, "vehicle selected");
            self.state.select(&vehicle);
        }
    }
}
