//! Tracking page state
//!
//! Owns the current fleet, the selection and everything the page derives
//! from them (map center and zoom, error banner, fallback notice). Fetch
//! results are tagged with a sequence number; a result older than the
//! newest one already applied is dropped.

use chrono::{DateTime, Local};
use fleet_domain::model::{LatLng, DEFAULT_CENTER};
use fleet_types::Vehicle;
use tracing::{debug, warn};

use crate::service::{FleetOrigin, FleetSnapshot};

/// Zoom used when a vehicle is selected
pub const SELECTED_ZOOM: u8 = 15;

/// Zoom used for the whole-country overview
pub const OVERVIEW_ZOOM: u8 = 5;

pub const LOAD_ERROR_MESSAGE: &str =
    "Não foi possível carregar os veículos. Por favor, tente novamente.";

pub const FALLBACK_NOTICE: &str =
    "API indisponível. Exibindo dados de exemplo.";

/// Page tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Map,
    Table,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Map, Tab::Table];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Map => "Mapa",
            Tab::Table => "Tabela",
        }
    }
}

/// State behind the tracking page
#[derive(Debug, Default)]
pub struct TrackingState {
    vehicles: Vec<Vehicle>,
    /// Highest sequence number handed to a fetch
    requested_seq: u64,
    /// Highest sequence number whose result has arrived
    settled_seq: u64,
    /// Bumped whenever `vehicles` changes
    revision: u64,
    error: Option<String>,
    notice: Option<String>,
    selected: Option<Vehicle>,
    pub tab: Tab,
    last_refreshed: Option<DateTime<Local>>,
}

impl TrackingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Changes every time the vehicle list is replaced or edited
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn selected(&self) -> Option<&Vehicle> {
        self.selected.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Local>> {
        self.last_refreshed
    }

    /// True while a fetch newer than every settled result is outstanding
    pub fn is_loading(&self) -> bool {
        self.requested_seq > self.settled_seq
    }

    /// Record that fetch `seq` has started
    pub fn begin_fetch(&mut self, seq: u64) {
        self.requested_seq = self.requested_seq.max(seq);
    }

    /// Apply a fetch result. Returns false when the result is stale.
    pub fn apply_snapshot(&mut self, seq: u64, snapshot: FleetSnapshot) -> bool {
        if !self.settle(seq) {
            debug!(seq, settled = self.settled_seq, "dropping stale fleet snapshot");
            return false;
        }

        self.notice = match &snapshot.origin {
            FleetOrigin::Remote => None,
            FleetOrigin::Fallback { .. } => Some(FALLBACK_NOTICE.to_string()),
        };
        self.error = None;
        self.vehicles = snapshot.vehicles;
        self.revision += 1;
        self.last_refreshed = Some(Local::now());
        self.refresh_selection();
        true
    }

    /// Apply a failed fetch. Returns false when the failure is stale.
    pub fn apply_failure(&mut self, seq: u64, message: &str) -> bool {
        if !self.settle(seq) {
            return false;
        }
        warn!(seq, error = message, "fleet fetch failed");
        self.error = Some(LOAD_ERROR_MESSAGE.to_string());
        true
    }

    /// Replace one record, e.g. after a single-vehicle refresh
    pub fn apply_vehicle(&mut self, vehicle: Vehicle) {
        match self.vehicles.iter_mut().find(|v| v.id == vehicle.id) {
            Some(slot) => *slot = vehicle,
            None => self.vehicles.push(vehicle),
        }
        self.revision += 1;
        self.refresh_selection();
    }

    pub fn select(&mut self, vehicle: &Vehicle) {
        self.selected = Some(vehicle.clone());
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Selected vehicle's position, or the default center
    pub fn center(&self) -> LatLng {
        self.selected
            .as_ref()
            .map(|v| LatLng::new(v.latitude, v.longitude))
            .unwrap_or(DEFAULT_CENTER)
    }

    pub fn zoom(&self) -> u8 {
        if self.selected.is_some() {
            SELECTED_ZOOM
        } else {
            OVERVIEW_ZOOM
        }
    }

    fn settle(&mut self, seq: u64) -> bool {
        if seq < self.settled_seq {
            return false;
        }
        self.settled_seq = seq;
        self.requested_seq = self.requested_seq.max(seq);
        true
    }

    fn refresh_selection(&mut self) {
        let Some(current) = self.selected.as_ref() else {
            return;
        };
        self.selected = self.vehicles.iter().find(|v| v.id == current.id).cloned();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_store::sample_fleet;

    fn remote(vehicles: Vec<Vehicle>) -> FleetSnapshot {
        FleetSnapshot {
            vehicles,
            origin: FleetOrigin::Remote,
        }
    }

    #[test]
    fn test_initial_state() {
        let state = TrackingState::new();
        assert!(state.vehicles().is_empty());
        assert!(!state.is_loading());
        assert_eq!(state.center(), DEFAULT_CENTER);
        assert_eq!(state.zoom(), OVERVIEW_ZOOM);
        assert_eq!(state.tab, Tab::Map);
    }

    #[test]
    fn test_loading_until_result() {
        let mut state = TrackingState::new();
        state.begin_fetch(1);
        assert!(state.is_loading());
        assert!(state.apply_snapshot(1, remote(sample_fleet())));
        assert!(!state.is_loading());
        assert_eq!(state.vehicles().len(), 5);
        assert!(state.last_refreshed().is_some());
    }

    #[test]
    fn test_selection_derives_center_and_zoom() {
        let fleet = sample_fleet();
        let mut state = TrackingState::new();
        state.apply_snapshot(1, remote(fleet.clone()));

        state.select(&fleet[1]);
        assert_eq!(state.zoom(), SELECTED_ZOOM);
        assert_eq!(state.center(), LatLng::new(fleet[1].latitude, fleet[1].longitude));

        state.clear_selection();
        assert_eq!(state.zoom(), OVERVIEW_ZOOM);
        assert_eq!(state.center(), DEFAULT_CENTER);
    }

    #[test]
    fn test_stale_snapshot_is_dropped() {
        let fleet = sample_fleet();
        let mut state = TrackingState::new();
        state.begin_fetch(1);
        state.begin_fetch(2);

        assert!(state.apply_snapshot(2, remote(fleet[..2].to_vec())));
        let revision = state.revision();
        assert!(!state.apply_snapshot(1, remote(fleet.clone())));

        assert_eq!(state.vehicles().len(), 2);
        assert_eq!(state.revision(), revision);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_older_result_keeps_loading_flag() {
        let mut state = TrackingState::new();
        state.begin_fetch(1);
        state.begin_fetch(2);
        state.apply_snapshot(1, remote(sample_fleet()));
        assert!(state.is_loading());
    }

    #[test]
    fn test_selection_follows_fresh_data() {
        let mut fleet = sample_fleet();
        let mut state = TrackingState::new();
        state.apply_snapshot(1, remote(fleet.clone()));
        state.select(&fleet[0]);

        fleet[0].latitude = -20.0;
        state.apply_snapshot(2, remote(fleet.clone()));
        assert_eq!(state.selected().unwrap().latitude, -20.0);
        assert_eq!(state.center().lat, -20.0);

        state.apply_snapshot(3, remote(fleet[1..].to_vec()));
        assert!(state.selected().is_none());
        assert_eq!(state.zoom(), OVERVIEW_ZOOM);
    }

    #[test]
    fn test_fallback_snapshot_sets_notice() {
        let mut state = TrackingState::new();
        state.apply_snapshot(
            1,
            FleetSnapshot {
                vehicles: sample_fleet(),
                origin: FleetOrigin::Fallback {
                    reason: "connection refused".to_string(),
                },
            },
        );
        assert_eq!(state.notice(), Some(FALLBACK_NOTICE));
        assert!(state.error().is_none());

        state.apply_snapshot(2, remote(sample_fleet()));
        assert!(state.notice().is_none());
    }

    #[test]
    fn test_failure_sets_error_and_success_clears_it() {
        let mut state = TrackingState::new();
        state.begin_fetch(1);
        assert!(state.apply_failure(1, "task panicked"));
        assert_eq!(state.error(), Some(LOAD_ERROR_MESSAGE));
        assert!(!state.is_loading());

        state.apply_snapshot(2, remote(sample_fleet()));
        assert!(state.error().is_none());
    }

    #[test]
    fn test_service_error_banner() {
        let mut state = TrackingState::new();
        state.set_error("Veículo com ID 42 não encontrado");
        assert_eq!(state.error(), Some("Veículo com ID 42 não encontrado"));
        state.dismiss_error();
        assert!(state.error().is_none());
    }

    #[test]
    fn test_apply_vehicle_updates_selection() {
        let fleet = sample_fleet();
        let mut state = TrackingState::new();
        state.apply_snapshot(1, remote(fleet.clone()));
        state.select(&fleet[2]);

        let mut moved = fleet[2].clone();
        moved.speed = 30.0;
        let revision = state.revision();
        state.apply_vehicle(moved);

        assert_eq!(state.revision(), revision + 1);
        assert_eq!(state.vehicles().len(), 5);
        assert_eq!(state.selected().unwrap().speed, 30.0);
    }

    #[test]
    fn test_tab_labels() {
        assert_eq!(Tab::Map.label(), "Mapa");
        assert_eq!(Tab::Table.label(), "Tabela");
    }
}
