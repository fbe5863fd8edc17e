//! Map marker layer
//!
//! Keeps exactly one marker per vehicle id on a [`MarkerSurface`]. Each new
//! fleet snapshot is diffed against the known ids: known markers are moved
//! and recolored in place, new ids get a marker, vanished ids lose theirs.

use std::collections::HashMap;
use std::fmt::Debug;

use fleet_domain::model::LatLng;
use fleet_domain::service::{diff_keys, ReconcilePlan};
use fleet_types::{Vehicle, VehicleStatus};

use super::format::format_speed;
use super::style::{marker_color, marker_text_color, Rgb};

/// Status-colored dot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerIcon {
    pub status: VehicleStatus,
    pub color: Rgb,
}

impl MarkerIcon {
    pub fn for_status(status: VehicleStatus) -> Self {
        Self {
            status,
            color: marker_color(status),
        }
    }
}

/// Hover tooltip text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerLabel {
    pub plate: String,
    pub model: String,
}

/// Detail popup shown when a marker is clicked
#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    pub plate: String,
    pub model: String,
    pub status: VehicleStatus,
    pub status_color: Rgb,
    pub status_text_color: Rgb,
    pub speed_label: String,
    /// Omitted from the popup when absent
    pub driver: Option<String>,
}

impl PopupContent {
    pub fn for_vehicle(vehicle: &Vehicle) -> Self {
        Self {
            plate: vehicle.plate.clone(),
            model: vehicle.model.clone(),
            status: vehicle.status,
            status_color: marker_color(vehicle.status),
            status_text_color: marker_text_color(vehicle.status),
            speed_label: format_speed(vehicle.speed),
            driver: vehicle.driver.clone().filter(|d| !d.is_empty()),
        }
    }
}

/// Drawing backend for markers
pub trait MarkerSurface {
    /// Opaque marker identity, stable for the marker's lifetime
    type Handle: Clone + PartialEq + Debug;

    fn add_marker(&mut self, position: LatLng, icon: MarkerIcon, label: MarkerLabel) -> Self::Handle;

    fn move_marker(&mut self, handle: &Self::Handle, position: LatLng);

    fn set_icon(&mut self, handle: &Self::Handle, icon: MarkerIcon);

    fn remove_marker(&mut self, handle: &Self::Handle);

    fn open_popup(&mut self, handle: &Self::Handle, content: PopupContent);

    /// Re-center without rebuilding
    fn set_view(&mut self, center: LatLng, zoom: u8);
}

#[derive(Debug)]
struct PlacedMarker<H> {
    handle: H,
    vehicle: Vehicle,
}

/// Vehicle-id to marker mapping over a surface
pub struct MarkerLayer<S: MarkerSurface> {
    surface: S,
    markers: HashMap<String, PlacedMarker<S::Handle>>,
}

impl<S: MarkerSurface> MarkerLayer<S> {
    pub fn new(mut surface: S, center: LatLng, zoom: u8) -> Self {
        surface.set_view(center, zoom);
        Self {
            surface,
            markers: HashMap::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.surface.set_view(center, zoom);
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Ids that currently have a marker
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.markers.keys().map(String::as_str)
    }

    pub fn handle_of(&self, id: &str) -> Option<&S::Handle> {
        self.markers.get(id).map(|m| &m.handle)
    }

    /// Latest record known for a marker
    pub fn vehicle_of(&self, id: &str) -> Option<&Vehicle> {
        self.markers.get(id).map(|m| &m.vehicle)
    }

    /// Align markers with `vehicles`. When an id repeats, the last record wins.
    pub fn sync(&mut self, vehicles: &[Vehicle]) -> ReconcilePlan<String> {
        let mut latest: HashMap<&str, &Vehicle> = HashMap::with_capacity(vehicles.len());
        let mut order: Vec<String> = Vec::with_capacity(vehicles.len());
        for vehicle in vehicles {
            if latest.insert(vehicle.id.as_str(), vehicle).is_none() {
                order.push(vehicle.id.clone());
            }
        }

        let plan = diff_keys(self.markers.keys().cloned().collect::<Vec<_>>(), order);

        for id in &plan.to_update {
            let vehicle = latest[id.as_str()];
            if let Some(placed) = self.markers.get_mut(id) {
                self.surface.move_marker(&placed.handle, position_of(vehicle));
                self.surface.set_icon(&placed.handle, MarkerIcon::for_status(vehicle.status));
                placed.vehicle = vehicle.clone();
            }
        }

        for id in &plan.to_create {
            let vehicle = latest[id.as_str()];
            let handle = self.surface.add_marker(
                position_of(vehicle),
                MarkerIcon::for_status(vehicle.status),
                MarkerLabel {
                    plate: vehicle.plate.clone(),
                    model: vehicle.model.clone(),
                },
            );
            self.markers.insert(
                id.clone(),
                PlacedMarker {
                    handle,
                    vehicle: vehicle.clone(),
                },
            );
        }

        for id in &plan.to_remove {
            if let Some(placed) = self.markers.remove(id) {
                self.surface.remove_marker(&placed.handle);
            }
        }

        tracing::debug!(
            created = plan.to_create.len(),
            updated = plan.to_update.len(),
            removed = plan.to_remove.len(),
            "reconciled map markers"
        );
        plan
    }

    /// Handle a click on a marker: call `on_click` with its vehicle and open the popup
    pub fn click<F>(&mut self, handle: &S::Handle, on_click: F) -> Option<Vehicle>
    where
        F: FnOnce(&Vehicle),
    {
        let id = self
            .markers
            .iter()
            .find(|(_, placed)| &placed.handle == handle)
            .map(|(id, _)| id.clone())?;
        self.click_id(&id, on_click)
    }

    /// Same as [`MarkerLayer::click`], addressed by vehicle id
    pub fn click_id<F>(&mut self, id: &str, on_click: F) -> Option<Vehicle>
    where
        F: FnOnce(&Vehicle),
    {
        let placed = self.markers.get(id)?;
        let vehicle = placed.vehicle.clone();
        on_click(&vehicle);
        self.surface
            .open_popup(&placed.handle, PopupContent::for_vehicle(&vehicle));
        Some(vehicle)
    }

    /// Remove every marker from the surface
    pub fn clear(&mut self) {
        for (_, placed) in self.markers.drain() {
            self.surface.remove_marker(&placed.handle);
        }
    }
}

impl<S: MarkerSurface> Drop for MarkerLayer<S> {
    fn drop(&mut self) {
        self.clear();
    }
}

fn position_of(vehicle: &Vehicle) -> LatLng {
    LatLng::new(vehicle.latitude, vehicle.longitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_store::sample_fleet;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Add(u32),
        Move(u32),
        Icon(u32),
        Remove(u32),
        Popup(u32, String),
        View(u8),
    }

    #[derive(Debug)]
    struct FakeMarker {
        position: LatLng,
        icon: MarkerIcon,
        label: MarkerLabel,
    }

    /// Records every call and keeps live markers
    #[derive(Default)]
    struct RecordingSurface {
        next: u32,
        live: HashMap<u32, FakeMarker>,
        calls: Rc<RefCell<Vec<Call>>>,
    }

    impl MarkerSurface for RecordingSurface {
        type Handle = u32;

        fn add_marker(&mut self, position: LatLng, icon: MarkerIcon, label: MarkerLabel) -> u32 {
            self.next += 1;
            self.live.insert(self.next, FakeMarker { position, icon, label });
            self.calls.borrow_mut().push(Call::Add(self.next));
            self.next
        }

        fn move_marker(&mut self, handle: &u32, position: LatLng) {
            self.live.get_mut(handle).expect("move on dead marker").position = position;
            self.calls.borrow_mut().push(Call::Move(*handle));
        }

        fn set_icon(&mut self, handle: &u32, icon: MarkerIcon) {
            self.live.get_mut(handle).expect("icon on dead marker").icon = icon;
            self.calls.borrow_mut().push(Call::Icon(*handle));
        }

        fn remove_marker(&mut self, handle: &u32) {
            assert!(self.live.remove(handle).is_some(), "double remove");
            self.calls.borrow_mut().push(Call::Remove(*handle));
        }

        fn open_popup(&mut self, handle: &u32, content: PopupContent) {
            self.calls.borrow_mut().push(Call::Popup(*handle, content.plate));
        }

        fn set_view(&mut self, _center: LatLng, zoom: u8) {
            self.calls.borrow_mut().push(Call::View(zoom));
        }
    }

    fn layer() -> MarkerLayer<RecordingSurface> {
        MarkerLayer::new(RecordingSurface::default(), LatLng::default(), 5)
    }

    fn ids_of(vehicles: &[Vehicle]) -> HashSet<String> {
        vehicles.iter().map(|v| v.id.clone()).collect()
    }

    fn layer_ids<S: MarkerSurface>(layer: &MarkerLayer<S>) -> HashSet<String> {
        layer.ids().map(String::from).collect()
    }

    #[test]
    fn test_initial_sync_creates_all() {
        let fleet = sample_fleet();
        let mut layer = layer();
        let plan = layer.sync(&fleet);

        assert_eq!(plan.to_create.len(), 5);
        assert_eq!(layer_ids(&layer), ids_of(&fleet));
        assert_eq!(layer.surface().live.len(), 5);
        let first = layer.handle_of("1").unwrap();
        assert_eq!(layer.surface().live[first].label.plate, "ABC-1234");
    }

    #[test]
    fn test_key_set_matches_input_after_every_pass() {
        let fleet = sample_fleet();
        let mut layer = layer();
        let snapshots = [
            fleet[..3].to_vec(),
            fleet[2..].to_vec(),
            vec![],
            fleet.clone(),
            vec![fleet[4].clone(), fleet[0].clone()],
        ];
        for snapshot in &snapshots {
            layer.sync(snapshot);
            assert_eq!(layer_ids(&layer), ids_of(snapshot));
            assert_eq!(layer.surface().live.len(), snapshot.len());
        }
    }

    #[test]
    fn test_recurring_id_keeps_handle() {
        let mut fleet = sample_fleet();
        let mut layer = layer();
        layer.sync(&fleet);
        let before = *layer.handle_of("2").unwrap();

        fleet[1].latitude = -10.0;
        fleet[1].status = VehicleStatus::Stopped;
        let plan = layer.sync(&fleet);

        assert!(plan.is_structurally_unchanged());
        let after = *layer.handle_of("2").unwrap();
        assert_eq!(before, after);

        let marker = &layer.surface().live[&after];
        assert_eq!(marker.position.lat, -10.0);
        assert_eq!(marker.icon, MarkerIcon::for_status(VehicleStatus::Stopped));
    }

    #[test]
    fn test_removed_ids_release_markers() {
        let fleet = sample_fleet();
        let mut layer = layer();
        layer.sync(&fleet);
        let gone = *layer.handle_of("3").unwrap();

        let remaining: Vec<_> = fleet.iter().filter(|v| v.id != "3").cloned().collect();
        let plan = layer.sync(&remaining);

        assert_eq!(plan.to_remove, vec!["3".to_string()]);
        assert!(layer.handle_of("3").is_none());
        assert!(!layer.surface().live.contains_key(&gone));
    }

    #[test]
    fn test_duplicate_ids_keep_last_record() {
        let fleet = sample_fleet();
        let mut moved = fleet[0].clone();
        moved.longitude = 10.0;
        let input = vec![fleet[0].clone(), moved];

        let mut layer = layer();
        layer.sync(&input);

        assert_eq!(layer.len(), 1);
        assert_eq!(layer.surface().live.len(), 1);
        assert_eq!(layer.vehicle_of("1").unwrap().longitude, 10.0);
    }

    #[test]
    fn test_click_reports_latest_record_and_opens_popup() {
        let mut fleet = sample_fleet();
        let mut layer = layer();
        layer.sync(&fleet);

        fleet[0].speed = 99.0;
        layer.sync(&fleet);

        let handle = *layer.handle_of("1").unwrap();
        let mut seen = None;
        let clicked = layer.click(&handle, |v| seen = Some(v.clone()));

        assert_eq!(clicked.as_ref(), Some(&fleet[0]));
        assert_eq!(seen.as_ref(), Some(&fleet[0]));
        let calls = layer.surface().calls.borrow().clone();
        assert_eq!(calls.last(), Some(&Call::Popup(handle, "ABC-1234".to_string())));
    }

    #[test]
    fn test_click_unknown_handle() {
        let mut layer = layer();
        layer.sync(&sample_fleet());
        let mut called = false;
        assert!(layer.click(&999, |_| called = true).is_none());
        assert!(!called);
    }

    #[test]
    fn test_drop_releases_all_markers() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let surface = RecordingSurface {
            calls: calls.clone(),
            ..Default::default()
        };
        let mut layer = MarkerLayer::new(surface, LatLng::default(), 5);
        layer.sync(&sample_fleet());
        drop(layer);

        let removes = calls.borrow().iter().filter(|c| matches!(c, Call::Remove(_))).count();
        assert_eq!(removes, 5);
    }

    #[test]
    fn test_set_view_does_not_touch_markers() {
        let mut layer = layer();
        layer.sync(&sample_fleet());
        let before = layer.surface().calls.borrow().len();
        layer.set_view(LatLng::new(-23.5, -46.6), 15);

        let calls = layer.surface().calls.borrow();
        assert_eq!(calls.len(), before + 1);
        assert_eq!(calls.last(), Some(&Call::View(15)));
        assert_eq!(layer.len(), 5);
    }

    #[test]
    fn test_popup_omits_missing_driver() {
        let mut vehicle = sample_fleet().remove(0);
        vehicle.driver = None;
        let popup = PopupContent::for_vehicle(&vehicle);
        assert!(popup.driver.is_none());
        assert_eq!(popup.speed_label, "65 km/h");
        assert_eq!(popup.status_color.hex(), "#00875F");
    }
}
