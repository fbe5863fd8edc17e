//! Slippy-map canvas drawn with the egui painter
//!
//! Implements [`MarkerSurface`] so the marker layer can drive it. The canvas
//! owns the view (center and zoom), the base tiles, the markers and at most
//! one open popup.

use std::collections::BTreeMap;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Stroke, Vec2};
use fleet_app::view::{MarkerIcon, MarkerLabel, MarkerSurface, PopupContent};
use fleet_domain::model::geo::{project, tile_placements, unproject, world_size, MIN_ZOOM, TILE_SIZE};
use fleet_domain::model::{LatLng, WorldPoint, MAX_ZOOM};
use fleet_infra::tiles::ATTRIBUTION;

use crate::theme;
use crate::tiles::TileLayer;

const MARKER_RADIUS: f32 = 7.0;
const HIT_RADIUS: f32 = 11.0;
/// Scroll distance for one zoom step
const SCROLL_STEP: f32 = 60.0;

/// Marker handle on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerId(u64);

struct CanvasMarker {
    position: LatLng,
    icon: MarkerIcon,
    label: MarkerLabel,
}

pub struct CanvasSurface {
    next_id: u64,
    markers: BTreeMap<MarkerId, CanvasMarker>,
    center: LatLng,
    zoom: u8,
    popup: Option<(MarkerId, PopupContent)>,
    tiles: TileLayer,
    scroll: f32,
}

impl MarkerSurface for CanvasSurface {
    type Handle = MarkerId;

    fn add_marker(&mut self, position: LatLng, icon: MarkerIcon, label: MarkerLabel) -> MarkerId {
        self.next_id += 1;
        let id = MarkerId(self.next_id);
        self.markers.insert(id, CanvasMarker { position, icon, label });
        id
    }

    fn move_marker(&mut self, handle: &MarkerId, position: LatLng) {
        if let Some(marker) = self.markers.get_mut(handle) {
            marker.position = position;
        }
    }

    fn set_icon(&mut self, handle: &MarkerId, icon: MarkerIcon) {
        if let Some(marker) = self.markers.get_mut(handle) {
            marker.icon = icon;
        }
    }

    fn remove_marker(&mut self, handle: &MarkerId) {
        self.markers.remove(handle);
        if self.popup.as_ref().is_some_and(|(id, _)| id == handle) {
            self.popup = None;
        }
    }

    fn open_popup(&mut self, handle: &MarkerId, content: PopupContent) {
        self.popup = Some((*handle, content));
    }

    fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.center = center;
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

impl CanvasSurface {
    pub fn new(tiles: TileLayer) -> Self {
        Self {
            next_id: 0,
            markers: BTreeMap::new(),
            center: LatLng::default(),
            zoom: MIN_ZOOM,
            popup: None,
            tiles,
            scroll: 0.0,
        }
    }

    /// Draw the map into the remaining space. Returns the clicked marker, if any.
    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<MarkerId> {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let rect = response.rect;
        painter.rect_filled(rect, 0.0, theme::MAP_BACKGROUND);

        if response.dragged() {
            self.pan(response.drag_delta());
        }
        if response.hovered() {
            let delta = ui.input(|i| i.raw_scroll_delta.y);
            if let Some(cursor) = response.hover_pos() {
                self.scroll_zoom(delta, cursor - rect.center());
            }
        }

        self.draw_tiles(ui.ctx(), &painter, rect);

        let hovered = response.hover_pos().and_then(|pos| self.marker_at(rect, pos));
        for (id, marker) in &self.markers {
            let pos = self.to_screen(rect, marker.position);
            if !rect.expand(HIT_RADIUS).contains(pos) {
                continue;
            }
            let radius = if hovered == Some(*id) { MARKER_RADIUS + 2.0 } else { MARKER_RADIUS };
            painter.circle_filled(pos, radius, theme::color(marker.icon.color));
            painter.circle_stroke(pos, radius, Stroke::new(1.5, Color32::WHITE));
        }

        painter.text(
            rect.right_bottom() - Vec2::new(6.0, 4.0),
            Align2::RIGHT_BOTTOM,
            ATTRIBUTION,
            FontId::proportional(10.0),
            Color32::from_gray(170),
        );

        if let Some(id) = hovered {
            self.show_tooltip(ui.ctx(), rect, id);
        }
        self.show_popup(ui.ctx(), rect);

        if response.clicked() {
            let clicked = response
                .interact_pointer_pos()
                .and_then(|pos| self.marker_at(rect, pos));
            if clicked.is_none() {
                self.popup = None;
            }
            return clicked;
        }
        None
    }

    fn pan(&mut self, delta: Vec2) {
        let c = project(self.center, self.zoom);
        self.center = unproject(
            WorldPoint {
                x: c.x - f64::from(delta.x),
                y: c.y - f64::from(delta.y),
            },
            self.zoom,
        );
    }

    /// Zoom one level per scroll step, keeping the point under the cursor fixed
    fn scroll_zoom(&mut self, delta: f32, cursor_offset: Vec2) {
        self.scroll += delta;
        let step: i16 = if self.scroll >= SCROLL_STEP {
            1
        } else if self.scroll <= -SCROLL_STEP {
            -1
        } else {
            return;
        };
        self.scroll = 0.0;

        let new_zoom = (i16::from(self.zoom) + step).clamp(i16::from(MIN_ZOOM), i16::from(MAX_ZOOM)) as u8;
        if new_zoom == self.zoom {
            return;
        }

        let dx = f64::from(cursor_offset.x);
        let dy = f64::from(cursor_offset.y);
        let c = project(self.center, self.zoom);
        let anchor = unproject(WorldPoint { x: c.x + dx, y: c.y + dy }, self.zoom);

        let a = project(anchor, new_zoom);
        self.center = unproject(WorldPoint { x: a.x - dx, y: a.y - dy }, new_zoom);
        self.zoom = new_zoom;
    }

    fn draw_tiles(&mut self, ctx: &egui::Context, painter: &egui::Painter, rect: Rect) {
        self.tiles.poll(ctx);
        let c = project(self.center, self.zoom);
        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));

        for (tile, origin) in tile_placements(
            self.center,
            self.zoom,
            f64::from(rect.width()),
            f64::from(rect.height()),
        ) {
            let min = rect.center()
                + Vec2::new((origin.x - c.x) as f32, (origin.y - c.y) as f32);
            let tile_rect = Rect::from_min_size(min, Vec2::splat(TILE_SIZE as f32));
            match self.tiles.texture(ctx, tile) {
                Some(texture) => {
                    painter.image(texture.id(), tile_rect, uv, Color32::WHITE);
                }
                None => {
                    painter.rect_filled(tile_rect.shrink(0.5), 0.0, theme::TILE_PLACEHOLDER);
                }
            }
        }
    }

    /// Screen position of a coordinate, using the nearest world copy horizontally
    fn to_screen(&self, rect: Rect, position: LatLng) -> Pos2 {
        let size = world_size(self.zoom);
        let c = project(self.center, self.zoom);
        let p = project(position, self.zoom);
        let mut dx = p.x - c.x;
        if dx > size / 2.0 {
            dx -= size;
        } else if dx < -size / 2.0 {
            dx += size;
        }
        rect.center() + Vec2::new(dx as f32, (p.y - c.y) as f32)
    }

    fn marker_at(&self, rect: Rect, pointer: Pos2) -> Option<MarkerId> {
        self.markers
            .iter()
            .map(|(id, m)| (*id, self.to_screen(rect, m.position).distance(pointer)))
            .filter(|(_, distance)| *distance <= HIT_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    fn show_tooltip(&self, ctx: &egui::Context, rect: Rect, id: MarkerId) {
        let Some(marker) = self.markers.get(&id) else {
            return;
        };
        let pos = self.to_screen(rect, marker.position) + Vec2::new(12.0, -28.0);
        egui::Area::new("marker_tooltip".into())
            .fixed_pos(pos)
            .order(egui::Order::Tooltip)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(format!("{} - {}", marker.label.plate, marker.label.model));
                });
            });
    }

    fn show_popup(&mut self, ctx: &egui::Context, rect: Rect) {
        let Some((id, content)) = self.popup.as_ref() else {
            return;
        };
        let Some(marker) = self.markers.get(id) else {
            return;
        };
        let anchor = self.to_screen(rect, marker.position);
        if !rect.contains(anchor) {
            return;
        }

        let mut close = false;
        egui::Area::new("marker_popup".into())
            .fixed_pos(anchor + Vec2::new(10.0, 10.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_max_width(220.0);
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(&content.plate).strong().size(15.0));
                        if ui.small_button("✕").clicked() {
                            close = true;
                        }
                    });
                    ui.label(&content.model);
                    ui.add_space(4.0);
                    egui::Frame::new()
                        .fill(theme::color(content.status_color))
                        .corner_radius(4.0)
                        .inner_margin(egui::Margin::symmetric(6, 2))
                        .show(ui, |ui| {
                            ui.label(
                                RichText::new(content.status.label())
                                    .color(theme::color(content.status_text_color))
                                    .small(),
                            );
                        });
                    ui.add_space(4.0);
                    ui.label(format!("Velocidade: {}", content.speed_label));
                    if let Some(driver) = &content.driver {
                        ui.label(format!("Motorista: {}", driver));
                    }
                });
            });

        if close {
            self.popup = None;
        }
    }
}
