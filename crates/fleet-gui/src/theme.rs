//! egui colors for the shared view styles

use eframe::egui::Color32;
use fleet_app::view::{BadgeTone, Rgb};

pub const MAP_BACKGROUND: Color32 = Color32::from_rgb(15, 18, 20);
pub const TILE_PLACEHOLDER: Color32 = Color32::from_rgb(32, 36, 40);
pub const ERROR_FILL: Color32 = Color32::from_rgb(90, 30, 35);
pub const NOTICE_FILL: Color32 = Color32::from_rgb(85, 65, 20);
pub const CARD_FILL: Color32 = Color32::from_rgb(40, 42, 48);

pub fn color(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

/// (background, text) of a list badge
pub fn badge(tone: BadgeTone) -> (Color32, Color32) {
    (color(tone.background()), color(tone.foreground()))
}
