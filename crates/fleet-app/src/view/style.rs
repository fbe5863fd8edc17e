//! Status colors shared by the map, list and table views

use fleet_types::VehicleStatus;

/// Toolkit-neutral color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);
    pub const DARK: Rgb = Rgb(0x12, 0x12, 0x14);

    /// `#RRGGBB`
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

const GREEN: Rgb = Rgb(0x00, 0x87, 0x5F);
const RED: Rgb = Rgb(0xF7, 0x5A, 0x68);
const ORANGE: Rgb = Rgb(0xFB, 0xA9, 0x4C);
const CYAN: Rgb = Rgb(0x81, 0xD8, 0xF7);

/// Map marker / popup chip color
pub fn marker_color(status: VehicleStatus) -> Rgb {
    match status {
        VehicleStatus::Active | VehicleStatus::InMotion => GREEN,
        VehicleStatus::Inactive => RED,
        VehicleStatus::Maintenance => ORANGE,
        VehicleStatus::Stopped => CYAN,
    }
}

/// Text color to put on top of [`marker_color`]
pub fn marker_text_color(status: VehicleStatus) -> Rgb {
    match status {
        VehicleStatus::Maintenance | VehicleStatus::Stopped => Rgb::DARK,
        _ => Rgb::WHITE,
    }
}

/// Chip colors in the fallback table: (background, text).
/// Only in-motion gets green here; active shares the stopped color.
pub fn table_chip(status: VehicleStatus) -> (Rgb, Rgb) {
    match status {
        VehicleStatus::InMotion => (GREEN, Rgb::WHITE),
        VehicleStatus::Maintenance => (ORANGE, Rgb::DARK),
        VehicleStatus::Inactive => (RED, Rgb::WHITE),
        VehicleStatus::Active | VehicleStatus::Stopped => (CYAN, Rgb::DARK),
    }
}

/// Badge tone in the vehicle list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Green,
    Blue,
    Yellow,
    Red,
}

impl BadgeTone {
    pub fn for_status(status: VehicleStatus) -> Self {
        match status {
            VehicleStatus::Active | VehicleStatus::InMotion => BadgeTone::Green,
            VehicleStatus::Stopped => BadgeTone::Blue,
            VehicleStatus::Maintenance => BadgeTone::Yellow,
            VehicleStatus::Inactive => BadgeTone::Red,
        }
    }

    pub fn background(&self) -> Rgb {
        match self {
            BadgeTone::Green => Rgb(0xDC, 0xFC, 0xE7),
            BadgeTone::Blue => Rgb(0xDB, 0xEA, 0xFE),
            BadgeTone::Yellow => Rgb(0xFE, 0xF9, 0xC3),
            BadgeTone::Red => Rgb(0xFE, 0xE2, 0xE2),
        }
    }

    pub fn foreground(&self) -> Rgb {
        match self {
            BadgeTone::Green => Rgb(0x16, 0x65, 0x34),
            BadgeTone::Blue => Rgb(0x1E, 0x40, 0xAF),
            BadgeTone::Yellow => Rgb(0x85, 0x4D, 0x0E),
            BadgeTone::Red => Rgb(0x99, 0x1B, 0x1B),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_colors() {
        assert_eq!(marker_color(VehicleStatus::Active).hex(), "#00875F");
        assert_eq!(marker_color(VehicleStatus::InMotion).hex(), "#00875F");
        assert_eq!(marker_color(VehicleStatus::Inactive).hex(), "#F75A68");
        assert_eq!(marker_color(VehicleStatus::Maintenance).hex(), "#FBA94C");
        assert_eq!(marker_color(VehicleStatus::Stopped).hex(), "#81D8F7");
    }

    #[test]
    fn test_dark_text_on_light_chips() {
        assert_eq!(marker_text_color(VehicleStatus::Maintenance), Rgb::DARK);
        assert_eq!(marker_text_color(VehicleStatus::Stopped), Rgb::DARK);
        assert_eq!(marker_text_color(VehicleStatus::Inactive), Rgb::WHITE);
    }

    #[test]
    fn test_badge_tones() {
        assert_eq!(BadgeTone::for_status(VehicleStatus::InMotion), BadgeTone::Green);
        assert_eq!(BadgeTone::for_status(VehicleStatus::Stopped), BadgeTone::Blue);
        assert_eq!(BadgeTone::for_status(VehicleStatus::Maintenance), BadgeTone::Yellow);
        assert_eq!(BadgeTone::for_status(VehicleStatus::Inactive), BadgeTone::Red);
    }
}
