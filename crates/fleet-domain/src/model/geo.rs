//! Geographic primitives and Web Mercator math
//!
//! World coordinates are pixels on the 256px-tile pyramid at a given zoom,
//! origin at the top-left (lat 85.05°, lng -180°).

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Pixel size of one map tile
pub const TILE_SIZE: f64 = 256.0;

/// Highest zoom offered by the base tile layer
pub const MAX_ZOOM: u8 = 19;

/// Lowest zoom the map can be zoomed out to
pub const MIN_ZOOM: u8 = 2;

/// Latitude limit of the Web Mercator projection
const MAX_LATITUDE: f64 = 85.051_128_78;

/// Brasília, used when no vehicle is selected
pub const DEFAULT_CENTER: LatLng = LatLng::new(-15.7801, -47.9292);

/// A position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl Default for LatLng {
    fn default() -> Self {
        DEFAULT_CENTER
    }
}

/// Pixel position on the world plane at some zoom
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

/// Slippy-map tile address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

/// World size in pixels at a zoom level
pub fn world_size(zoom: u8) -> f64 {
    TILE_SIZE * f64::from(1u32 << zoom.min(30))
}

/// Project a position onto the world plane
pub fn project(pos: LatLng, zoom: u8) -> WorldPoint {
    let size = world_size(zoom);
    let lat = pos.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (pos.lng + 180.0) / 360.0 * size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
    WorldPoint { x, y }
}

/// Inverse of [`project`]
pub fn unproject(point: WorldPoint, zoom: u8) -> LatLng {
    let size = world_size(zoom);
    let lng = point.x / size * 360.0 - 180.0;
    let n = PI - 2.0 * PI * point.y / size;
    let lat = n.sinh().atan().to_degrees();
    LatLng::new(lat, lng)
}

/// Tiles covering a viewport, each paired with the world position of its
/// top-left corner. Columns past the antimeridian repeat wrapped tiles, so
/// the same tile can appear at several positions.
pub fn tile_placements(center: LatLng, zoom: u8, width: f64, height: f64) -> Vec<(TileId, WorldPoint)> {
    let c = project(center, zoom);
    let tiles_per_side = 1i64 << zoom.min(30);

    let min_x = ((c.x - width / 2.0) / TILE_SIZE).floor() as i64;
    let max_x = ((c.x + width / 2.0) / TILE_SIZE).floor() as i64;
    let min_y = ((c.y - height / 2.0) / TILE_SIZE).floor().max(0.0) as i64;
    let max_y = (((c.y + height / 2.0) / TILE_SIZE).floor() as i64).min(tiles_per_side - 1);

    let mut placements = Vec::new();
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let tile = TileId {
                x: x.rem_euclid(tiles_per_side) as u32,
                y: y as u32,
                z: zoom,
            };
            let origin = WorldPoint {
                x: x as f64 * TILE_SIZE,
                y: y as f64 * TILE_SIZE,
            };
            placements.push((tile, origin));
        }
    }
    placements
}
