//! Domain model types

pub mod geo;
pub mod location;

pub use geo::{LatLng, TileId, WorldPoint, DEFAULT_CENTER, MAX_ZOOM};
pub use location::LocationUpdate;
