//! Infrastructure layer
//!
//! Network-backed implementations of the domain gateway, plus the tile
//! downloader used by the map canvas.

pub mod http_gateway;
pub mod tiles;

pub use http_gateway::{GatewayOptions, HttpVehicleGateway};
pub use tiles::{TileFetcher, TileSource};
