//! Toolkit-independent view models
//!
//! The GUI crate only paints what these types compute.

pub mod format;
pub mod list;
pub mod markers;
pub mod style;
pub mod table;

pub use list::{ListRow, VehicleListView};
pub use markers::{MarkerIcon, MarkerLabel, MarkerLayer, MarkerSurface, PopupContent};
pub use style::{BadgeTone, Rgb};
pub use table::{fallback_rows, fleet_rows, TableRow};
