//! Vehicle storage used as the offline fallback data set

mod memory;
mod sample;

pub use memory::InMemoryVehicleRepository;
pub use sample::sample_fleet;
