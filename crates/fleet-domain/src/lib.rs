//! Domain layer - geo primitives, reconciliation, and persistence/gateway traits

pub mod model;
pub mod repository;
pub mod service;
