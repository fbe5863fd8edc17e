//! Application layer - configuration, vehicle service, polling, view models

pub mod config;
pub mod logging;
pub mod poller;
pub mod service;
pub mod tracking;
pub mod view;
