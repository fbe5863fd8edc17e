//! Domain services

pub mod list_payload;
pub mod reconcile;

pub use list_payload::ListPayload;
pub use reconcile::{diff_keys, ReconcilePlan};
