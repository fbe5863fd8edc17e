//! Tracing subscriber setup

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info,fleet_app=debug,fleet_infra=debug,fleet_gui=debug";

/// Install the global subscriber. Safe to call more than once.
pub fn init() {
    init_with_default(DEFAULT_FILTER);
}

/// Install the global subscriber with a custom fallback filter
pub fn init_with_default(default_filter: &str) {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
