//! Subscriber setup for hosts and tools.
//!
//! The library itself only emits `tracing` events; installing a subscriber is
//! the host's call. These helpers install a formatted stderr subscriber
//! filtered by `RUST_LOG`.

use tracing_subscriber::EnvFilter;

/// Install the default subscriber at `info` unless `RUST_LOG` says otherwise.
///
/// Returns `false` if a global subscriber was already set.
pub fn init() -> bool {
    init_with_filter("info")
}

/// Install the default subscriber with `default_filter` as the fallback
/// directive when `RUST_LOG` is unset or invalid.
pub fn init_with_filter(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
