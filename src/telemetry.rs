//! Tracing setup for the `broken-axis` binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! host application's choice.

use tracing_subscriber::EnvFilter;

/// Install a compact fmt subscriber.
///
/// `level` wins over `RUST_LOG`; without either the filter is `info`.
/// Returns `false` if a global subscriber was already set.
pub fn init_tracing(level: Option<&str>) -> bool {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}
