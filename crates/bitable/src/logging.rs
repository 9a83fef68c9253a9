//! Log output for applications using the client.
//!
//! The library itself only emits `tracing` events. Applications that do not
//! install their own subscriber can call [`init`].

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install a global subscriber printing events at `level` and above.
///
/// `RUST_LOG`, when set, overrides `level`. With `json` set, each event is
/// written as one JSON object per line.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init(level: Level, json: bool) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .try_init()
    }
}
