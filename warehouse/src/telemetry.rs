//! Tracing subscriber installation for the binaries.

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// Install a global `fmt` subscriber filtered by `RUST_LOG`.
///
/// Events go to stderr so stdout carries only results. A second call, or a
/// call after another subscriber was installed, logs a warning and leaves the
/// existing subscriber in place.
pub fn init_tracing(json: bool) {
    let builder = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}
