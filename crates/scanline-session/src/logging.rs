//! Tracing subscriber setup for hosts embedding the session crate.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,scanline=debug";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=scanline_session=trace` - Include skipped engine calls
/// - Default: [`DEFAULT_FILTER`]
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // Fails only when a global subscriber is already set
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
