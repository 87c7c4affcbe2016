//! Tracing initialization for applications embedding temppath
//!
//! The library only emits events; installing a subscriber is left to the
//! application. These helpers cover the common setup.

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

/// Initialize the tracing subscriber with environment-based configuration
///
/// Uses standard RUST_LOG environment variable for filtering:
/// - `RUST_LOG=debug` - Set global level
/// - `RUST_LOG=temppath=trace` - Show every skipped cleanup as well
///
/// Uses RUST_LOG_FORMAT for output format (optional):
/// - `json` - JSON formatted output
/// - `pretty` - Pretty formatted output
/// - `compact` - Compact single-line output (default)
pub fn init() -> Result<(), TryInitError> {
    init_with_defaults("info")
}

/// Initialize with a default filter if RUST_LOG is not set
///
/// # Arguments
/// * `default_filter` - The filter string to use if RUST_LOG is not set (e.g., "info", "debug")
///
/// # Returns
/// Ok(()) on success, or an error if a global subscriber is already installed
pub fn init_with_defaults(default_filter: &str) -> Result<(), TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    match format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_ansi(false).json())
            .try_init(),
        "pretty" => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty())
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().compact())
            .try_init(),
    }
}

/// Initialize for testing, capturing output through the test harness
pub fn init_for_testing() -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::new("temppath=trace,temppath_platform=trace"))
        .with(fmt::layer().with_test_writer())
        .try_init()
}
