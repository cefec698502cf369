//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Environment variable checked before `RUST_LOG`.
pub const FILTER_ENV: &str = "BANKERS_LOG";

const DEFAULT_FILTER: &str = "info";

/// Resolve the filter: explicit directives, then `BANKERS_LOG`, then
/// `RUST_LOG`, then `info`. Unparseable directives fall through.
pub fn resolve_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .or_else(|| EnvFilter::try_from_env(FILTER_ENV).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(directives: Option<&str>) {
    // JSON logs + timestamps.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(resolve_filter(directives))
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
