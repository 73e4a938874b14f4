//! Structured logging setup for the probe binary.
//!
//! Stdout-only: the probe is a one-shot diagnostic, so progress lines go to
//! the terminal alongside the final report. Verbosity is tuned through
//! `BURROW_LOG` or `RUST_LOG`; neither affects control flow.

use crate::error::{BurrowError, BurrowResult};
use tracing_subscriber::EnvFilter;

/// Initialize stdout logging.
///
/// Filter priority: `BURROW_LOG`, then `RUST_LOG`, then the built-in
/// default for the current build type.
pub fn init() -> BurrowResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter())
        .with_ansi(true)
        .with_target(false)
        .with_thread_ids(false)
        .try_init()
        .map_err(|e| BurrowError::unexpected(format!("Failed to initialize logging: {e}")))
}

/// Build the environment filter from the environment or defaults.
fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_env("BURROW_LOG")
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter()))
}

/// Get the default log filter based on build type.
pub fn default_log_filter() -> &'static str {
    #[cfg(debug_assertions)]
    {
        "debug,burrow=trace,burrow_core=trace,tokio_postgres=warn"
    }
    #[cfg(not(debug_assertions))]
    {
        "info,tokio_postgres=warn"
    }
}
