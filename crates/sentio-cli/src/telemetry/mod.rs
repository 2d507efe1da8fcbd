//! Telemetry and tracing configuration.

mod tracing;

use anyhow::Context;

use crate::config::LogFormat;

/// Initializes the tracing subscriber in the requested format.
///
/// # Errors
///
/// Returns an error if the tracing subscriber fails to initialize.
pub(crate) fn init_tracing(format: LogFormat) -> anyhow::Result<()> {
    tracing::init_tracing(format).context("Failed to initialize tracing")
}
