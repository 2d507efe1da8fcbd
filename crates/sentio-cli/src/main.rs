#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod runtime;
mod telemetry;

use std::process;

use anyhow::Context;

use crate::config::{Cli, create_services};

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "sentio_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "sentio_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "sentio_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            "Application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %error,
            "Application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    telemetry::init_tracing(cli.runtime.log_format)?;
    cli.log();
    cli.validate()?;

    let services = create_services(&cli)
        .await
        .context("failed to create services")?;

    runtime::run_workers(services, &cli.runtime).await
}
