//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── nats: NatsConfig             # Message channel connection
//! ├── storage: StorageConfig       # Results bucket backend
//! ├── google: GoogleCloudConfig    # Analysis backend
//! ├── pipeline: PipelineConfig     # Buckets, topics, streams, concurrency
//! └── runtime: RuntimeConfig       # Shutdown and log format
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! sentio --google-api-key "..." --results-bucket results --nats-url nats://localhost:4222
//!
//! # Or via environment variables
//! GOOGLE_API_KEY="..." RESULTS_BUCKET=results sentio
//! ```

mod provider;
mod runtime;

use std::process;

use anyhow::Context;
use clap::Parser;
pub use provider::{Services, create_services};
pub use runtime::{LogFormat, RuntimeConfig};
use sentio_inference::google::GoogleCloudConfig;
use sentio_nats::NatsConfig;
use sentio_object::StorageConfig;
use sentio_pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "sentio")]
#[command(about = "Sentio document and image analysis pipeline")]
#[command(version)]
pub struct Cli {
    /// NATS connection configuration.
    #[clap(flatten)]
    pub nats: NatsConfig,

    /// Object storage configuration for the results bucket.
    #[clap(flatten)]
    pub storage: StorageConfig,

    /// Google Cloud analysis backend configuration.
    #[clap(flatten)]
    pub google: GoogleCloudConfig,

    /// Pipeline buckets, topics and concurrency.
    #[clap(flatten)]
    pub pipeline: PipelineConfig,

    /// Process lifecycle configuration.
    #[clap(flatten)]
    pub runtime: RuntimeConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded before clap parses arguments, so its variables
    /// act as defaults for the `env` attributes.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.nats
            .validate()
            .context("invalid NATS configuration")?;
        self.google
            .validate()
            .context("invalid Google Cloud configuration")?;
        self.pipeline
            .validate()
            .context("invalid pipeline configuration")?;
        self.runtime
            .validate()
            .context("invalid runtime configuration")?;
        Ok(())
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            "Starting sentio"
        );

        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            nats_url = %self.nats.nats_url,
            storage_backend = %self.storage.storage_backend,
            results_bucket = %self.pipeline.results_bucket,
            text_bucket = self.pipeline.text_bucket.as_deref(),
            image_bucket = self.pipeline.image_bucket.as_deref(),
            text_topic = %self.pipeline.text_topic,
            image_topic = %self.pipeline.image_topic,
            max_concurrent_jobs = self.pipeline.max_concurrent_jobs,
            "Pipeline configuration"
        );

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            language_url = %self.google.google_language_url,
            vision_url = %self.google.google_vision_url,
            translate_url = %self.google.google_translate_url,
            timeout_secs = self.google.google_timeout_secs,
            "Analysis backend configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_minimal_arguments() {
        let cli = Cli::try_parse_from([
            "sentio",
            "--google-api-key",
            "key",
            "--results-bucket",
            "results",
            "--storage-backend",
            "memory",
        ])
        .unwrap();

        assert_eq!(cli.pipeline.results_bucket, "results");
        assert_eq!(cli.pipeline.text_topic, "TEXT_RESULTS");
        assert!(cli.validate().is_ok());
    }
}
