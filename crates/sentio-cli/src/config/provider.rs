//! Service construction from CLI configuration.

use anyhow::Context;
use sentio_nats::NatsClient;
use sentio_pipeline::{NatsResultPublisher, PipelineState};

use super::Cli;
use crate::TRACING_TARGET_STARTUP;

/// Connected collaborators of a running instance.
#[derive(Debug, Clone)]
pub struct Services {
    /// Shared handler state.
    pub state: PipelineState,
    /// NATS client used by the workers.
    pub nats: NatsClient,
}

/// Connects every collaborator named in the configuration.
///
/// # Errors
///
/// Returns an error if a client cannot be created or a service is not
/// reachable.
pub async fn create_services(cli: &Cli) -> anyhow::Result<Services> {
    let analysis = cli
        .google
        .clone()
        .into_service()
        .context("failed to create analysis client")?;

    let storage = cli
        .storage
        .connect(&cli.pipeline.results_bucket)
        .context("failed to create storage client")?;
    storage
        .verify_reachable()
        .await
        .with_context(|| format!("results bucket '{}' is not reachable", storage.bucket()))?;

    let nats = NatsClient::connect(cli.nats.clone())
        .await
        .context("failed to connect to NATS")?;

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        results_bucket = storage.bucket(),
        "Services connected"
    );

    let publisher = NatsResultPublisher::new(nats.clone());
    let state = PipelineState::new(analysis, storage, publisher, cli.pipeline.clone());

    Ok(Services { state, nats })
}
