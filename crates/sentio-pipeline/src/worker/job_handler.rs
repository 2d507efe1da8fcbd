//! Job handler trait connecting stage handlers to workers.

use std::future::Future;

use sentio_core::types::StorageEvent;
use sentio_nats::stream::TransportMessage;
use serde::de::DeserializeOwned;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::handler::{ConsumeHandler, IngestHandler};
use crate::pipeline::Pipeline;
use crate::state::PipelineState;

/// Trait for handlers a [`Worker`](super::Worker) can drive.
///
/// The worker takes care of subscription, concurrency, settlement and
/// shutdown; the handler only processes one message.
pub trait JobHandler: Send + Sync + 'static {
    /// Message type carried by the subscribed stream.
    type Message: DeserializeOwned + Send + Sync + 'static;

    /// Pipeline name used in logs and consumer names.
    const PIPELINE: &'static str;

    /// Stage name used in logs and consumer names.
    const STAGE: &'static str;

    /// Stream the worker subscribes to.
    fn stream_name(config: &PipelineConfig) -> &str;

    /// Process a single message.
    fn handle_job(
        state: &PipelineState,
        message: &Self::Message,
    ) -> impl Future<Output = Result<()>> + Send;
}

impl<P: Pipeline> JobHandler for IngestHandler<P> {
    type Message = StorageEvent;

    const PIPELINE: &'static str = P::NAME;
    const STAGE: &'static str = "ingest";

    fn stream_name(config: &PipelineConfig) -> &str {
        P::uploads_stream(config)
    }

    async fn handle_job(state: &PipelineState, message: &Self::Message) -> Result<()> {
        Self::handle(state, message).await.map(|_| ())
    }
}

impl<P: Pipeline> JobHandler for ConsumeHandler<P> {
    type Message = TransportMessage;

    const PIPELINE: &'static str = P::NAME;
    const STAGE: &'static str = "consume";

    fn stream_name(config: &PipelineConfig) -> &str {
        P::topic(config)
    }

    async fn handle_job(state: &PipelineState, message: &Self::Message) -> Result<()> {
        Self::handle(state, message).await.map(|_| ())
    }
}
