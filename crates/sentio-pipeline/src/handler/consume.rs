//! Consume stage: published result in, persisted artifact out.

use std::marker::PhantomData;

use bytes::Bytes;
use sentio_core::types::PersistedArtifact;
use sentio_nats::stream::TransportMessage;

use crate::TRACING_TARGET_CONSUME;
use crate::codec::decode_payload;
use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::state::PipelineState;

/// Content type of every written artifact.
const ARTIFACT_CONTENT_TYPE: &str = "text/plain";

/// Handles result messages for pipeline `P`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsumeHandler<P> {
    _marker: PhantomData<P>,
}

impl<P: Pipeline> ConsumeHandler<P> {
    /// Processes one result message and writes its artifact.
    ///
    /// The artifact key and content depend only on the message, so handling
    /// the same message again overwrites the object with identical bytes.
    pub async fn handle(
        state: &PipelineState,
        message: &TransportMessage,
    ) -> Result<PersistedArtifact> {
        let candidate: P::Candidate = decode_payload(message)?;
        let artifact = P::render(candidate)?;

        tracing::debug!(
            target: TRACING_TARGET_CONSUME,
            pipeline = P::NAME,
            key = %artifact.key,
            "Payload validated"
        );

        let output = state
            .storage
            .put(
                &artifact.key,
                Bytes::from(artifact.content.clone()),
                Some(ARTIFACT_CONTENT_TYPE),
            )
            .await?;

        tracing::info!(
            target: TRACING_TARGET_CONSUME,
            pipeline = P::NAME,
            bucket = state.storage.bucket(),
            key = %artifact.key,
            size = artifact.len(),
            e_tag = output.e_tag.as_deref(),
            "Artifact persisted"
        );

        Ok(artifact)
    }
}
