//! Ingest stage: storage event in, published result out.

use std::marker::PhantomData;

use sentio_core::types::{ResultPayload, StorageEvent};

use crate::TRACING_TARGET_INGEST;
use crate::error::{PipelineError, Result};
use crate::pipeline::Pipeline;
use crate::state::PipelineState;

/// Terminal state of a successful ingest invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// The event reported a deletion; nothing was analyzed or published.
    Skipped,
    /// The assembled payload was published to `topic`.
    Published {
        topic: String,
        payload: ResultPayload,
    },
}

/// Handles storage upload events for pipeline `P`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestHandler<P> {
    _marker: PhantomData<P>,
}

impl<P: Pipeline> IngestHandler<P> {
    /// Processes one storage event.
    ///
    /// Validation happens before any external call, and nothing is published
    /// unless every mandatory analysis call succeeded.
    pub async fn handle(state: &PipelineState, event: &StorageEvent) -> Result<IngestOutcome> {
        if event.is_deletion() {
            tracing::debug!(
                target: TRACING_TARGET_INGEST,
                pipeline = P::NAME,
                bucket = event.bucket.as_deref(),
                name = event.name.as_deref(),
                "Deletion event, skipping"
            );
            return Ok(IngestOutcome::Skipped);
        }

        let file = event.file_reference()?;
        if let Some(expected) = P::source_bucket(&state.config)
            && expected != file.bucket()
        {
            return Err(PipelineError::validation(format!(
                "bucket '{}' does not match the configured source bucket '{expected}'",
                file.bucket()
            )));
        }

        tracing::debug!(
            target: TRACING_TARGET_INGEST,
            pipeline = P::NAME,
            file = %file,
            "Event validated"
        );

        let payload = P::analyze(&state.analysis, &file).await?;

        let topic = P::topic(&state.config);
        state.publisher.publish(topic, &payload).await?;

        tracing::info!(
            target: TRACING_TARGET_INGEST,
            pipeline = P::NAME,
            file = %file,
            topic,
            "Analysis result published"
        );

        Ok(IngestOutcome::Published {
            topic: topic.to_owned(),
            payload,
        })
    }
}
