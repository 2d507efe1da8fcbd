//! Stream workers.
//!
//! - [`JobHandler`]: trait implemented by both stage handlers
//! - [`Worker`]: generic worker handling subscription, concurrency and shutdown
//! - [`WorkerHandles`]: the four workers of a running instance
//!
//! Consumer names are shared across instances, so running several
//! instances load-balances deliveries instead of duplicating them.

mod job_handler;
mod worker;

use sentio_nats::NatsClient;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub use self::job_handler::JobHandler;
pub use self::worker::Worker;
use crate::TRACING_TARGET_WORKER;
use crate::error::Result;
use crate::handler::{ConsumeHandler, IngestHandler};
use crate::pipeline::{ImagePipeline, TextPipeline};
use crate::state::PipelineState;

/// Worker running the ingest stage of pipeline `P`.
pub type IngestWorker<P> = Worker<IngestHandler<P>>;

/// Worker running the consume stage of pipeline `P`.
pub type ConsumeWorker<P> = Worker<ConsumeHandler<P>>;

/// Handles for background workers.
///
/// Holds join handles for all spawned workers, allowing graceful shutdown
/// and status monitoring.
pub struct WorkerHandles {
    text_ingest: JoinHandle<Result<()>>,
    text_consume: JoinHandle<Result<()>>,
    image_ingest: JoinHandle<Result<()>>,
    image_consume: JoinHandle<Result<()>>,
    cancel_token: CancellationToken,
}

impl WorkerHandles {
    /// Spawns the ingest and consume workers of both pipelines.
    ///
    /// All workers share a single semaphore bounding concurrent handler
    /// invocations.
    pub fn spawn(state: &PipelineState, nats: &NatsClient) -> Self {
        let cancel_token = CancellationToken::new();
        let semaphore = state.config.create_semaphore();

        tracing::info!(
            target: TRACING_TARGET_WORKER,
            max_concurrent_jobs = state.config.max_concurrent_jobs,
            "Starting pipeline workers"
        );

        let text_ingest = IngestWorker::<TextPipeline>::new(
            state.clone(),
            nats.clone(),
            cancel_token.clone(),
            semaphore.clone(),
        )
        .spawn();

        let text_consume = ConsumeWorker::<TextPipeline>::new(
            state.clone(),
            nats.clone(),
            cancel_token.clone(),
            semaphore.clone(),
        )
        .spawn();

        let image_ingest = IngestWorker::<ImagePipeline>::new(
            state.clone(),
            nats.clone(),
            cancel_token.clone(),
            semaphore.clone(),
        )
        .spawn();

        let image_consume = ConsumeWorker::<ImagePipeline>::new(
            state.clone(),
            nats.clone(),
            cancel_token.clone(),
            semaphore,
        )
        .spawn();

        tracing::debug!(
            target: TRACING_TARGET_WORKER,
            "All workers spawned successfully"
        );

        Self {
            text_ingest,
            text_consume,
            image_ingest,
            image_consume,
            cancel_token,
        }
    }

    /// Requests graceful shutdown of all workers.
    ///
    /// Workers stop pulling new messages and finish in-flight deliveries.
    pub fn shutdown(&self) {
        tracing::info!(
            target: TRACING_TARGET_WORKER,
            "Initiating graceful shutdown of pipeline workers"
        );
        self.cancel_token.cancel();
    }

    /// Checks if all workers are still running.
    pub fn all_running(&self) -> bool {
        !self.any_finished()
    }

    /// Checks if any worker has finished (possibly due to error).
    pub fn any_finished(&self) -> bool {
        self.text_ingest.is_finished()
            || self.text_consume.is_finished()
            || self.image_ingest.is_finished()
            || self.image_consume.is_finished()
    }

    /// Waits for all workers to complete.
    ///
    /// Returns the first error encountered, if any.
    pub async fn wait_all(self) -> Result<()> {
        tracing::debug!(
            target: TRACING_TARGET_WORKER,
            "Waiting for all workers to complete"
        );

        let (text_ingest, text_consume, image_ingest, image_consume) = tokio::join!(
            self.text_ingest,
            self.text_consume,
            self.image_ingest,
            self.image_consume
        );

        text_ingest??;
        text_consume??;
        image_ingest??;
        image_consume??;

        tracing::info!(
            target: TRACING_TARGET_WORKER,
            "All pipeline workers stopped"
        );

        Ok(())
    }
}
