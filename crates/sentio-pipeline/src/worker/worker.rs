//! Generic stream worker.

use std::marker::PhantomData;
use std::sync::Arc;

use sentio_nats::NatsClient;
use sentio_nats::stream::{TypedMessage, TypedMessageStream};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::JobHandler;
use crate::TRACING_TARGET_WORKER;
use crate::error::Result;
use crate::state::PipelineState;

/// Generic stream worker.
///
/// Subscribes to the handler's stream with a durable consumer, runs the
/// handler for every delivery under a shared semaphore and settles the
/// message afterwards:
///
/// - success: `ack`
/// - retryable failure: `nak`, so the message is redelivered
/// - permanent failure: `term`, so it is never redelivered
///
/// Shutdown via the cancellation token stops pulling new messages; work in
/// flight is abandoned and redelivered once its ack deadline passes.
pub struct Worker<H: JobHandler> {
    state: PipelineState,
    nats: NatsClient,
    consumer_name: String,
    cancel_token: CancellationToken,
    semaphore: Arc<Semaphore>,
    _marker: PhantomData<H>,
}

impl<H: JobHandler> Worker<H> {
    /// Creates a new worker with the given handler type.
    pub fn new(
        state: PipelineState,
        nats: NatsClient,
        cancel_token: CancellationToken,
        semaphore: Arc<Semaphore>,
    ) -> Self {
        let consumer_name = state.config.consumer_name(H::PIPELINE, H::STAGE);
        Self {
            state,
            nats,
            consumer_name,
            cancel_token,
            semaphore,
            _marker: PhantomData,
        }
    }

    /// Returns the durable consumer name.
    pub fn consumer_name(&self) -> &str {
        &self.consumer_name
    }

    /// Spawns the worker as a background task.
    pub fn spawn(self) -> JoinHandle<Result<()>> {
        tokio::spawn(async move { self.run().await })
    }

    /// Runs the worker loop, processing messages as they arrive.
    async fn run(self) -> Result<()> {
        let stream_name = H::stream_name(&self.state.config).to_owned();

        tracing::info!(
            target: TRACING_TARGET_WORKER,
            pipeline = H::PIPELINE,
            stage = H::STAGE,
            stream = %stream_name,
            consumer = %self.consumer_name,
            "Starting worker"
        );

        let subscriber = self
            .nats
            .stream_subscriber::<H::Message>(&stream_name, &self.consumer_name)
            .await?;
        let mut stream: TypedMessageStream<H::Message> = subscriber.subscribe().await?;

        tracing::info!(
            target: TRACING_TARGET_WORKER,
            pipeline = H::PIPELINE,
            stage = H::STAGE,
            consumer = %self.consumer_name,
            "Subscribed to stream"
        );

        loop {
            tokio::select! {
                biased;

                () = self.cancel_token.cancelled() => {
                    tracing::info!(
                        target: TRACING_TARGET_WORKER,
                        pipeline = H::PIPELINE,
                        stage = H::STAGE,
                        "Shutdown requested, stopping worker"
                    );
                    break;
                }

                result = stream.next() => {
                    if !self.handle_stream_result(result).await {
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// Handles a stream result, returning false if the worker should stop.
    async fn handle_stream_result(
        &self,
        result: sentio_nats::Result<Option<TypedMessage<H::Message>>>,
    ) -> bool {
        let msg = match result {
            Ok(Some(msg)) => msg,
            Ok(None) => {
                tracing::warn!(
                    target: TRACING_TARGET_WORKER,
                    consumer = %self.consumer_name,
                    "Message stream ended, stopping worker"
                );
                return false;
            }
            Err(err) => {
                tracing::error!(
                    target: TRACING_TARGET_WORKER,
                    consumer = %self.consumer_name,
                    error = %err,
                    "Failed to receive message"
                );
                return true;
            }
        };

        let permit = tokio::select! {
            biased;

            () = self.cancel_token.cancelled() => return false,
            permit = self.semaphore.clone().acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => {
                    tracing::error!(
                        target: TRACING_TARGET_WORKER,
                        "Semaphore closed, stopping worker"
                    );
                    return false;
                }
            },
        };

        let state = self.state.clone();
        tokio::spawn(async move {
            // Held until the message is settled.
            let _permit = permit;
            process::<H>(&state, msg).await;
        });

        true
    }
}

/// How a delivery is settled once its handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Settlement {
    /// Processed; remove from the stream.
    Ack,
    /// Failed transiently; redeliver.
    Nak,
    /// Failed permanently; never redeliver.
    Term,
}

impl Settlement {
    /// Chooses the settlement for a handler result.
    pub(crate) fn for_result(result: &Result<()>) -> Self {
        match result {
            Ok(()) => Self::Ack,
            Err(err) if err.is_retryable() => Self::Nak,
            Err(_) => Self::Term,
        }
    }
}

/// Runs the handler for one delivery and settles the message.
async fn process<H: JobHandler>(state: &PipelineState, msg: TypedMessage<H::Message>) {
    let subject = msg.subject().to_owned();
    let delivery_count = msg.delivery_count().ok();

    tracing::debug!(
        target: TRACING_TARGET_WORKER,
        pipeline = H::PIPELINE,
        stage = H::STAGE,
        subject = %subject,
        delivery_count,
        "Processing message"
    );

    let result = H::handle_job(state, msg.payload()).await;
    let settlement = Settlement::for_result(&result);

    match (&result, settlement) {
        (Ok(()), _) => {
            tracing::debug!(
                target: TRACING_TARGET_WORKER,
                pipeline = H::PIPELINE,
                stage = H::STAGE,
                subject = %subject,
                "Message processed"
            );
        }
        (Err(err), Settlement::Nak) => {
            tracing::error!(
                target: TRACING_TARGET_WORKER,
                pipeline = H::PIPELINE,
                stage = H::STAGE,
                subject = %subject,
                delivery_count,
                error = %err,
                kind = err.kind_str(),
                "Message failed, requesting redelivery"
            );
        }
        (Err(err), _) => {
            tracing::error!(
                target: TRACING_TARGET_WORKER,
                pipeline = H::PIPELINE,
                stage = H::STAGE,
                subject = %subject,
                error = %err,
                kind = err.kind_str(),
                "Message failed permanently, terminating"
            );
        }
    }

    let settled = match settlement {
        Settlement::Ack => msg.ack().await,
        Settlement::Nak => msg.nack().await,
        Settlement::Term => msg.term().await,
    };

    if let Err(err) = settled {
        tracing::error!(
            target: TRACING_TARGET_WORKER,
            subject = %subject,
            settlement = ?settlement,
            error = %err,
            "Failed to settle message"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PipelineError;

    #[test]
    fn success_is_acked() {
        assert_eq!(Settlement::for_result(&Ok(())), Settlement::Ack);
    }

    #[test]
    fn transient_failures_are_redelivered() {
        let timeout = PipelineError::from(sentio_core::Error::timeout());
        assert_eq!(Settlement::for_result(&Err(timeout)), Settlement::Nak);

        let unreachable = PipelineError::from(sentio_core::Error::network_error());
        assert_eq!(Settlement::for_result(&Err(unreachable)), Settlement::Nak);
    }

    #[test]
    fn permanent_failures_are_terminated() {
        let invalid = PipelineError::validation("missing filename");
        assert_eq!(Settlement::for_result(&Err(invalid)), Settlement::Term);

        let rejected = PipelineError::from(sentio_core::Error::authentication());
        assert_eq!(Settlement::for_result(&Err(rejected)), Settlement::Term);
    }
}
