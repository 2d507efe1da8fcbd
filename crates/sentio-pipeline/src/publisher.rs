//! Result publishing.
//!
//! The ingest stage hands its payload to a [`ResultPublisher`]; the
//! production implementation publishes to a JetStream stream named after
//! the topic.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sentio_core::types::ResultPayload;
use sentio_nats::NatsClient;
use sentio_nats::stream::{StreamPublisher, TransportMessage};
use tokio::sync::Mutex;

use crate::TRACING_TARGET_PUBLISHER;
use crate::codec::encode_payload;
use crate::error::{PipelineError, Result};

/// Sink for assembled result payloads.
///
/// A call returns only after the transport acknowledged the message.
#[async_trait]
pub trait ResultPublisher: Send + Sync {
    /// Publish `payload` to `topic`.
    async fn publish(&self, topic: &str, payload: &ResultPayload) -> Result<()>;
}

/// Publishes payloads as [`TransportMessage`] envelopes over NATS JetStream.
#[derive(Clone)]
pub struct NatsResultPublisher {
    nats: NatsClient,
    publishers: Arc<Mutex<HashMap<String, StreamPublisher<TransportMessage>>>>,
}

impl NatsResultPublisher {
    /// Creates a publisher on top of a connected client.
    pub fn new(nats: NatsClient) -> Self {
        Self {
            nats,
            publishers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    async fn stream_publisher(&self, topic: &str) -> Result<StreamPublisher<TransportMessage>> {
        let mut publishers = self.publishers.lock().await;
        if let Some(publisher) = publishers.get(topic) {
            return Ok(publisher.clone());
        }

        let publisher = self
            .nats
            .stream_publisher::<TransportMessage>(topic)
            .await
            .map_err(|e| PipelineError::publish(topic, e))?;
        publishers.insert(topic.to_owned(), publisher.clone());
        Ok(publisher)
    }
}

#[async_trait]
impl ResultPublisher for NatsResultPublisher {
    async fn publish(&self, topic: &str, payload: &ResultPayload) -> Result<()> {
        let message = encode_payload(payload).map_err(|e| PipelineError::publish(topic, e))?;
        let publisher = self.stream_publisher(topic).await?;
        let sequence = publisher
            .publish(&message)
            .await
            .map_err(|e| PipelineError::publish(topic, e))?;

        tracing::debug!(
            target: TRACING_TARGET_PUBLISHER,
            topic,
            sequence,
            filename = payload.filename(),
            "Result published"
        );

        Ok(())
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryPublisher;

#[cfg(any(test, feature = "test-utils"))]
mod memory {
    use std::sync::{Arc, Mutex, MutexGuard};

    use super::*;

    #[derive(Debug, Default)]
    struct MemoryState {
        published: Vec<(String, TransportMessage)>,
        failing: bool,
    }

    /// Publisher that keeps encoded envelopes in memory.
    #[derive(Debug, Clone, Default)]
    pub struct MemoryPublisher {
        state: Arc<Mutex<MemoryState>>,
    }

    impl MemoryPublisher {
        /// Creates an empty publisher.
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes every following publish fail.
        #[must_use]
        pub fn failing(self) -> Self {
            self.lock().failing = true;
            self
        }

        /// Returns every published `(topic, envelope)` pair in order.
        pub fn published(&self) -> Vec<(String, TransportMessage)> {
            self.lock().published.clone()
        }

        /// Returns the envelopes published to `topic` in order.
        pub fn messages(&self, topic: &str) -> Vec<TransportMessage> {
            self.lock()
                .published
                .iter()
                .filter(|(t, _)| t == topic)
                .map(|(_, message)| message.clone())
                .collect()
        }

        fn lock(&self) -> MutexGuard<'_, MemoryState> {
            self.state
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }

    #[async_trait]
    impl ResultPublisher for MemoryPublisher {
        async fn publish(&self, topic: &str, payload: &ResultPayload) -> Result<()> {
            let message = encode_payload(payload).map_err(|e| PipelineError::publish(topic, e))?;

            let mut state = self.lock();
            if state.failing {
                return Err(PipelineError::publish(
                    topic,
                    std::io::Error::other("memory publisher failure"),
                ));
            }
            state.published.push((topic.to_owned(), message));
            Ok(())
        }
    }
}
