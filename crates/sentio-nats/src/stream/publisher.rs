//! Type-safe publisher for JetStream streams.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_nats::jetstream::Context;
use serde::Serialize;
use tracing::{debug, instrument};

use super::get_or_create_stream;
use crate::{Error, Result, TRACING_TARGET_STREAM};

#[derive(Debug)]
struct StreamPublisherInner {
    jetstream: Context,
    stream_name: String,
}

/// Type-safe stream publisher.
///
/// Publishes JSON-encoded `T` values to the subject of one stream and waits
/// for the server acknowledgement of every message.
#[derive(Debug)]
pub struct StreamPublisher<T> {
    inner: Arc<StreamPublisherInner>,
    _marker: PhantomData<fn(&T)>,
}

impl<T> Clone for StreamPublisher<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _marker: PhantomData,
        }
    }
}

impl<T> StreamPublisher<T>
where
    T: Serialize + Send + Sync + 'static,
{
    /// Create a publisher, creating the stream if it does not exist.
    #[instrument(skip(jetstream), target = TRACING_TARGET_STREAM)]
    pub(crate) async fn new(
        jetstream: &Context,
        stream_name: &str,
        max_age: Duration,
    ) -> Result<Self> {
        get_or_create_stream(jetstream, stream_name, max_age).await?;

        Ok(Self {
            inner: Arc::new(StreamPublisherInner {
                jetstream: jetstream.clone(),
                stream_name: stream_name.to_owned(),
            }),
            _marker: PhantomData,
        })
    }

    /// Publish one message and wait for the stream to store it.
    #[instrument(skip(self, message), target = TRACING_TARGET_STREAM)]
    pub async fn publish(&self, message: &T) -> Result<u64> {
        let subject = self.inner.stream_name.as_str();
        let payload = serde_json::to_vec(message)?;
        let payload_size = payload.len();

        let ack = self
            .inner
            .jetstream
            .publish(subject.to_owned(), payload.into())
            .await
            .map_err(|e| Error::delivery_failed(subject, e.to_string()))?
            .await
            .map_err(|e| Error::delivery_failed(subject, e.to_string()))?;

        debug!(
            target: TRACING_TARGET_STREAM,
            subject = %subject,
            sequence = ack.sequence,
            duplicate = ack.duplicate,
            payload_size = payload_size,
            "Published message"
        );

        Ok(ack.sequence)
    }

    /// Returns the stream name.
    #[inline]
    pub fn stream_name(&self) -> &str {
        &self.inner.stream_name
    }
}
