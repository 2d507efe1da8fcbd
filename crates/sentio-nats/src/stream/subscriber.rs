//! Type-safe subscriber for JetStream streams.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_nats::jetstream::consumer::{self, pull};
use async_nats::jetstream::{self, Context, Message};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::get_or_create_stream;
use crate::{Error, Result, TRACING_TARGET_STREAM};

#[derive(Debug)]
struct StreamSubscriberInner {
    jetstream: Context,
    stream_name: String,
    consumer_name: String,
}

/// Type-safe stream subscriber backed by a durable pull consumer.
///
/// Every delivery must be settled explicitly through [`TypedMessage::ack`],
/// [`TypedMessage::nack`] or [`TypedMessage::term`]; unsettled deliveries are
/// redelivered once the server's ack wait expires.
#[derive(Debug)]
pub struct StreamSubscriber<T> {
    inner: Arc<StreamSubscriberInner>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for StreamSubscriber<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _marker: PhantomData,
        }
    }
}

impl<T> StreamSubscriber<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    /// Create a subscriber, creating the stream if it does not exist.
    #[instrument(skip(jetstream), target = TRACING_TARGET_STREAM)]
    pub(crate) async fn new(
        jetstream: &Context,
        stream_name: &str,
        consumer_name: &str,
        max_age: Duration,
    ) -> Result<Self> {
        get_or_create_stream(jetstream, stream_name, max_age).await?;

        debug!(
            target: TRACING_TARGET_STREAM,
            stream = %stream_name,
            consumer = %consumer_name,
            type_name = std::any::type_name::<T>(),
            "Created type-safe stream subscriber"
        );

        Ok(Self {
            inner: Arc::new(StreamSubscriberInner {
                jetstream: jetstream.clone(),
                stream_name: stream_name.to_owned(),
                consumer_name: consumer_name.to_owned(),
            }),
            _marker: PhantomData,
        })
    }

    /// Attach the durable consumer and start receiving messages.
    #[instrument(skip(self), target = TRACING_TARGET_STREAM)]
    pub async fn subscribe(&self) -> Result<TypedMessageStream<T>> {
        let consumer_config = pull::Config {
            durable_name: Some(self.inner.consumer_name.clone()),
            description: Some(format!("Consumer for stream {}", self.inner.stream_name)),
            ack_policy: consumer::AckPolicy::Explicit,
            ..Default::default()
        };

        let stream = self
            .inner
            .jetstream
            .get_stream(&self.inner.stream_name)
            .await
            .map_err(|e| {
                Error::stream_error(
                    &self.inner.stream_name,
                    format!("Failed to get stream: {e}"),
                )
            })?;

        let consumer = stream
            .get_or_create_consumer(&self.inner.consumer_name, consumer_config)
            .await
            .map_err(|e| {
                Error::consumer_error(
                    &self.inner.consumer_name,
                    format!("Failed to create consumer: {e}"),
                )
            })?;

        let messages: pull::Stream = consumer
            .messages()
            .await
            .map_err(|e| Error::operation("messages_stream", e.to_string()))?;

        debug!(
            target: TRACING_TARGET_STREAM,
            stream = %self.inner.stream_name,
            consumer = %self.inner.consumer_name,
            "Subscribed to stream"
        );

        Ok(TypedMessageStream {
            messages,
            stream_name: self.inner.stream_name.clone(),
            _marker: PhantomData,
        })
    }

    /// Get the stream name.
    #[inline]
    pub fn stream_name(&self) -> &str {
        &self.inner.stream_name
    }

    /// Get the consumer name.
    #[inline]
    pub fn consumer_name(&self) -> &str {
        &self.inner.consumer_name
    }
}

/// Type-safe message stream.
///
/// Deliveries whose body is not a valid `T` can never succeed, so they are
/// terminated on receipt and skipped.
pub struct TypedMessageStream<T> {
    messages: pull::Stream,
    stream_name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedMessageStream<T>
where
    T: DeserializeOwned + Send + 'static,
{
    /// Fetch the next decodable message from the stream.
    ///
    /// Returns `Ok(None)` once the underlying stream ends.
    pub async fn next(&mut self) -> Result<Option<TypedMessage<T>>> {
        loop {
            let message = match self.messages.next().await {
                Some(Ok(message)) => message,
                Some(Err(e)) => {
                    warn!(
                        target: TRACING_TARGET_STREAM,
                        stream = %self.stream_name,
                        error = %e,
                        "Error receiving message"
                    );
                    return Err(Error::operation("message_receive", e.to_string()));
                }
                None => return Ok(None),
            };

            match serde_json::from_slice::<T>(&message.payload) {
                Ok(payload) => {
                    debug!(
                        target: TRACING_TARGET_STREAM,
                        subject = %message.subject,
                        payload_size = message.payload.len(),
                        "Received typed message"
                    );
                    return Ok(Some(TypedMessage { payload, message }));
                }
                Err(e) => {
                    warn!(
                        target: TRACING_TARGET_STREAM,
                        subject = %message.subject,
                        error = %e,
                        "Terminating undecodable message"
                    );
                    if let Err(e) = message.ack_with(jetstream::AckKind::Term).await {
                        warn!(
                            target: TRACING_TARGET_STREAM,
                            error = %e,
                            "Failed to terminate undecodable message"
                        );
                    }
                }
            }
        }
    }
}

/// A typed message from the stream.
pub struct TypedMessage<T> {
    payload: T,
    message: Message,
}

impl<T> TypedMessage<T> {
    /// Get the message subject.
    pub fn subject(&self) -> &str {
        self.message.subject.as_str()
    }

    /// Get a reference to the typed payload.
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Get the number of delivery attempts.
    pub fn delivery_count(&self) -> Result<i64> {
        self.message
            .info()
            .map(|info| info.delivered)
            .map_err(|e| Error::operation("message_info", e.to_string()))
    }

    /// Acknowledge the message.
    pub async fn ack(&self) -> Result<()> {
        self.message
            .ack()
            .await
            .map_err(|e| Error::operation("message_ack", e.to_string()))
    }

    /// Negative acknowledge the message (trigger redelivery).
    pub async fn nack(&self) -> Result<()> {
        self.message
            .ack_with(jetstream::AckKind::Nak(None))
            .await
            .map_err(|e| Error::operation("message_nack", e.to_string()))
    }

    /// Terminate the message; it will never be redelivered.
    pub async fn term(&self) -> Result<()> {
        self.message
            .ack_with(jetstream::AckKind::Term)
            .await
            .map_err(|e| Error::operation("message_term", e.to_string()))
    }
}
