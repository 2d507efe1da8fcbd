//! JetStream streams carrying upload events and analysis results.
//!
//! Every stream captures exactly one subject named after the stream itself,
//! so a topic name is all a publisher or subscriber needs.

mod publisher;
mod subscriber;
mod transport;

pub use publisher::StreamPublisher;
pub use subscriber::{StreamSubscriber, TypedMessage, TypedMessageStream};
pub use transport::TransportMessage;

use std::time::Duration;

use async_nats::jetstream::{self, stream};

use crate::{Error, Result, TRACING_TARGET_STREAM};

/// Looks up a stream by name and creates it when it does not exist yet.
pub(crate) async fn get_or_create_stream(
    jetstream: &jetstream::Context,
    stream_name: &str,
    max_age: Duration,
) -> Result<stream::Stream> {
    if let Ok(stream) = jetstream.get_stream(stream_name).await {
        tracing::debug!(
            target: TRACING_TARGET_STREAM,
            stream = %stream_name,
            "Using existing stream"
        );
        return Ok(stream);
    }

    tracing::debug!(
        target: TRACING_TARGET_STREAM,
        stream = %stream_name,
        max_age_secs = max_age.as_secs(),
        "Creating new stream"
    );

    let stream_config = stream::Config {
        name: stream_name.to_owned(),
        description: Some(format!("sentio stream: {stream_name}")),
        subjects: vec![stream_name.to_owned()],
        max_age,
        ..Default::default()
    };

    jetstream
        .create_stream(stream_config)
        .await
        .map_err(|e| Error::stream_error(stream_name, e.to_string()))
}
