//! NATS client wrapper and connection management.
//!
//! The underlying `async-nats` client multiplexes every operation over one
//! TCP connection and is `Arc`-wrapped, so cloning [`NatsClient`] is cheap
//! and clones can be shared freely between workers.

use std::sync::Arc;
use std::time::Duration;

use async_nats::{Client, ConnectOptions, jetstream};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::time::timeout;

use super::nats_config::NatsConfig;
use crate::stream::{StreamPublisher, StreamSubscriber};
use crate::{Error, Result, TRACING_TARGET_CLIENT, TRACING_TARGET_CONNECTION};

/// NATS client wrapper with connection management.
///
/// This wrapper is cheaply cloneable and thread-safe.
#[derive(Debug, Clone)]
pub struct NatsClient {
    inner: Arc<NatsClientInner>,
}

#[derive(Debug)]
struct NatsClientInner {
    client: Client,
    jetstream: jetstream::Context,
    config: NatsConfig,
}

impl NatsClient {
    /// Create a new NATS client and connect
    #[tracing::instrument(skip(config), target = TRACING_TARGET_CONNECTION)]
    pub async fn connect(config: NatsConfig) -> Result<Self> {
        config.validate()?;

        tracing::info!(
            target: TRACING_TARGET_CONNECTION,
            servers = %config.nats_url,
            "Connecting to NATS servers"
        );

        let mut connect_opts = ConnectOptions::new()
            .name(config.name())
            .ping_interval(config.ping_interval())
            .connection_timeout(config.connect_timeout());

        if let Some(token) = &config.nats_token {
            connect_opts = connect_opts.token(token.clone());
        }

        if let Some(max_reconnects) = config.max_reconnects_option() {
            connect_opts = connect_opts.max_reconnects(max_reconnects);
        }

        let reconnect_delay_ms = config.reconnect_delay().as_millis().min(u64::MAX as u128) as u64;
        connect_opts = connect_opts.reconnect_delay_callback(move |attempts| {
            Duration::from_millis(std::cmp::min(
                reconnect_delay_ms * 2_u64.pow(attempts.min(32) as u32),
                30_000,
            ))
        });

        let connect_timeout = config.connect_timeout();
        let client = timeout(
            connect_timeout,
            async_nats::connect_with_options(&config.nats_url, connect_opts),
        )
        .await
        .map_err(|_| Error::timeout(connect_timeout))?
        .map_err(|e| Error::Connection(Box::new(e)))?;

        let jetstream = jetstream::new(client.clone());

        let server_info = client.server_info();
        tracing::info!(
            target: TRACING_TARGET_CONNECTION,
            server_host = %server_info.host,
            server_version = %server_info.version,
            server_id = %server_info.server_id,
            max_payload = server_info.max_payload,
            "Successfully connected to NATS"
        );

        Ok(Self {
            inner: Arc::new(NatsClientInner {
                client,
                jetstream,
                config,
            }),
        })
    }

    /// Get the underlying NATS client
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.inner.client
    }

    /// Get the JetStream context
    #[must_use]
    pub fn jetstream(&self) -> &jetstream::Context {
        &self.inner.jetstream
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &NatsConfig {
        &self.inner.config
    }
}

// Stream getters
impl NatsClient {
    /// Create a publisher for the named stream, creating the stream if absent.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_CLIENT)]
    pub async fn stream_publisher<T>(&self, stream_name: &str) -> Result<StreamPublisher<T>>
    where
        T: Serialize + Send + Sync + 'static,
    {
        StreamPublisher::new(
            &self.inner.jetstream,
            stream_name,
            self.inner.config.stream_max_age(),
        )
        .await
    }

    /// Create a durable subscriber for the named stream, creating the stream
    /// if absent.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_CLIENT)]
    pub async fn stream_subscriber<T>(
        &self,
        stream_name: &str,
        consumer_name: &str,
    ) -> Result<StreamSubscriber<T>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        StreamSubscriber::new(
            &self.inner.jetstream,
            stream_name,
            consumer_name,
            self.inner.config.stream_max_age(),
        )
        .await
    }
}
