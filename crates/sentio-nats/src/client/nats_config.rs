//! NATS connection configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Configuration for NATS connections with sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct NatsConfig {
    /// NATS server URL (comma-separated for clustering)
    #[cfg_attr(
        feature = "config",
        arg(long = "nats-url", env = "NATS_URL", default_value = "nats://127.0.0.1:4222")
    )]
    pub nats_url: String,

    /// Authentication token
    #[cfg_attr(feature = "config", arg(long = "nats-token", env = "NATS_TOKEN"))]
    #[serde(default)]
    pub nats_token: Option<String>,

    /// Client connection name for debugging and monitoring
    #[cfg_attr(
        feature = "config",
        arg(long = "nats-client-name", env = "NATS_CLIENT_NAME")
    )]
    #[serde(default)]
    pub nats_client_name: Option<String>,

    /// Connection timeout in seconds (optional)
    #[cfg_attr(
        feature = "config",
        arg(long = "nats-connect-timeout", env = "NATS_CONNECT_TIMEOUT_SECS")
    )]
    #[serde(default)]
    pub nats_connect_timeout: Option<u64>,

    /// Maximum number of reconnection attempts (0 = unlimited)
    #[cfg_attr(
        feature = "config",
        arg(long = "nats-max-reconnects", env = "NATS_MAX_RECONNECTS")
    )]
    #[serde(default)]
    pub nats_max_reconnects: Option<usize>,

    /// Retention of stream messages in seconds (optional)
    #[cfg_attr(
        feature = "config",
        arg(long = "nats-stream-max-age", env = "NATS_STREAM_MAX_AGE_SECS")
    )]
    #[serde(default)]
    pub nats_stream_max_age: Option<u64>,
}

// Default values
const DEFAULT_NAME: &str = "sentio";
const DEFAULT_MAX_RECONNECTS: usize = 10;
const DEFAULT_RECONNECT_DELAY_SECS: u64 = 2;
const DEFAULT_PING_INTERVAL_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_STREAM_MAX_AGE_SECS: u64 = 7 * 24 * 60 * 60;

impl NatsConfig {
    /// Create a new configuration with a server URL and no authentication.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            nats_url: server_url.into(),
            nats_token: None,
            nats_client_name: None,
            nats_connect_timeout: None,
            nats_max_reconnects: None,
            nats_stream_max_age: None,
        }
    }

    /// Returns the client name, using the default if not set.
    #[inline]
    pub fn name(&self) -> &str {
        self.nats_client_name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    /// Returns the server URLs as a vector (splits comma-separated URLs).
    pub fn servers(&self) -> Vec<&str> {
        self.nats_url.split(',').map(str::trim).collect()
    }

    /// Returns the connection timeout.
    #[inline]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(
            self.nats_connect_timeout
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
        )
    }

    /// Returns the reconnect delay as a Duration.
    #[inline]
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(DEFAULT_RECONNECT_DELAY_SECS)
    }

    /// Returns the ping interval as a Duration.
    #[inline]
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(DEFAULT_PING_INTERVAL_SECS)
    }

    /// Returns the max reconnects as Option (0 means unlimited).
    #[inline]
    pub fn max_reconnects_option(&self) -> Option<usize> {
        let max = self.nats_max_reconnects.unwrap_or(DEFAULT_MAX_RECONNECTS);
        if max == 0 { None } else { Some(max) }
    }

    /// Returns how long streams created by this client retain messages.
    #[inline]
    pub fn stream_max_age(&self) -> Duration {
        Duration::from_secs(
            self.nats_stream_max_age
                .unwrap_or(DEFAULT_STREAM_MAX_AGE_SECS),
        )
    }

    /// Set the authentication token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.nats_token = Some(token.into());
        self
    }

    /// Set the client connection name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.nats_client_name = Some(name.into());
        self
    }

    /// Set the connection timeout in seconds.
    #[must_use]
    pub fn with_connect_timeout_secs(mut self, secs: u64) -> Self {
        self.nats_connect_timeout = Some(secs);
        self
    }

    /// Set maximum reconnection attempts (0 for unlimited).
    #[must_use]
    pub fn with_max_reconnects(mut self, max_reconnects: usize) -> Self {
        self.nats_max_reconnects = Some(max_reconnects);
        self
    }

    /// Set the stream retention in seconds.
    #[must_use]
    pub fn with_stream_max_age_secs(mut self, secs: u64) -> Self {
        self.nats_stream_max_age = Some(secs);
        self
    }

    /// Validate the configuration and return any issues.
    pub fn validate(&self) -> Result<()> {
        for server in self.servers() {
            if server.is_empty() {
                return Err(Error::invalid_config("Server URL cannot be empty"));
            }
            if !(server.starts_with("nats://") || server.starts_with("tls://")) {
                return Err(Error::invalid_config(format!(
                    "Invalid server URL format: {server}"
                )));
            }
        }

        if self.nats_token.as_deref().is_some_and(str::is_empty) {
            return Err(Error::invalid_config("Token cannot be empty when set"));
        }

        if self.nats_stream_max_age == Some(0) {
            return Err(Error::invalid_config(
                "Stream max age must be greater than zero",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config() {
        let config = NatsConfig::new("nats://localhost:4222");
        assert_eq!(config.servers(), vec!["nats://localhost:4222"]);
        assert_eq!(config.nats_token, None);
        assert_eq!(config.name(), DEFAULT_NAME);
        assert_eq!(config.connect_timeout(), Duration::from_secs(30));
        assert_eq!(config.max_reconnects_option(), Some(10));
        assert_eq!(
            config.stream_max_age(),
            Duration::from_secs(DEFAULT_STREAM_MAX_AGE_SECS)
        );
    }

    #[test]
    fn test_config_builder() {
        let config = NatsConfig::new("nats://localhost:4222")
            .with_token("my-token")
            .with_name("test-client")
            .with_connect_timeout_secs(5)
            .with_max_reconnects(0)
            .with_stream_max_age_secs(60);

        assert_eq!(config.name(), "test-client");
        assert_eq!(config.connect_timeout(), Duration::from_secs(5));
        assert_eq!(config.max_reconnects_option(), None);
        assert_eq!(config.stream_max_age(), Duration::from_secs(60));
    }

    #[test]
    fn test_config_validation() {
        assert!(NatsConfig::new("nats://localhost:4222").validate().is_ok());
        assert!(NatsConfig::new("").validate().is_err());
        assert!(NatsConfig::new("invalid-url").validate().is_err());
        assert!(
            NatsConfig::new("nats://localhost:4222")
                .with_token("")
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_multiple_servers() {
        let config = NatsConfig::new("nats://localhost:4222, tls://localhost:4223");
        assert_eq!(
            config.servers(),
            vec!["nats://localhost:4222", "tls://localhost:4223"]
        );
        assert!(config.validate().is_ok());
    }
}
