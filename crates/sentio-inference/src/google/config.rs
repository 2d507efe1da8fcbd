//! Configuration for the Google Cloud analysis client.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use sentio_core::{Error, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Default Natural Language API endpoint.
pub const DEFAULT_LANGUAGE_URL: &str = "https://language.googleapis.com/v1/";
/// Default Vision API endpoint.
pub const DEFAULT_VISION_URL: &str = "https://vision.googleapis.com/v1/";
/// Default Translation API (v2) endpoint.
pub const DEFAULT_TRANSLATE_URL: &str = "https://translation.googleapis.com/language/translate/v2/";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the Google Cloud analysis APIs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct GoogleCloudConfig {
    /// API key sent with every request.
    #[cfg_attr(feature = "config", arg(long = "google-api-key", env = "GOOGLE_API_KEY"))]
    pub google_api_key: String,

    /// Natural Language API base URL.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "google-language-url",
            env = "GOOGLE_LANGUAGE_URL",
            default_value = DEFAULT_LANGUAGE_URL
        )
    )]
    #[serde(default = "default_language_url")]
    pub google_language_url: String,

    /// Vision API base URL.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "google-vision-url",
            env = "GOOGLE_VISION_URL",
            default_value = DEFAULT_VISION_URL
        )
    )]
    #[serde(default = "default_vision_url")]
    pub google_vision_url: String,

    /// Translation API base URL.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "google-translate-url",
            env = "GOOGLE_TRANSLATE_URL",
            default_value = DEFAULT_TRANSLATE_URL
        )
    )]
    #[serde(default = "default_translate_url")]
    pub google_translate_url: String,

    /// Per-request timeout in seconds.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "google-timeout-secs",
            env = "GOOGLE_TIMEOUT_SECS",
            default_value_t = DEFAULT_TIMEOUT_SECS
        )
    )]
    #[serde(default = "default_timeout_secs")]
    pub google_timeout_secs: u64,
}

fn default_language_url() -> String {
    DEFAULT_LANGUAGE_URL.to_owned()
}

fn default_vision_url() -> String {
    DEFAULT_VISION_URL.to_owned()
}

fn default_translate_url() -> String {
    DEFAULT_TRANSLATE_URL.to_owned()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl GoogleCloudConfig {
    /// Create a configuration with the default endpoints.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            google_api_key: api_key.into(),
            google_language_url: default_language_url(),
            google_vision_url: default_vision_url(),
            google_translate_url: default_translate_url(),
            google_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Point every API at the same base URL (useful for emulators).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.google_language_url = base_url.clone();
        self.google_vision_url = base_url.clone();
        self.google_translate_url = base_url;
        self
    }

    /// Set the per-request timeout in seconds.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.google_timeout_secs = secs;
        self
    }

    /// Returns the per-request timeout.
    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.google_timeout_secs)
    }

    /// Validates the configuration and parses the endpoint URLs.
    pub fn validate(&self) -> Result<Endpoints> {
        if self.google_api_key.trim().is_empty() {
            return Err(Error::configuration().with_message("Google API key must not be empty"));
        }
        if self.google_timeout_secs == 0 {
            return Err(Error::configuration().with_message("timeout must be greater than zero"));
        }

        Ok(Endpoints {
            language: parse_base(&self.google_language_url)?,
            vision: parse_base(&self.google_vision_url)?,
            translate: parse_base(&self.google_translate_url)?,
        })
    }
}

/// Parsed base URLs of the three APIs.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub language: Url,
    pub vision: Url,
    pub translate: Url,
}

/// Parses a base URL, making sure it ends with a slash so relative joins
/// append instead of replacing the last path segment.
fn parse_base(raw: &str) -> Result<Url> {
    let normalized = if raw.ends_with('/') {
        raw.to_owned()
    } else {
        format!("{raw}/")
    };

    Url::parse(&normalized).map_err(|e| {
        Error::configuration()
            .with_message(format!("invalid endpoint URL '{raw}'"))
            .with_source(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_defaults() {
        let endpoints = GoogleCloudConfig::new("key").validate().unwrap();
        assert_eq!(endpoints.language.host_str(), Some("language.googleapis.com"));
        assert!(endpoints.translate.path().ends_with("/v2/"));
    }

    #[test]
    fn validate_rejects_empty_key() {
        assert!(GoogleCloudConfig::new(" ").validate().is_err());
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let endpoints = GoogleCloudConfig::new("key")
            .with_base_url("http://localhost:9090/api")
            .validate()
            .unwrap();
        let joined = endpoints.vision.join("./images:annotate").unwrap();
        assert_eq!(joined.as_str(), "http://localhost:9090/api/images:annotate");
    }
}
