//! Pipeline configuration.

use std::sync::Arc;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::error::{PipelineError, Result};

/// Default maximum concurrent handler invocations per worker.
pub const DEFAULT_MAX_CONCURRENT_JOBS: usize = 10;

/// Default bucket analysis artifacts are written to.
pub const DEFAULT_RESULTS_BUCKET: &str = "sentio-results";

/// Default topic carrying text pipeline results.
pub const DEFAULT_TEXT_TOPIC: &str = "TEXT_RESULTS";

/// Default topic carrying image pipeline results.
pub const DEFAULT_IMAGE_TOPIC: &str = "IMAGE_RESULTS";

/// Default stream carrying text upload events.
pub const DEFAULT_TEXT_UPLOADS: &str = "TEXT_UPLOADS";

/// Default stream carrying image upload events.
pub const DEFAULT_IMAGE_UPLOADS: &str = "IMAGE_UPLOADS";

/// Default prefix of durable consumer names.
pub const DEFAULT_CONSUMER_PREFIX: &str = "sentio";

/// Bucket, topic and stream names plus worker behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct PipelineConfig {
    /// Bucket analysis artifacts are written to.
    #[cfg_attr(
        feature = "config",
        arg(long = "results-bucket", env = "RESULTS_BUCKET", default_value = DEFAULT_RESULTS_BUCKET)
    )]
    #[serde(default = "default_results_bucket")]
    pub results_bucket: String,

    /// Only accept text uploads from this bucket.
    #[cfg_attr(feature = "config", arg(long = "text-bucket", env = "TEXT_BUCKET"))]
    #[serde(default)]
    pub text_bucket: Option<String>,

    /// Only accept image uploads from this bucket.
    #[cfg_attr(feature = "config", arg(long = "image-bucket", env = "IMAGE_BUCKET"))]
    #[serde(default)]
    pub image_bucket: Option<String>,

    /// Topic carrying text pipeline results.
    #[cfg_attr(
        feature = "config",
        arg(long = "text-topic", env = "TEXT_TOPIC", default_value = DEFAULT_TEXT_TOPIC)
    )]
    #[serde(default = "default_text_topic")]
    pub text_topic: String,

    /// Topic carrying image pipeline results.
    #[cfg_attr(
        feature = "config",
        arg(long = "image-topic", env = "IMAGE_TOPIC", default_value = DEFAULT_IMAGE_TOPIC)
    )]
    #[serde(default = "default_image_topic")]
    pub image_topic: String,

    /// Stream carrying text upload events.
    #[cfg_attr(
        feature = "config",
        arg(long = "text-uploads-stream", env = "TEXT_UPLOADS_STREAM", default_value = DEFAULT_TEXT_UPLOADS)
    )]
    #[serde(default = "default_text_uploads")]
    pub text_uploads_stream: String,

    /// Stream carrying image upload events.
    #[cfg_attr(
        feature = "config",
        arg(long = "image-uploads-stream", env = "IMAGE_UPLOADS_STREAM", default_value = DEFAULT_IMAGE_UPLOADS)
    )]
    #[serde(default = "default_image_uploads")]
    pub image_uploads_stream: String,

    /// Prefix of durable consumer names shared by all instances.
    #[cfg_attr(
        feature = "config",
        arg(long = "consumer-prefix", env = "CONSUMER_PREFIX", default_value = DEFAULT_CONSUMER_PREFIX)
    )]
    #[serde(default = "default_consumer_prefix")]
    pub consumer_prefix: String,

    /// Maximum concurrent handler invocations per worker.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "max-concurrent-jobs",
            env = "PIPELINE_MAX_CONCURRENT_JOBS",
            default_value_t = DEFAULT_MAX_CONCURRENT_JOBS
        )
    )]
    #[serde(default = "default_max_concurrent_jobs")]
    pub max_concurrent_jobs: usize,
}

fn default_results_bucket() -> String {
    DEFAULT_RESULTS_BUCKET.to_owned()
}

fn default_text_topic() -> String {
    DEFAULT_TEXT_TOPIC.to_owned()
}

fn default_image_topic() -> String {
    DEFAULT_IMAGE_TOPIC.to_owned()
}

fn default_text_uploads() -> String {
    DEFAULT_TEXT_UPLOADS.to_owned()
}

fn default_image_uploads() -> String {
    DEFAULT_IMAGE_UPLOADS.to_owned()
}

fn default_consumer_prefix() -> String {
    DEFAULT_CONSUMER_PREFIX.to_owned()
}

fn default_max_concurrent_jobs() -> usize {
    DEFAULT_MAX_CONCURRENT_JOBS
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            results_bucket: default_results_bucket(),
            text_bucket: None,
            image_bucket: None,
            text_topic: default_text_topic(),
            image_topic: default_image_topic(),
            text_uploads_stream: default_text_uploads(),
            image_uploads_stream: default_image_uploads(),
            consumer_prefix: default_consumer_prefix(),
            max_concurrent_jobs: default_max_concurrent_jobs(),
        }
    }
}

impl PipelineConfig {
    /// Creates a new pipeline configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the results bucket.
    #[must_use]
    pub fn with_results_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.results_bucket = bucket.into();
        self
    }

    /// Restricts text uploads to one bucket.
    #[must_use]
    pub fn with_text_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.text_bucket = Some(bucket.into());
        self
    }

    /// Restricts image uploads to one bucket.
    #[must_use]
    pub fn with_image_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.image_bucket = Some(bucket.into());
        self
    }

    /// Sets the maximum concurrent jobs.
    #[must_use]
    pub fn with_max_concurrent_jobs(mut self, max_concurrent_jobs: usize) -> Self {
        self.max_concurrent_jobs = max_concurrent_jobs;
        self
    }

    /// Returns the durable consumer name of one worker.
    pub fn consumer_name(&self, pipeline: &str, stage: &str) -> String {
        format!("{}-{pipeline}-{stage}", self.consumer_prefix)
    }

    /// Creates a semaphore for limiting concurrent job processing.
    pub fn create_semaphore(&self) -> Arc<Semaphore> {
        Arc::new(Semaphore::new(self.max_concurrent_jobs))
    }

    /// Validates names and limits.
    pub fn validate(&self) -> Result<()> {
        let names = [
            ("results bucket", self.results_bucket.as_str()),
            ("text topic", self.text_topic.as_str()),
            ("image topic", self.image_topic.as_str()),
            ("text uploads stream", self.text_uploads_stream.as_str()),
            ("image uploads stream", self.image_uploads_stream.as_str()),
            ("consumer prefix", self.consumer_prefix.as_str()),
        ];

        for (field, value) in names {
            if value.trim().is_empty() {
                return Err(PipelineError::validation(format!("{field} must not be empty")));
            }
        }

        // Stream names double as subjects and may not contain these.
        for (field, value) in &names[1..] {
            if value.contains(['.', '*', '>', ' ']) {
                return Err(PipelineError::validation(format!(
                    "{field} '{value}' must not contain '.', '*', '>' or spaces"
                )));
            }
        }

        if self.max_concurrent_jobs == 0 {
            return Err(PipelineError::validation(
                "max concurrent jobs must be greater than zero",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PipelineConfig::new();
        assert_eq!(config.text_topic, "TEXT_RESULTS");
        assert_eq!(config.image_topic, "IMAGE_RESULTS");
        assert_eq!(config.consumer_name("text", "ingest"), "sentio-text-ingest");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation() {
        assert!(
            PipelineConfig::new()
                .with_max_concurrent_jobs(0)
                .validate()
                .is_err()
        );

        let config = PipelineConfig {
            text_topic: "text.results".to_owned(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PipelineConfig::new().with_results_bucket(" ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn deserialize_with_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"results_bucket":"out","text_bucket":"in"}"#).unwrap();
        assert_eq!(config.results_bucket, "out");
        assert_eq!(config.text_bucket.as_deref(), Some("in"));
        assert_eq!(config.max_concurrent_jobs, DEFAULT_MAX_CONCURRENT_JOBS);
    }
}
