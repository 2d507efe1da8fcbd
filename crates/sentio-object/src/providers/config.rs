//! Storage backend selection.

#[cfg(feature = "config")]
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use super::s3::default_region;
use super::{
    GcsCredentials, GcsProvider, MemoryProvider, S3Credentials, S3Provider, StorageProvider,
};
use crate::TRACING_TARGET;
use crate::client::ObjectStoreClient;
use crate::error::Result;

/// Object storage backend.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, AsRefStr, Serialize, Deserialize,
)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StorageBackend {
    /// Google Cloud Storage.
    #[default]
    Gcs,
    /// Amazon S3 or any S3-compatible service.
    S3,
    /// Process memory; contents are lost on exit.
    Memory,
}

/// Storage connection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct StorageConfig {
    /// Object storage backend
    #[cfg_attr(
        feature = "config",
        arg(long = "storage-backend", env = "STORAGE_BACKEND", value_enum, default_value_t = StorageBackend::Gcs)
    )]
    #[serde(default)]
    pub storage_backend: StorageBackend,

    /// Custom endpoint URL (fake GCS server, MinIO, ...)
    #[cfg_attr(
        feature = "config",
        arg(long = "storage-endpoint", env = "STORAGE_ENDPOINT")
    )]
    #[serde(default)]
    pub storage_endpoint: Option<String>,

    /// Path to a GCS service account key file
    #[cfg_attr(
        feature = "config",
        arg(long = "gcs-service-account-path", env = "GOOGLE_APPLICATION_CREDENTIALS")
    )]
    #[serde(default)]
    pub gcs_service_account_path: Option<String>,

    /// S3 region
    #[cfg_attr(feature = "config", arg(long = "s3-region", env = "AWS_REGION"))]
    #[serde(default)]
    pub s3_region: Option<String>,

    /// S3 access key ID
    #[cfg_attr(
        feature = "config",
        arg(long = "s3-access-key-id", env = "AWS_ACCESS_KEY_ID")
    )]
    #[serde(default)]
    pub s3_access_key_id: Option<String>,

    /// S3 secret access key
    #[cfg_attr(
        feature = "config",
        arg(long = "s3-secret-access-key", env = "AWS_SECRET_ACCESS_KEY")
    )]
    #[serde(default)]
    pub s3_secret_access_key: Option<String>,
}

impl StorageConfig {
    /// Creates a configuration for the given backend with no overrides.
    pub fn new(backend: StorageBackend) -> Self {
        Self {
            storage_backend: backend,
            ..Default::default()
        }
    }

    /// Connects the configured backend to `bucket`.
    pub fn connect(&self, bucket: &str) -> Result<ObjectStoreClient> {
        let client = match self.storage_backend {
            StorageBackend::Gcs => GcsProvider::connect(&GcsCredentials {
                bucket: bucket.to_owned(),
                service_account_path: self.gcs_service_account_path.clone(),
                endpoint: self.storage_endpoint.clone(),
            })?,
            StorageBackend::S3 => S3Provider::connect(&S3Credentials {
                bucket: bucket.to_owned(),
                region: self.s3_region.clone().unwrap_or_else(default_region),
                endpoint: self.storage_endpoint.clone(),
                access_key_id: self.s3_access_key_id.clone(),
                secret_access_key: self.s3_secret_access_key.clone(),
            })?,
            StorageBackend::Memory => MemoryProvider::connect(&bucket.to_owned())?,
        };

        tracing::info!(
            target: TRACING_TARGET,
            backend = %self.storage_backend,
            bucket,
            "Object storage client created"
        );

        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names() {
        assert_eq!(StorageBackend::Gcs.to_string(), "gcs");
        assert_eq!(StorageBackend::default(), StorageBackend::Gcs);
        let backend: StorageBackend = serde_json::from_str(r#""memory""#).unwrap();
        assert_eq!(backend, StorageBackend::Memory);
    }

    #[tokio::test]
    async fn connect_memory_backend() {
        let client = StorageConfig::new(StorageBackend::Memory)
            .connect("results")
            .unwrap();
        assert_eq!(client.bucket(), "results");
        client.verify_reachable().await.unwrap();
    }
}
