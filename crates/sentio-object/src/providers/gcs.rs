//! Google Cloud Storage provider using [`object_store::gcp::GoogleCloudStorageBuilder`].

use object_store::gcp::GoogleCloudStorageBuilder;
use serde::{Deserialize, Serialize};

use super::StorageProvider;
use crate::client::ObjectStoreClient;
use crate::error::{Error, Result};

/// Typed credentials for Google Cloud Storage.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GcsCredentials {
    /// GCS bucket name.
    pub bucket: String,
    /// Path to a JSON service account key file.
    #[serde(default)]
    pub service_account_path: Option<String>,
    /// Custom endpoint URL (for testing with a fake GCS server).
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// Google Cloud Storage-backed object storage.
#[derive(Debug, Clone, Copy)]
pub struct GcsProvider;

impl StorageProvider for GcsProvider {
    type Credentials = GcsCredentials;

    const ID: &'static str = "gcs";

    fn connect(creds: &Self::Credentials) -> Result<ObjectStoreClient> {
        // Falls back to application default credentials when no key file is set.
        let mut builder = GoogleCloudStorageBuilder::from_env().with_bucket_name(&creds.bucket);

        if let Some(key_path) = &creds.service_account_path {
            builder = builder.with_service_account_path(key_path);
        }

        if let Some(endpoint) = &creds.endpoint {
            builder = builder.with_url(endpoint);
        }

        let store = builder
            .build()
            .map_err(|e| Error::connection(e.to_string(), Self::ID).with_source(e))?;

        Ok(ObjectStoreClient::new(store, creds.bucket.as_str()))
    }
}
