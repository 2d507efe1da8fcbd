//! S3-compatible provider using [`object_store::aws::AmazonS3Builder`].
//!
//! Works with AWS S3, MinIO, and any S3-compatible service.

use object_store::aws::AmazonS3Builder;
use serde::{Deserialize, Serialize};

use super::StorageProvider;
use crate::client::ObjectStoreClient;
use crate::error::{Error, Result};

/// Typed credentials for S3-compatible provider.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Credentials {
    /// S3 bucket name.
    pub bucket: String,
    /// AWS region (defaults to `us-east-1`).
    #[serde(default = "default_region")]
    pub region: String,
    /// Endpoint URL (e.g. `http://localhost:9000` for MinIO).
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Access key ID for static credentials.
    #[serde(default)]
    pub access_key_id: Option<String>,
    /// Secret access key for static credentials.
    #[serde(default)]
    pub secret_access_key: Option<String>,
}

pub(crate) fn default_region() -> String {
    "us-east-1".to_string()
}

/// S3-backed object storage.
#[derive(Debug, Clone, Copy)]
pub struct S3Provider;

impl StorageProvider for S3Provider {
    type Credentials = S3Credentials;

    const ID: &'static str = "s3";

    fn connect(creds: &Self::Credentials) -> Result<ObjectStoreClient> {
        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(&creds.bucket)
            .with_region(&creds.region);

        if let Some(endpoint) = &creds.endpoint {
            builder = builder.with_endpoint(endpoint);
            if endpoint.starts_with("http://") {
                builder = builder.with_allow_http(true);
            }
        }

        if let Some(access_key) = &creds.access_key_id {
            builder = builder.with_access_key_id(access_key);
        }

        if let Some(secret_key) = &creds.secret_access_key {
            builder = builder.with_secret_access_key(secret_key);
        }

        let store = builder
            .build()
            .map_err(|e| Error::connection(e.to_string(), Self::ID).with_source(e))?;

        Ok(ObjectStoreClient::new(store, creds.bucket.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_with_static_credentials() {
        let client = S3Provider::connect(&S3Credentials {
            bucket: "results".to_owned(),
            region: default_region(),
            endpoint: Some("http://localhost:9000".to_owned()),
            access_key_id: Some("minio".to_owned()),
            secret_access_key: Some("minio123".to_owned()),
        })
        .unwrap();
        assert_eq!(client.bucket(), "results");
    }
}
