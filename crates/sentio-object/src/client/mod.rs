//! Unified object-store client backed by [`object_store::ObjectStore`].
//!
//! [`ObjectStoreClient`] is a thin, cloneable wrapper around
//! `Arc<dyn ObjectStore>` bound to one bucket. Every public method is
//! instrumented with [`tracing`].

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use object_store::path::Path;
use object_store::{ObjectMeta, ObjectStore, PutMode, PutOptions, PutPayload};

use crate::TRACING_TARGET;
use crate::error::{Error, from_object_store};

mod get_output;
mod put_output;

pub use get_output::GetOutput;
pub use put_output::PutOutput;

/// Cloneable handle to an [`ObjectStore`] backend bound to one bucket.
///
/// All methods accept human-readable string keys and convert them to
/// [`object_store::path::Path`] internally.
#[derive(Clone)]
pub struct ObjectStoreClient {
    store: Arc<dyn ObjectStore>,
    bucket: Arc<str>,
}

impl fmt::Debug for ObjectStoreClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStoreClient")
            .field("bucket", &self.bucket)
            .field("store", &self.store.to_string())
            .finish()
    }
}

impl ObjectStoreClient {
    /// Wrap a concrete [`ObjectStore`] implementation serving `bucket`.
    pub fn new(store: impl ObjectStore, bucket: impl Into<Arc<str>>) -> Self {
        Self {
            store: Arc::new(store),
            bucket: bucket.into(),
        }
    }

    /// Returns the bucket this client writes to.
    #[inline]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Verify that the backing store is reachable.
    ///
    /// Issues a HEAD for a probe key; a not-found response is treated as
    /// success (the bucket exists), any other error is propagated.
    #[tracing::instrument(name = "object.verify", target = TRACING_TARGET, skip(self), fields(bucket = %self.bucket))]
    pub async fn verify_reachable(&self) -> Result<(), Error> {
        let path = Path::from("_sentio_verify_probe");
        match self.store.head(&path).await {
            Ok(_) => Ok(()),
            Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(from_object_store(e)),
        }
    }

    /// Retrieve the raw bytes, content-type, and metadata stored at `key`.
    #[tracing::instrument(name = "object.get", target = TRACING_TARGET, skip(self), fields(bucket = %self.bucket))]
    pub async fn get(&self, key: &str) -> Result<GetOutput, Error> {
        let path = Path::from(key);
        let result = self.store.get(&path).await.map_err(from_object_store)?;
        let meta = result.meta.clone();
        let content_type = result
            .attributes
            .get(&object_store::Attribute::ContentType)
            .map(|v| v.to_string());
        let data = result.bytes().await.map_err(from_object_store)?;
        Ok(GetOutput {
            data,
            content_type,
            meta,
        })
    }

    /// Upload `data` to `key`, replacing any existing object.
    pub async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> Result<PutOutput, Error> {
        self.put_opts(key, data, PutMode::Overwrite, content_type)
            .await
    }

    /// Upload `data` to `key` with the specified [`PutMode`].
    #[tracing::instrument(
        name = "object.put_opts",
        target = TRACING_TARGET,
        skip(self, data, mode),
        fields(bucket = %self.bucket, size = data.len())
    )]
    pub async fn put_opts(
        &self,
        key: &str,
        data: Bytes,
        mode: PutMode,
        content_type: Option<&str>,
    ) -> Result<PutOutput, Error> {
        let path = Path::from(key);
        let payload = PutPayload::from(data);
        let mut opts = PutOptions {
            mode,
            ..Default::default()
        };
        if let Some(ct) = content_type {
            opts.attributes
                .insert(object_store::Attribute::ContentType, ct.to_string().into());
        }
        let result = self
            .store
            .put_opts(&path, payload, opts)
            .await
            .map_err(from_object_store)?;

        tracing::debug!(
            target: TRACING_TARGET,
            bucket = %self.bucket,
            key,
            e_tag = result.e_tag.as_deref(),
            "Object written"
        );

        Ok(result.into())
    }

    /// Get object metadata without downloading the body.
    #[tracing::instrument(name = "object.head", target = TRACING_TARGET, skip(self), fields(bucket = %self.bucket))]
    pub async fn head(&self, key: &str) -> Result<ObjectMeta, Error> {
        let path = Path::from(key);
        self.store.head(&path).await.map_err(from_object_store)
    }

    /// Delete the object at `key`.
    #[tracing::instrument(name = "object.delete", target = TRACING_TARGET, skip(self), fields(bucket = %self.bucket))]
    pub async fn delete(&self, key: &str) -> Result<(), Error> {
        let path = Path::from(key);
        self.store.delete(&path).await.map_err(from_object_store)
    }
}

#[cfg(test)]
mod tests {
    use object_store::memory::InMemory;

    use super::*;

    fn test_client() -> ObjectStoreClient {
        ObjectStoreClient::new(InMemory::new(), "results")
    }

    #[tokio::test]
    async fn put_and_get() {
        let client = test_client();
        let data = Bytes::from("hello world");
        client
            .put("test.txt", data.clone(), Some("text/plain"))
            .await
            .unwrap();

        let result = client.get("test.txt").await.unwrap();
        assert_eq!(result.data, data);
        assert_eq!(result.text(), Some("hello world"));
        assert_eq!(result.content_type.as_deref(), Some("text/plain"));
    }

    #[tokio::test]
    async fn put_overwrites() {
        let client = test_client();
        client.put("a.txt", Bytes::from("first"), None).await.unwrap();
        client.put("a.txt", Bytes::from("second"), None).await.unwrap();

        let result = client.get("a.txt").await.unwrap();
        assert_eq!(result.data, Bytes::from("second"));
    }

    #[tokio::test]
    async fn keys_with_spaces_and_dots() {
        let client = test_client();
        client
            .put("my doc.v2.txtProcessed.txt", Bytes::from("x"), None)
            .await
            .unwrap();

        let meta = client.head("my doc.v2.txtProcessed.txt").await.unwrap();
        assert_eq!(meta.size, 1);
    }

    #[tokio::test]
    async fn head_not_found() {
        let client = test_client();
        let err = client.head("missing").await.unwrap_err();
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn delete() {
        let client = test_client();
        client.put("del.bin", Bytes::from("x"), None).await.unwrap();
        client.delete("del.bin").await.unwrap();

        assert!(client.get("del.bin").await.is_err());
    }

    #[tokio::test]
    async fn put_create_only() {
        let client = test_client();
        client
            .put_opts("unique.bin", Bytes::from("first"), PutMode::Create, None)
            .await
            .unwrap();

        let err = client
            .put_opts("unique.bin", Bytes::from("second"), PutMode::Create, None)
            .await
            .unwrap_err();
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn verify_reachable() {
        let client = test_client();
        client.verify_reachable().await.unwrap();
        assert_eq!(client.bucket(), "results");
    }
}
