//! Object storage providers and backend selection.

mod config;
mod gcs;
mod memory;
mod s3;

pub use config::{StorageBackend, StorageConfig};
pub use gcs::{GcsCredentials, GcsProvider};
pub use memory::MemoryProvider;
pub use s3::{S3Credentials, S3Provider};

use crate::client::ObjectStoreClient;
use crate::error::Result;

/// Factory for object storage clients of one backend.
pub trait StorageProvider {
    /// Strongly-typed credentials for this provider.
    type Credentials;

    /// Unique identifier (e.g. "gcs", "s3").
    const ID: &'static str;

    /// Build a client bound to the bucket named in the credentials.
    fn connect(creds: &Self::Credentials) -> Result<ObjectStoreClient>;
}
