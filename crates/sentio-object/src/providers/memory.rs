//! In-process provider using [`object_store::memory::InMemory`].

use object_store::memory::InMemory;

use super::StorageProvider;
use crate::client::ObjectStoreClient;
use crate::error::Result;

/// Volatile storage kept in process memory, for local runs and tests.
#[derive(Debug, Clone, Copy)]
pub struct MemoryProvider;

impl MemoryProvider {
    /// Creates an empty in-memory bucket.
    pub fn bucket(bucket: &str) -> ObjectStoreClient {
        ObjectStoreClient::new(InMemory::new(), bucket)
    }
}

impl StorageProvider for MemoryProvider {
    type Credentials = String;

    const ID: &'static str = "memory";

    fn connect(bucket: &Self::Credentials) -> Result<ObjectStoreClient> {
        Ok(Self::bucket(bucket))
    }
}
