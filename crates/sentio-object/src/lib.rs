#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for object storage operations.
pub const TRACING_TARGET: &str = "sentio_object";

pub mod client;
mod error;
/// Object storage provider factories and backend selection.
pub mod providers;

pub use client::{GetOutput, ObjectStoreClient, PutOutput};
pub use error::{Error, Result};
pub use object_store::PutMode;
pub use providers::{StorageBackend, StorageConfig};
