//! Convenient re-exports for common use.

pub use crate::error::{BoxedError, Error, ErrorKind, Result};
pub use crate::types::{
    ClassificationBucket, Entity, FileReference, ImageResult, Likelihood, PersistedArtifact,
    ResourceState, ResultPayload, SafeSearchAnnotation, SentimentScore, StorageEvent, TextResult,
};
