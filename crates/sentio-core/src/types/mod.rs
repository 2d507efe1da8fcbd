//! Data model shared by the ingest and consume stages.
//!
//! - [`FileReference`] and [`StorageEvent`]: what triggered an invocation
//! - [`SentimentScore`] and [`Entity`]: values produced by the analysis backend
//! - [`ResultPayload`]: the canonical message body handed between stages
//! - [`ClassificationBucket`] and [`PersistedArtifact`]: consume-side output
//! - [`SafeSearchAnnotation`]: best-effort image safety observation

mod artifact;
mod file;
mod payload;
mod safe_search;
mod sentiment;

pub use artifact::PersistedArtifact;
pub use file::{FileReference, ResourceState, StorageEvent};
pub use payload::{
    ImageResult, ImageResultCandidate, ResultPayload, TextResult, TextResultCandidate,
};
pub use safe_search::{Likelihood, SafeSearchAnnotation};
pub use sentiment::{ClassificationBucket, Entity, SentimentScore};
