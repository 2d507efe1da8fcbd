//! Pipeline kinds.
//!
//! A [`Pipeline`] supplies everything that differs between the text and the
//! image pipeline: which analysis calls to make, where the result goes, and
//! how the consumed payload is turned into an artifact. The handlers are
//! generic over it.

mod image;
mod text;

use std::future::Future;

use sentio_core::types::{FileReference, PersistedArtifact, ResultPayload};
use sentio_inference::{AnalysisKind, AnalysisService};
use serde::de::DeserializeOwned;

pub use self::image::ImagePipeline;
pub use self::text::TextPipeline;
use crate::config::PipelineConfig;
use crate::error::Result;

/// One analysis pipeline.
pub trait Pipeline: Send + Sync + 'static {
    /// Kind of content the pipeline analyzes.
    const KIND: AnalysisKind;

    /// Short name used in logs and consumer names.
    const NAME: &'static str;

    /// Suffix appended to the source object name to form the artifact key.
    const ARTIFACT_SUFFIX: &'static str;

    /// Decoded, not yet validated consume-side payload.
    type Candidate: DeserializeOwned + Send + Sync + 'static;

    /// Topic the ingest stage publishes to.
    fn topic(config: &PipelineConfig) -> &str;

    /// Stream carrying the upload events of this pipeline.
    fn uploads_stream(config: &PipelineConfig) -> &str;

    /// Bucket uploads must come from, when restricted.
    fn source_bucket(config: &PipelineConfig) -> Option<&str>;

    /// Runs the analysis calls for one stored object and assembles the payload.
    fn analyze(
        analysis: &AnalysisService,
        file: &FileReference,
    ) -> impl Future<Output = Result<ResultPayload>> + Send;

    /// Validates a consumed payload and renders the artifact.
    fn render(candidate: Self::Candidate) -> Result<PersistedArtifact>;
}
