//! Pipeline state shared by handlers and workers.

use std::fmt;
use std::sync::Arc;

use sentio_inference::AnalysisService;
use sentio_object::ObjectStoreClient;

use crate::config::PipelineConfig;
use crate::publisher::ResultPublisher;

/// Application state for pipeline workers.
///
/// Holds the collaborators every invocation needs. Cloning is cheap; all
/// clients share their connections.
#[derive(Clone)]
pub struct PipelineState {
    /// Analysis backend client.
    pub analysis: AnalysisService,
    /// Client for the results bucket.
    pub storage: ObjectStoreClient,
    /// Sink for assembled result payloads.
    pub publisher: Arc<dyn ResultPublisher>,
    /// Pipeline configuration.
    pub config: PipelineConfig,
}

impl PipelineState {
    /// Creates a new pipeline state.
    pub fn new(
        analysis: AnalysisService,
        storage: ObjectStoreClient,
        publisher: impl ResultPublisher + 'static,
        config: PipelineConfig,
    ) -> Self {
        Self {
            analysis,
            storage,
            publisher: Arc::new(publisher),
            config,
        }
    }
}

impl fmt::Debug for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineState")
            .field("analysis", &self.analysis)
            .field("storage", &self.storage)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
