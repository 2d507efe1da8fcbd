//! Analysis service with observability.
//!
//! [`AnalysisService`] wraps any [`AnalysisProvider`] and adds structured
//! logging around every call, plus typed accessors that check the response
//! shape for each capability.

use std::fmt;
use std::sync::Arc;

use jiff::Timestamp;
use sentio_core::types::{Entity, SafeSearchAnnotation, SentimentScore};
use sentio_core::Result;

use crate::TRACING_TARGET;
use crate::request::{AnalysisRequest, Capability};
use crate::response::AnalysisResponse;

/// Trait implemented by analysis backends.
///
/// Each call is a single remote request; implementations must not retry
/// internally or cache results.
#[async_trait::async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Run one capability against the request.
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        capability: Capability,
    ) -> Result<AnalysisResponse>;
}

/// Cloneable analysis client shared across invocations.
#[derive(Clone)]
pub struct AnalysisService {
    provider: Arc<dyn AnalysisProvider>,
}

impl fmt::Debug for AnalysisService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisService").finish_non_exhaustive()
    }
}

impl AnalysisService {
    /// Create a new analysis service from a provider.
    pub fn new<P>(provider: P) -> Self
    where
        P: AnalysisProvider + 'static,
    {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Run one capability against the request.
    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
        capability: Capability,
    ) -> Result<AnalysisResponse> {
        let started_at = Timestamp::now();

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id(),
            capability = %capability,
            kind = %request.kind(),
            source_uri = request.source_uri(),
            "Processing analysis request"
        );

        let result = self.provider.analyze(request, capability).await;
        let elapsed = Timestamp::now().duration_since(started_at);

        match &result {
            Ok(response) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id(),
                    capability = %response.capability(),
                    elapsed_ms = elapsed.as_millis(),
                    "Analysis request successful"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id(),
                    capability = %capability,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Analysis request failed"
                );
            }
        }

        result
    }

    /// Document-level sentiment.
    pub async fn analyze_sentiment(&self, request: &AnalysisRequest) -> Result<SentimentScore> {
        self.analyze(request, Capability::Sentiment)
            .await?
            .into_sentiment()
    }

    /// Entities with per-entity sentiment, in backend order.
    pub async fn analyze_entity_sentiment(&self, request: &AnalysisRequest) -> Result<Vec<Entity>> {
        self.analyze(request, Capability::EntitySentiment)
            .await?
            .into_entities()
    }

    /// Full text detected in an image.
    pub async fn detect_text(&self, request: &AnalysisRequest) -> Result<String> {
        self.analyze(request, Capability::TextDetection)
            .await?
            .into_text()
    }

    /// Safe-search likelihoods for an image.
    pub async fn detect_safe_search(
        &self,
        request: &AnalysisRequest,
    ) -> Result<SafeSearchAnnotation> {
        self.analyze(request, Capability::SafeSearch)
            .await?
            .into_safe_search()
    }

    /// Language code of the request's inline text.
    pub async fn detect_language(&self, request: &AnalysisRequest) -> Result<String> {
        self.analyze(request, Capability::LanguageDetection)
            .await?
            .into_language()
    }
}
