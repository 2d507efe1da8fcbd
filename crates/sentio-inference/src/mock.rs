//! In-process analysis backend for tests.
//!
//! [`MockProvider`] answers every capability with a configurable canned
//! response, can be told to fail individual capabilities, and records every
//! call it receives.
//!
//! # Feature Flag
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! sentio-inference = { workspace = true, features = ["test-utils"] }
//! ```

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use sentio_core::types::{Entity, SafeSearchAnnotation, SentimentScore};
use sentio_core::{Error, Result};

use crate::request::{AnalysisRequest, Capability};
use crate::response::{
    AnalysisResponse, EntitySentimentAnalysis, LanguageDetection, SentimentAnalysis,
    TextDetection,
};
use crate::service::{AnalysisProvider, AnalysisService};

/// A call received by the mock provider.
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    /// Capability that was requested.
    pub capability: Capability,
    /// Request that was sent.
    pub request: AnalysisRequest,
}

#[derive(Debug, Default)]
struct MockState {
    sentiment: SentimentScore,
    entities: Vec<Entity>,
    text: String,
    safe_search: SafeSearchAnnotation,
    language: String,
    failing: HashSet<Capability>,
    calls: Vec<MockCall>,
}

/// Analysis backend returning canned responses.
///
/// Clones share state, so a test can keep one handle for assertions while
/// the pipeline owns another.
#[derive(Debug, Clone)]
pub struct MockProvider {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    /// Creates a provider with neutral sentiment, no entities, empty text and
    /// `"en"` as the detected language.
    pub fn new() -> Self {
        let state = MockState {
            language: "en".to_owned(),
            ..Default::default()
        };

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Sets the document sentiment response.
    #[must_use]
    pub fn with_sentiment(self, score: f32, magnitude: f32) -> Self {
        self.lock().sentiment = SentimentScore { score, magnitude };
        self
    }

    /// Sets the entity sentiment response.
    #[must_use]
    pub fn with_entities(self, entities: Vec<Entity>) -> Self {
        self.lock().entities = entities;
        self
    }

    /// Sets the detected text response.
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.lock().text = text.into();
        self
    }

    /// Sets the safe-search response.
    #[must_use]
    pub fn with_safe_search(self, annotation: SafeSearchAnnotation) -> Self {
        self.lock().safe_search = annotation;
        self
    }

    /// Sets the detected language response.
    #[must_use]
    pub fn with_language(self, language: impl Into<String>) -> Self {
        self.lock().language = language.into();
        self
    }

    /// Makes every call for `capability` fail with a backend error.
    #[must_use]
    pub fn failing(self, capability: Capability) -> Self {
        self.lock().failing.insert(capability);
        self
    }

    /// Returns every call received so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    /// Returns the capabilities requested so far, in order.
    pub fn capabilities(&self) -> Vec<Capability> {
        self.lock().calls.iter().map(|c| c.capability).collect()
    }

    /// Wraps a clone of this provider in an [`AnalysisService`].
    pub fn service(&self) -> AnalysisService {
        AnalysisService::new(self.clone())
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the recorded calls from others.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait::async_trait]
impl AnalysisProvider for MockProvider {
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        capability: Capability,
    ) -> Result<AnalysisResponse> {
        let mut state = self.lock();
        state.calls.push(MockCall {
            capability,
            request: request.clone(),
        });

        if state.failing.contains(&capability) {
            return Err(Error::backend().with_message(format!("mock {capability} failure")));
        }

        let response = match capability {
            Capability::Sentiment => AnalysisResponse::Sentiment(SentimentAnalysis {
                document_sentiment: state.sentiment,
                language: Some(state.language.clone()),
            }),
            Capability::EntitySentiment => {
                AnalysisResponse::EntitySentiment(EntitySentimentAnalysis {
                    entities: state.entities.clone(),
                })
            }
            Capability::TextDetection => AnalysisResponse::TextDetection(TextDetection {
                text: state.text.clone(),
                locale: None,
            }),
            Capability::SafeSearch => AnalysisResponse::SafeSearch(state.safe_search),
            Capability::LanguageDetection => {
                AnalysisResponse::LanguageDetection(LanguageDetection {
                    language: state.language.clone(),
                    confidence: Some(1.0),
                })
            }
        };

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use sentio_core::ErrorKind;

    use super::*;

    #[tokio::test]
    async fn canned_responses_and_calls() {
        let provider = MockProvider::new()
            .with_sentiment(0.6, 2.0)
            .with_entities(vec![Entity::new(
                "Acme",
                SentimentScore {
                    score: 0.6,
                    magnitude: 2.0,
                },
            )]);
        let service = provider.service();

        let request = AnalysisRequest::from_text("Acme is great");
        let score = service.analyze_sentiment(&request).await.unwrap();
        assert_eq!(score.score, 0.6);

        let entities = service.analyze_entity_sentiment(&request).await.unwrap();
        assert_eq!(entities.len(), 1);

        assert_eq!(
            provider.capabilities(),
            [Capability::Sentiment, Capability::EntitySentiment]
        );
    }

    #[tokio::test]
    async fn failing_capability() {
        let provider = MockProvider::new().failing(Capability::SafeSearch);
        let service = provider.service();

        let request = AnalysisRequest::from_text("x");
        let error = service.detect_safe_search(&request).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Backend);
        assert_eq!(provider.calls().len(), 1);
    }
}
