//! Analysis response types.

use sentio_core::types::{Entity, SafeSearchAnnotation, SentimentScore};
use sentio_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::request::Capability;

/// Response of a sentiment analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentAnalysis {
    /// Sentiment of the whole document.
    pub document_sentiment: SentimentScore,
    /// Language the backend analyzed the document in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Response of an entity sentiment call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySentimentAnalysis {
    /// Entities in backend order.
    #[serde(default)]
    pub entities: Vec<Entity>,
}

/// Response of a text detection call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDetection {
    /// Full text detected in the image; empty when the image has no text.
    pub text: String,
    /// Locale hint reported by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

/// Response of a language detection call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageDetection {
    /// BCP-47 language code.
    pub language: String,
    /// Backend confidence in `[0, 1]`, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// Response of any analysis capability.
///
/// Each capability has its own shape; [`AnalysisResponse::capability`]
/// reports which one a value carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "capability", content = "result", rename_all = "snake_case")]
pub enum AnalysisResponse {
    Sentiment(SentimentAnalysis),
    EntitySentiment(EntitySentimentAnalysis),
    TextDetection(TextDetection),
    SafeSearch(SafeSearchAnnotation),
    LanguageDetection(LanguageDetection),
}

impl AnalysisResponse {
    /// Returns the capability that produced this response.
    pub fn capability(&self) -> Capability {
        match self {
            Self::Sentiment(_) => Capability::Sentiment,
            Self::EntitySentiment(_) => Capability::EntitySentiment,
            Self::TextDetection(_) => Capability::TextDetection,
            Self::SafeSearch(_) => Capability::SafeSearch,
            Self::LanguageDetection(_) => Capability::LanguageDetection,
        }
    }

    /// Extracts the document sentiment.
    pub fn into_sentiment(self) -> Result<SentimentScore> {
        match self {
            Self::Sentiment(analysis) => Ok(analysis.document_sentiment),
            other => Err(mismatch(Capability::Sentiment, &other)),
        }
    }

    /// Extracts the entity list.
    pub fn into_entities(self) -> Result<Vec<Entity>> {
        match self {
            Self::EntitySentiment(analysis) => Ok(analysis.entities),
            other => Err(mismatch(Capability::EntitySentiment, &other)),
        }
    }

    /// Extracts the detected text.
    pub fn into_text(self) -> Result<String> {
        match self {
            Self::TextDetection(detection) => Ok(detection.text),
            other => Err(mismatch(Capability::TextDetection, &other)),
        }
    }

    /// Extracts the safe-search annotation.
    pub fn into_safe_search(self) -> Result<SafeSearchAnnotation> {
        match self {
            Self::SafeSearch(annotation) => Ok(annotation),
            other => Err(mismatch(Capability::SafeSearch, &other)),
        }
    }

    /// Extracts the detected language code.
    pub fn into_language(self) -> Result<String> {
        match self {
            Self::LanguageDetection(detection) => Ok(detection.language),
            other => Err(mismatch(Capability::LanguageDetection, &other)),
        }
    }
}

fn mismatch(expected: Capability, actual: &AnalysisResponse) -> Error {
    Error::malformed_response().with_message(format!(
        "expected {expected} response, got {}",
        actual.capability()
    ))
}

#[cfg(test)]
mod tests {
    use sentio_core::ErrorKind;

    use super::*;

    #[test]
    fn typed_extraction() {
        let response = AnalysisResponse::Sentiment(SentimentAnalysis {
            document_sentiment: SentimentScore {
                score: 0.6,
                magnitude: 2.0,
            },
            language: None,
        });
        assert_eq!(response.capability(), Capability::Sentiment);
        assert_eq!(response.into_sentiment().unwrap().magnitude, 2.0);
    }

    #[test]
    fn mismatched_variant_is_malformed() {
        let response = AnalysisResponse::TextDetection(TextDetection::default());
        let error = response.into_entities().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MalformedResponse);
        assert!(error.to_string().contains("entity_sentiment"));
    }
}
