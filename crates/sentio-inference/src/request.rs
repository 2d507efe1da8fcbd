//! Analysis request types.

use derive_builder::{Builder, UninitializedFieldError};
use sentio_core::types::FileReference;
use sentio_core::{Error, Result};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, IntoStaticStr};
use uuid::Uuid;

/// Kind of content an analysis request points at.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisKind {
    /// Plain text document.
    Text,
    /// Raster image.
    Image,
}

/// A single analysis operation offered by the backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, IntoStaticStr, Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Capability {
    /// Document-level sentiment.
    Sentiment,
    /// Entities with per-entity sentiment.
    EntitySentiment,
    /// Text detection (OCR) on an image.
    TextDetection,
    /// Adult/spoof/medical/violence likelihoods for an image.
    SafeSearch,
    /// Language of a piece of text.
    LanguageDetection,
}

/// Request for an analysis operation.
///
/// Requests are immutable once built. A request either points at a stored
/// object through `source_uri` or carries inline `content` (used for
/// language detection of text extracted by an earlier call), never both
/// and never neither.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(
    name = "AnalysisRequestBuilder",
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(private, name = "build_inner", error = "UninitializedFieldError")
)]
pub struct AnalysisRequest {
    /// Unique identifier for this request.
    #[builder(default = "Uuid::now_v7()")]
    request_id: Uuid,
    /// URI of the stored object to analyze.
    #[builder(default)]
    source_uri: Option<String>,
    /// Inline content to analyze.
    #[builder(default)]
    content: Option<String>,
    /// Kind of content being analyzed.
    kind: AnalysisKind,
}

impl AnalysisRequestBuilder {
    /// Build the request.
    ///
    /// Fails with [`ErrorKind::InvalidInput`] when `kind` is missing or when
    /// not exactly one of `source_uri` and `content` is set.
    ///
    /// [`ErrorKind::InvalidInput`]: sentio_core::ErrorKind::InvalidInput
    pub fn build(self) -> Result<AnalysisRequest> {
        let request = self
            .build_inner()
            .map_err(|e| Error::invalid_input().with_source(e))?;

        match (&request.source_uri, &request.content) {
            (Some(_), None) | (None, Some(_)) => Ok(request),
            (Some(_), Some(_)) => Err(Error::invalid_input()
                .with_message("request has both a source uri and inline content")),
            (None, None) => Err(Error::invalid_input()
                .with_message("request has neither a source uri nor inline content")),
        }
    }
}

impl AnalysisRequest {
    /// Creates a request for a stored object.
    pub fn from_file(file: &FileReference, kind: AnalysisKind) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            source_uri: Some(file.gcs_uri()),
            content: None,
            kind,
        }
    }

    /// Creates a request carrying inline text.
    pub fn from_text(content: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            source_uri: None,
            content: Some(content.into()),
            kind: AnalysisKind::Text,
        }
    }

    /// Create a builder for this request.
    pub fn builder() -> AnalysisRequestBuilder {
        AnalysisRequestBuilder::default()
    }

    /// Returns the request identifier.
    #[inline]
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Returns the URI of the analyzed object, if any.
    #[inline]
    pub fn source_uri(&self) -> Option<&str> {
        self.source_uri.as_deref()
    }

    /// Returns the inline content, if any.
    #[inline]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Returns the kind of content being analyzed.
    #[inline]
    pub fn kind(&self) -> AnalysisKind {
        self.kind
    }
}
