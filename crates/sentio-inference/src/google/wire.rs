//! Request and response bodies of the Google Cloud REST APIs.
//!
//! Only the fields the pipeline reads are modeled; everything else in the
//! responses is ignored.

use sentio_core::types::{Entity, SafeSearchAnnotation, SentimentScore};
use serde::{Deserialize, Serialize};

/// Natural Language `documents:*` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DocumentRequest<'a> {
    pub document: Document<'a>,
    pub encoding_type: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Document<'a> {
    #[serde(rename = "type")]
    pub document_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gcs_content_uri: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SentimentBody {
    pub document_sentiment: Option<SentimentScore>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EntitySentimentBody {
    pub entities: Option<Vec<Entity>>,
}

/// Vision `images:annotate` request body.
#[derive(Debug, Serialize)]
pub(crate) struct AnnotateRequest<'a> {
    pub requests: [AnnotateImageRequest<'a>; 1],
}

#[derive(Debug, Serialize)]
pub(crate) struct AnnotateImageRequest<'a> {
    pub image: Image<'a>,
    pub features: [Feature; 1],
}

#[derive(Debug, Serialize)]
pub(crate) struct Image<'a> {
    pub source: ImageSource<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageSource<'a> {
    pub gcs_image_uri: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct Feature {
    #[serde(rename = "type")]
    pub feature_type: &'static str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnnotateBody {
    #[serde(default)]
    pub responses: Vec<AnnotateImageBody>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnnotateImageBody {
    #[serde(default)]
    pub text_annotations: Vec<TextAnnotation>,
    #[serde(default)]
    pub safe_search_annotation: Option<SafeSearchAnnotation>,
    #[serde(default)]
    pub error: Option<Status>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TextAnnotation {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub locale: Option<String>,
}

/// `google.rpc.Status` embedded in per-image responses.
#[derive(Debug, Deserialize)]
pub(crate) struct Status {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

/// Translation v2 `detect` request body.
#[derive(Debug, Serialize)]
pub(crate) struct DetectRequest<'a> {
    pub q: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DetectBody {
    pub data: Option<DetectData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DetectData {
    #[serde(default)]
    pub detections: Vec<Vec<Detection>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Detection {
    pub language: String,
    #[serde(default)]
    pub confidence: Option<f32>,
}
