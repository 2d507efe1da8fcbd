//! Result payloads exchanged between the ingest and consume stages.
//!
//! The ingest side only ever builds complete [`TextResult`] / [`ImageResult`]
//! values. The consume side decodes into the `*Candidate` shapes, where every
//! field is optional, so that a missing field surfaces as a validation error
//! rather than a decode error.

use serde::{Deserialize, Serialize};

use super::sentiment::{Entity, SentimentScore};
use crate::{Error, Result};

/// Text pipeline result: document sentiment plus per-entity sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextResult {
    /// Document sentiment magnitude.
    pub magnitude: f32,
    /// Document sentiment score.
    pub score: f32,
    /// Entities in backend order.
    pub entities: Vec<Entity>,
    /// Name of the analyzed object.
    pub filename: String,
}

impl TextResult {
    /// Creates a text result from the document sentiment and its entities.
    pub fn new(sentiment: SentimentScore, entities: Vec<Entity>, filename: impl Into<String>) -> Self {
        Self {
            magnitude: sentiment.magnitude,
            score: sentiment.score,
            entities,
            filename: filename.into(),
        }
    }
}

/// Image pipeline result: detected text and its language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResult {
    /// Text detected in the image.
    pub text: String,
    /// Name of the analyzed object.
    pub filename: String,
    /// Detected language of `text`.
    pub from: String,
}

/// Canonical message body published by the ingest stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultPayload {
    /// Output of the text pipeline.
    Text(TextResult),
    /// Output of the image pipeline.
    Image(ImageResult),
}

impl ResultPayload {
    /// Returns the name of the object the payload was derived from.
    pub fn filename(&self) -> &str {
        match self {
            Self::Text(result) => &result.filename,
            Self::Image(result) => &result.filename,
        }
    }
}

impl From<TextResult> for ResultPayload {
    fn from(result: TextResult) -> Self {
        Self::Text(result)
    }
}

impl From<ImageResult> for ResultPayload {
    fn from(result: ImageResult) -> Self {
        Self::Image(result)
    }
}

/// Decoded, not yet validated text pipeline message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextResultCandidate {
    #[serde(default)]
    pub magnitude: Option<f32>,
    #[serde(default)]
    pub score: Option<f32>,
    #[serde(default)]
    pub entities: Option<Vec<Entity>>,
    #[serde(default)]
    pub filename: Option<String>,
}

impl TextResultCandidate {
    /// Requires `filename`; a missing entity list is treated as empty.
    pub fn validate(self) -> Result<TextResult> {
        let filename = required(self.filename, "filename")?;
        Ok(TextResult {
            magnitude: self.magnitude.unwrap_or_default(),
            score: self.score.unwrap_or_default(),
            entities: self.entities.unwrap_or_default(),
            filename,
        })
    }
}

/// Decoded, not yet validated image pipeline message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResultCandidate {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
}

impl ImageResultCandidate {
    /// Requires both `text` and `filename`.
    pub fn validate(self) -> Result<ImageResult> {
        let text = required(self.text, "text")?;
        let filename = required(self.filename, "filename")?;
        Ok(ImageResult {
            text,
            filename,
            from: self.from.unwrap_or_default(),
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::invalid_input().with_message(format!(
            "{field} not provided, make sure the request has a \"{field}\" property"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn text_result_wire_format() {
        let result = TextResult::new(
            SentimentScore {
                score: 0.6,
                magnitude: 2.0,
            },
            vec![Entity::new(
                "Acme",
                SentimentScore {
                    score: 0.6,
                    magnitude: 2.0,
                },
            )],
            "doc1.txt",
        );

        let json = serde_json::to_value(ResultPayload::from(result)).unwrap();
        assert_eq!(json["filename"], "doc1.txt");
        assert_eq!(json["magnitude"], 2.0);
        assert_eq!(json["entities"][0]["name"], "Acme");
    }

    #[test]
    fn image_result_wire_format() {
        let payload = ResultPayload::Image(ImageResult {
            text: "hello".into(),
            filename: "pic1.jpg".into(),
            from: "en".into(),
        });
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"text":"hello","filename":"pic1.jpg","from":"en"}"#);
        assert_eq!(payload.filename(), "pic1.jpg");
    }

    #[test]
    fn text_candidate_requires_filename() {
        let candidate: TextResultCandidate =
            serde_json::from_str(r#"{"magnitude":1,"score":0.2,"entities":[]}"#).unwrap();
        let error = candidate.validate().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn text_candidate_tolerates_missing_entities() {
        let candidate: TextResultCandidate =
            serde_json::from_str(r#"{"filename":"doc1.txt"}"#).unwrap();
        let result = candidate.validate().unwrap();
        assert!(result.entities.is_empty());
    }

    #[test]
    fn image_candidate_requires_text() {
        let candidate = ImageResultCandidate {
            text: Some(String::new()),
            filename: Some("pic1.jpg".into()),
            from: None,
        };
        assert!(candidate.validate().is_err());
    }
}
