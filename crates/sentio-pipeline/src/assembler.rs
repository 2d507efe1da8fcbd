//! Assembly of analysis responses into published payloads.

use sentio_core::types::{ImageResult, ResultPayload, TextResult};
use sentio_inference::{AnalysisResponse, Capability};

use crate::error::{PipelineError, Result};

/// Builds the text pipeline payload from the sentiment and entity-sentiment
/// responses of one request.
///
/// Both responses are required; entities keep the backend's order.
pub fn assemble_text_result(
    sentiment: Option<AnalysisResponse>,
    entities: Option<AnalysisResponse>,
    filename: &str,
) -> Result<ResultPayload> {
    let sentiment = sentiment
        .ok_or(PipelineError::IncompleteAnalysis(Capability::Sentiment.into()))?
        .into_sentiment()?;
    let entities = entities
        .ok_or(PipelineError::IncompleteAnalysis(
            Capability::EntitySentiment.into(),
        ))?
        .into_entities()?;

    Ok(TextResult::new(sentiment, entities, filename).into())
}

/// Builds the image pipeline payload.
pub fn assemble_image_result(
    text: impl Into<String>,
    filename: &str,
    detected_language: impl Into<String>,
) -> ResultPayload {
    ImageResult {
        text: text.into(),
        filename: filename.to_owned(),
        from: detected_language.into(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use sentio_core::types::{Entity, SentimentScore};
    use sentio_inference::{EntitySentimentAnalysis, SentimentAnalysis, TextDetection};

    use super::*;

    fn sentiment(score: f32, magnitude: f32) -> AnalysisResponse {
        AnalysisResponse::Sentiment(SentimentAnalysis {
            document_sentiment: SentimentScore { score, magnitude },
            language: None,
        })
    }

    fn entities(names: &[&str]) -> AnalysisResponse {
        AnalysisResponse::EntitySentiment(EntitySentimentAnalysis {
            entities: names
                .iter()
                .map(|name| Entity::new(*name, SentimentScore::default()))
                .collect(),
        })
    }

    #[test]
    fn text_result() {
        let payload = assemble_text_result(
            Some(sentiment(0.6, 2.0)),
            Some(entities(&["Acme", "Globex"])),
            "doc1.txt",
        )
        .unwrap();

        let ResultPayload::Text(result) = payload else {
            panic!("expected a text payload");
        };
        assert_eq!(result.score, 0.6);
        assert_eq!(result.magnitude, 2.0);
        assert_eq!(result.filename, "doc1.txt");
        let names: Vec<_> = result.entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Acme", "Globex"]);
    }

    #[test]
    fn missing_response_is_incomplete() {
        let error = assemble_text_result(Some(sentiment(0.1, 0.1)), None, "doc1.txt").unwrap_err();
        assert!(matches!(
            error,
            PipelineError::IncompleteAnalysis("entity_sentiment")
        ));

        let error = assemble_text_result(None, Some(entities(&[])), "doc1.txt").unwrap_err();
        assert!(matches!(error, PipelineError::IncompleteAnalysis("sentiment")));
    }

    #[test]
    fn wrong_variant_is_malformed() {
        let error = assemble_text_result(
            Some(AnalysisResponse::TextDetection(TextDetection::default())),
            Some(entities(&[])),
            "doc1.txt",
        )
        .unwrap_err();
        assert!(matches!(error, PipelineError::MalformedResponse(_)));
    }

    #[test]
    fn image_result() {
        let payload = assemble_image_result("hello", "pic1.jpg", "en");
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({"text": "hello", "filename": "pic1.jpg", "from": "en"})
        );
    }
}
