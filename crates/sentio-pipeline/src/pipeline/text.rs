use sentio_core::types::{FileReference, PersistedArtifact, ResultPayload, TextResultCandidate};
use sentio_inference::{AnalysisKind, AnalysisRequest, AnalysisService, Capability};

use super::Pipeline;
use crate::TRACING_TARGET_INGEST;
use crate::assembler::assemble_text_result;
use crate::classifier::render_entities;
use crate::config::PipelineConfig;
use crate::error::Result;

/// Document sentiment pipeline.
///
/// Ingest runs sentiment and entity sentiment concurrently against one
/// request; consume classifies every entity into its bucket.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextPipeline;

impl Pipeline for TextPipeline {
    type Candidate = TextResultCandidate;

    const ARTIFACT_SUFFIX: &'static str = "Processed.txt";
    const KIND: AnalysisKind = AnalysisKind::Text;
    const NAME: &'static str = "text";

    fn topic(config: &PipelineConfig) -> &str {
        &config.text_topic
    }

    fn uploads_stream(config: &PipelineConfig) -> &str {
        &config.text_uploads_stream
    }

    fn source_bucket(config: &PipelineConfig) -> Option<&str> {
        config.text_bucket.as_deref()
    }

    async fn analyze(analysis: &AnalysisService, file: &FileReference) -> Result<ResultPayload> {
        let request = AnalysisRequest::from_file(file, Self::KIND);

        let (sentiment, entities) = tokio::try_join!(
            analysis.analyze(&request, Capability::Sentiment),
            analysis.analyze(&request, Capability::EntitySentiment),
        )?;

        tracing::debug!(
            target: TRACING_TARGET_INGEST,
            request_id = %request.request_id(),
            file = %file,
            "Text analysis complete"
        );

        assemble_text_result(Some(sentiment), Some(entities), file.name())
    }

    fn render(candidate: Self::Candidate) -> Result<PersistedArtifact> {
        let result = candidate.validate()?;
        let content = render_entities(&result.entities);
        Ok(PersistedArtifact::new(
            &result.filename,
            Self::ARTIFACT_SUFFIX,
            content,
        ))
    }
}

#[cfg(test)]
mod tests {
    use sentio_core::types::{Entity, SentimentScore};
    use sentio_inference::MockProvider;

    use super::*;
    use crate::PipelineError;

    fn score(score: f32, magnitude: f32) -> SentimentScore {
        SentimentScore { score, magnitude }
    }

    #[tokio::test]
    async fn analyze_uses_one_request_for_both_calls() {
        let mock = MockProvider::new()
            .with_sentiment(0.6, 2.0)
            .with_entities(vec![Entity::new("Acme", score(0.6, 2.0))]);
        let file = FileReference::new("b", "doc1.txt").unwrap();

        let payload = TextPipeline::analyze(&mock.service(), &file).await.unwrap();
        let ResultPayload::Text(result) = payload else {
            panic!("expected a text payload");
        };
        assert_eq!(result.score, 0.6);
        assert_eq!(result.magnitude, 2.0);
        assert_eq!(result.entities[0].name, "Acme");
        assert_eq!(result.filename, "doc1.txt");

        let calls = mock.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].request.request_id(), calls[1].request.request_id());
        assert_eq!(calls[0].request.source_uri(), Some("gs://b/doc1.txt"));
    }

    #[tokio::test]
    async fn entity_failure_aborts_analysis() {
        let mock = MockProvider::new()
            .with_sentiment(0.6, 2.0)
            .failing(Capability::EntitySentiment);
        let file = FileReference::new("b", "doc1.txt").unwrap();

        let error = TextPipeline::analyze(&mock.service(), &file)
            .await
            .unwrap_err();
        assert!(matches!(error, PipelineError::Backend(_)));
    }

    #[test]
    fn render_classifies_entities_in_order() {
        let candidate = TextResultCandidate {
            magnitude: Some(2.0),
            score: Some(0.6),
            entities: Some(vec![
                Entity::new("Acme", score(0.6, 2.0)),
                Entity::new("Globex", score(0.0, 0.0)),
            ]),
            filename: Some("doc1.txt".to_owned()),
        };

        let artifact = TextPipeline::render(candidate).unwrap();
        assert_eq!(artifact.key, "doc1.txtProcessed.txt");
        assert_eq!(artifact.content, "\nClearlyPositiveAcme\nNeutralGlobex");
    }

    #[test]
    fn render_without_entities() {
        let candidate = TextResultCandidate {
            filename: Some("doc2.txt".to_owned()),
            ..Default::default()
        };
        let artifact = TextPipeline::render(candidate).unwrap();
        assert_eq!(artifact.key, "doc2.txtProcessed.txt");
        assert!(artifact.is_empty());
    }

    #[test]
    fn render_requires_filename() {
        let error = TextPipeline::render(TextResultCandidate::default()).unwrap_err();
        assert!(matches!(error, PipelineError::Validation(_)));
        assert!(error.to_string().contains("filename"));
    }
}
