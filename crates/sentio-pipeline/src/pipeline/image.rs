use sentio_core::types::{FileReference, ImageResultCandidate, PersistedArtifact, ResultPayload};
use sentio_inference::{AnalysisKind, AnalysisRequest, AnalysisService};

use super::Pipeline;
use crate::TRACING_TARGET_INGEST;
use crate::assembler::assemble_image_result;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};

/// Image text pipeline.
///
/// Ingest detects the text in an image and the language of that text;
/// consume writes the raw text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImagePipeline;

impl ImagePipeline {
    /// Spawns the safe-search check without waiting for it.
    ///
    /// Its outcome is only logged and never affects the payload.
    fn spawn_safe_search(analysis: &AnalysisService, request: &AnalysisRequest, file: &FileReference) {
        let analysis = analysis.clone();
        let request = request.clone();
        let file = file.to_string();

        tokio::spawn(async move {
            match analysis.detect_safe_search(&request).await {
                Ok(annotation) => {
                    tracing::info!(
                        target: TRACING_TARGET_INGEST,
                        file = %file,
                        adult = %annotation.adult,
                        spoof = %annotation.spoof,
                        medical = %annotation.medical,
                        violence = %annotation.violence,
                        "Safe search classification"
                    );
                }
                Err(error) => {
                    tracing::warn!(
                        target: TRACING_TARGET_INGEST,
                        file = %file,
                        error = %error,
                        "Safe search check failed"
                    );
                }
            }
        });
    }
}

impl Pipeline for ImagePipeline {
    type Candidate = ImageResultCandidate;

    const ARTIFACT_SUFFIX: &'static str = ".txt";
    const KIND: AnalysisKind = AnalysisKind::Image;
    const NAME: &'static str = "image";

    fn topic(config: &PipelineConfig) -> &str {
        &config.image_topic
    }

    fn uploads_stream(config: &PipelineConfig) -> &str {
        &config.image_uploads_stream
    }

    fn source_bucket(config: &PipelineConfig) -> Option<&str> {
        config.image_bucket.as_deref()
    }

    async fn analyze(analysis: &AnalysisService, file: &FileReference) -> Result<ResultPayload> {
        let request = AnalysisRequest::from_file(file, Self::KIND);
        Self::spawn_safe_search(analysis, &request, file);

        let text = analysis.detect_text(&request).await?;

        // The consume stage requires non-empty text, so fail here instead.
        if text.is_empty() {
            return Err(PipelineError::validation(format!(
                "no text detected in image '{file}'"
            )));
        }

        let language = analysis
            .detect_language(&AnalysisRequest::from_text(text.as_str()))
            .await?;

        tracing::debug!(
            target: TRACING_TARGET_INGEST,
            request_id = %request.request_id(),
            file = %file,
            language = %language,
            text_len = text.len(),
            "Image analysis complete"
        );

        Ok(assemble_image_result(text, file.name(), language))
    }

    fn render(candidate: Self::Candidate) -> Result<PersistedArtifact> {
        let result = candidate.validate()?;
        Ok(PersistedArtifact::new(
            &result.filename,
            Self::ARTIFACT_SUFFIX,
            result.text,
        ))
    }
}
