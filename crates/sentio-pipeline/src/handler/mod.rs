//! Stage handlers.
//!
//! - [`IngestHandler`]: storage event → analysis → assembled payload → publish
//! - [`ConsumeHandler`]: message → decode → validate → render → storage write
//!
//! Both are generic over a [`Pipeline`](crate::pipeline::Pipeline), so the
//! text and the image pipeline are two instances of the same pair.

mod consume;
mod ingest;

pub use consume::ConsumeHandler;
pub use ingest::{IngestHandler, IngestOutcome};

#[cfg(test)]
mod tests {
    use sentio_core::types::{Entity, SentimentScore, StorageEvent};
    use sentio_inference::{Capability, MockProvider};
    use sentio_nats::stream::TransportMessage;
    use sentio_object::providers::MemoryProvider;

    use super::*;
    use crate::codec::encode_payload;
    use crate::pipeline::{ImagePipeline, TextPipeline};
    use crate::{MemoryPublisher, PipelineConfig, PipelineError, PipelineState};

    fn state(mock: &MockProvider, publisher: &MemoryPublisher, config: PipelineConfig) -> PipelineState {
        PipelineState::new(
            mock.service(),
            MemoryProvider::bucket("results"),
            publisher.clone(),
            config,
        )
    }

    fn acme_mock() -> MockProvider {
        let sentiment = SentimentScore {
            score: 0.6,
            magnitude: 2.0,
        };
        MockProvider::new()
            .with_sentiment(0.6, 2.0)
            .with_entities(vec![Entity::new("Acme", sentiment)])
    }

    async fn stored_text(state: &PipelineState, key: &str) -> String {
        let output = state.storage.get(key).await.unwrap();
        output.text().unwrap().to_owned()
    }

    #[tokio::test]
    async fn text_pipeline_scenario() {
        let mock = acme_mock();
        let publisher = MemoryPublisher::new();
        let state = state(&mock, &publisher, PipelineConfig::new());

        let event = StorageEvent::uploaded("b", "doc1.txt");
        let outcome = IngestHandler::<TextPipeline>::handle(&state, &event)
            .await
            .unwrap();
        let IngestOutcome::Published { topic, payload } = outcome else {
            panic!("expected the payload to be published");
        };
        assert_eq!(topic, "TEXT_RESULTS");

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["magnitude"], 2.0);
        assert_eq!(json["entities"][0]["name"], "Acme");
        assert_eq!(json["filename"], "doc1.txt");

        let messages = publisher.messages("TEXT_RESULTS");
        assert_eq!(messages.len(), 1);

        let artifact = ConsumeHandler::<TextPipeline>::handle(&state, &messages[0])
            .await
            .unwrap();
        assert_eq!(artifact.key, "doc1.txtProcessed.txt");
        assert_eq!(artifact.content, "\nClearlyPositiveAcme");
        assert_eq!(
            stored_text(&state, "doc1.txtProcessed.txt").await,
            "\nClearlyPositiveAcme"
        );
    }

    #[tokio::test]
    async fn image_pipeline_scenario() {
        let mock = MockProvider::new().with_text("hello").with_language("en");
        let publisher = MemoryPublisher::new();
        let state = state(&mock, &publisher, PipelineConfig::new());

        let event = StorageEvent::uploaded("b", "pic1.jpg");
        IngestHandler::<ImagePipeline>::handle(&state, &event)
            .await
            .unwrap();

        let messages = publisher.messages("IMAGE_RESULTS");
        assert_eq!(messages.len(), 1);
        let body: serde_json::Value =
            serde_json::from_slice(&messages[0].body().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"text": "hello", "filename": "pic1.jpg", "from": "en"})
        );

        let artifact = ConsumeHandler::<ImagePipeline>::handle(&state, &messages[0])
            .await
            .unwrap();
        assert_eq!(artifact.key, "pic1.jpg.txt");
        assert_eq!(stored_text(&state, "pic1.jpg.txt").await, "hello");
    }

    #[tokio::test]
    async fn deletion_event_is_skipped() {
        let mock = acme_mock();
        let publisher = MemoryPublisher::new();
        let state = state(&mock, &publisher, PipelineConfig::new());

        let event = StorageEvent::deleted("b", "doc1.txt");
        let outcome = IngestHandler::<TextPipeline>::handle(&state, &event)
            .await
            .unwrap();
        assert_eq!(outcome, IngestOutcome::Skipped);
        assert!(mock.calls().is_empty());
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn ingest_without_bucket_or_name_fails_before_any_call() {
        let mock = acme_mock();
        let publisher = MemoryPublisher::new();
        let state = state(&mock, &publisher, PipelineConfig::new());

        let events = [
            StorageEvent {
                name: Some("doc1.txt".to_owned()),
                ..Default::default()
            },
            StorageEvent {
                bucket: Some("b".to_owned()),
                ..Default::default()
            },
        ];
        for event in &events {
            let error = IngestHandler::<TextPipeline>::handle(&state, event)
                .await
                .unwrap_err();
            assert!(matches!(error, PipelineError::Validation(_)));
            assert!(!error.is_retryable());
        }

        assert!(mock.calls().is_empty());
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn ingest_rejects_foreign_bucket() {
        let mock = acme_mock();
        let publisher = MemoryPublisher::new();
        let config = PipelineConfig::new().with_text_bucket("uploads");
        let state = state(&mock, &publisher, config);

        let event = StorageEvent::uploaded("other", "doc1.txt");
        let error = IngestHandler::<TextPipeline>::handle(&state, &event)
            .await
            .unwrap_err();
        assert!(matches!(error, PipelineError::Validation(_)));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn entity_failure_publishes_nothing() {
        let mock = acme_mock().failing(Capability::EntitySentiment);
        let publisher = MemoryPublisher::new();
        let state = state(&mock, &publisher, PipelineConfig::new());

        let event = StorageEvent::uploaded("b", "doc1.txt");
        let error = IngestHandler::<TextPipeline>::handle(&state, &event)
            .await
            .unwrap_err();
        assert!(matches!(error, PipelineError::Backend(_)));
        assert!(error.is_retryable());
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn safe_search_failure_still_publishes() {
        let mock = MockProvider::new()
            .with_text("hello")
            .failing(Capability::SafeSearch);
        let publisher = MemoryPublisher::new();
        let state = state(&mock, &publisher, PipelineConfig::new());

        let event = StorageEvent::uploaded("b", "pic1.jpg");
        IngestHandler::<ImagePipeline>::handle(&state, &event)
            .await
            .unwrap();
        assert_eq!(publisher.messages("IMAGE_RESULTS").len(), 1);
    }

    #[tokio::test]
    async fn image_without_text_is_not_published() {
        let mock = MockProvider::new();
        let publisher = MemoryPublisher::new();
        let state = state(&mock, &publisher, PipelineConfig::new());

        let event = StorageEvent::uploaded("b", "blank.png");
        let error = IngestHandler::<ImagePipeline>::handle(&state, &event)
            .await
            .unwrap_err();
        assert!(matches!(error, PipelineError::Validation(_)));
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn publish_failure_propagates() {
        let mock = acme_mock();
        let publisher = MemoryPublisher::new().failing();
        let state = state(&mock, &publisher, PipelineConfig::new());

        let event = StorageEvent::uploaded("b", "doc1.txt");
        let error = IngestHandler::<TextPipeline>::handle(&state, &event)
            .await
            .unwrap_err();
        assert!(matches!(error, PipelineError::Publish { .. }));
    }

    #[tokio::test]
    async fn consume_is_idempotent() {
        let mock = acme_mock();
        let publisher = MemoryPublisher::new();
        let state = state(&mock, &publisher, PipelineConfig::new());

        IngestHandler::<TextPipeline>::handle(&state, &StorageEvent::uploaded("b", "doc1.txt"))
            .await
            .unwrap();
        let message = publisher.messages("TEXT_RESULTS").remove(0);

        let first = ConsumeHandler::<TextPipeline>::handle(&state, &message)
            .await
            .unwrap();
        let second = ConsumeHandler::<TextPipeline>::handle(&state, &message)
            .await
            .unwrap();
        assert_eq!(first, second);

        let meta = state.storage.head(&first.key).await.unwrap();
        assert_eq!(meta.size as usize, first.len());
        assert_eq!(stored_text(&state, &first.key).await, first.content);
    }

    #[tokio::test]
    async fn consume_without_filename_writes_nothing() {
        let mock = MockProvider::new();
        let publisher = MemoryPublisher::new();
        let state = state(&mock, &publisher, PipelineConfig::new());

        let message = TransportMessage::from_bytes(r#"{"magnitude":2,"score":0.6,"entities":[]}"#);
        let error = ConsumeHandler::<TextPipeline>::handle(&state, &message)
            .await
            .unwrap_err();
        assert!(matches!(error, PipelineError::Validation(_)));
        assert!(state.storage.head("Processed.txt").await.is_err());
    }

    #[tokio::test]
    async fn consume_rejects_undecodable_message() {
        let mock = MockProvider::new();
        let publisher = MemoryPublisher::new();
        let state = state(&mock, &publisher, PipelineConfig::new());

        let message = TransportMessage::from_bytes("not json");
        let error = ConsumeHandler::<ImagePipeline>::handle(&state, &message)
            .await
            .unwrap_err();
        assert!(matches!(error, PipelineError::Decode { .. }));
        assert!(!error.is_retryable());
    }

    #[tokio::test]
    async fn round_trip_keys_follow_the_source_name() {
        let publisher = MemoryPublisher::new();
        let text_mock = acme_mock();
        let text_state = state(&text_mock, &publisher, PipelineConfig::new());

        for name in ["a.txt", "nested/dir/report.md", "no-extension"] {
            IngestHandler::<TextPipeline>::handle(&text_state, &StorageEvent::uploaded("b", name))
                .await
                .unwrap();
        }

        for (message, name) in publisher
            .messages("TEXT_RESULTS")
            .iter()
            .zip(["a.txt", "nested/dir/report.md", "no-extension"])
        {
            let artifact = ConsumeHandler::<TextPipeline>::handle(&text_state, message)
                .await
                .unwrap();
            assert_eq!(artifact.key, format!("{name}Processed.txt"));
        }
    }
}
