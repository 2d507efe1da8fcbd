//! Google Cloud analysis client implementation using reqwest.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use reqwest::{Client, StatusCode};
use sentio_core::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::config::{Endpoints, GoogleCloudConfig};
use super::wire::{
    AnnotateBody, AnnotateImageBody, AnnotateImageRequest, AnnotateRequest, DetectBody,
    DetectRequest, Document, DocumentRequest, EntitySentimentBody, Feature, Image, ImageSource,
    SentimentBody,
};
use crate::request::{AnalysisKind, AnalysisRequest, Capability};
use crate::response::{
    AnalysisResponse, EntitySentimentAnalysis, LanguageDetection, SentimentAnalysis,
    TextDetection,
};
use crate::service::AnalysisProvider;

/// Tracing target for Google Cloud client operations.
pub const TRACING_TARGET: &str = "sentio_inference::google";

/// Maximum number of response body characters kept in error messages.
const ERROR_BODY_LIMIT: usize = 512;

struct GoogleCloudClientInner {
    http: Client,
    endpoints: Endpoints,
    config: GoogleCloudConfig,
}

impl std::fmt::Debug for GoogleCloudClientInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleCloudClientInner")
            .field("endpoints", &self.endpoints)
            .field("timeout_secs", &self.config.google_timeout_secs)
            .finish_non_exhaustive()
    }
}

/// Analysis backend for the Google Cloud Natural Language, Vision and
/// Translation REST APIs.
///
/// The client is cheap to clone; clones share one HTTP connection pool.
#[derive(Clone, Debug)]
pub struct GoogleCloudClient {
    inner: Arc<GoogleCloudClientInner>,
}

impl GoogleCloudClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API key or endpoints are invalid,
    /// or if the HTTP client cannot be created.
    pub fn new(config: GoogleCloudConfig) -> Result<Self> {
        let endpoints = config.validate()?;

        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(format!("sentio/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                Error::configuration()
                    .with_message("failed to build HTTP client")
                    .with_source(e)
            })?;

        tracing::info!(
            target: TRACING_TARGET,
            language_url = %endpoints.language,
            vision_url = %endpoints.vision,
            translate_url = %endpoints.translate,
            timeout_secs = config.google_timeout_secs,
            "Google Cloud analysis client created"
        );

        Ok(Self {
            inner: Arc::new(GoogleCloudClientInner {
                http,
                endpoints,
                config,
            }),
        })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &GoogleCloudConfig {
        &self.inner.config
    }

    async fn analyze_document(
        &self,
        request: &AnalysisRequest,
        method: &str,
    ) -> Result<Bytes> {
        let body = DocumentRequest {
            document: Document {
                document_type: "PLAIN_TEXT",
                gcs_content_uri: request.source_uri(),
                content: request.content(),
            },
            encoding_type: "UTF8",
        };
        let url = join(&self.inner.endpoints.language, method)?;
        self.post(url, &body).await
    }

    async fn annotate_image(
        &self,
        request: &AnalysisRequest,
        feature: &'static str,
    ) -> Result<AnnotateImageBody> {
        let source_uri = request.source_uri().ok_or_else(|| {
            Error::invalid_input().with_message("image analysis requires a source URI")
        })?;

        let body = AnnotateRequest {
            requests: [AnnotateImageRequest {
                image: Image {
                    source: ImageSource {
                        gcs_image_uri: source_uri,
                    },
                },
                features: [Feature {
                    feature_type: feature,
                }],
            }],
        };
        let url = join(&self.inner.endpoints.vision, "images:annotate")?;
        let response = self.post(url, &body).await?;
        parse_annotate(&response)
    }

    async fn detect(&self, request: &AnalysisRequest) -> Result<AnalysisResponse> {
        let text = request.content().ok_or_else(|| {
            Error::invalid_input().with_message("language detection requires inline text")
        })?;

        let url = join(&self.inner.endpoints.translate, "detect")?;
        let response = self.post(url, &DetectRequest { q: text }).await?;
        parse_detection(&response)
    }

    /// Sends a JSON POST and returns the successful response body.
    async fn post<B>(&self, mut url: Url, body: &B) -> Result<Bytes>
    where
        B: Serialize + ?Sized,
    {
        url.query_pairs_mut()
            .append_pair("key", &self.inner.config.google_api_key);

        let started_at = Instant::now();
        let response = self
            .inner
            .http
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(from_reqwest)?;

        tracing::trace!(
            target: TRACING_TARGET,
            path = url.path(),
            status = status.as_u16(),
            body_len = bytes.len(),
            elapsed_ms = started_at.elapsed().as_millis(),
            "Google Cloud response received"
        );

        if !status.is_success() {
            return Err(from_status(status, &bytes));
        }

        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl AnalysisProvider for GoogleCloudClient {
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        capability: Capability,
    ) -> Result<AnalysisResponse> {
        match capability {
            Capability::Sentiment => {
                let body = self
                    .analyze_document(request, "documents:analyzeSentiment")
                    .await?;
                parse_sentiment(&body)
            }
            Capability::EntitySentiment => {
                let body = self
                    .analyze_document(request, "documents:analyzeEntitySentiment")
                    .await?;
                parse_entity_sentiment(&body)
            }
            Capability::TextDetection => {
                ensure_image(request, capability)?;
                let image = self.annotate_image(request, "TEXT_DETECTION").await?;
                let first = image.text_annotations.into_iter().next();
                Ok(AnalysisResponse::TextDetection(TextDetection {
                    locale: first.as_ref().and_then(|a| a.locale.clone()),
                    text: first.map(|a| a.description).unwrap_or_default(),
                }))
            }
            Capability::SafeSearch => {
                ensure_image(request, capability)?;
                let image = self.annotate_image(request, "SAFE_SEARCH_DETECTION").await?;
                let annotation = image.safe_search_annotation.ok_or_else(|| {
                    Error::malformed_response().with_message("missing safeSearchAnnotation")
                })?;
                Ok(AnalysisResponse::SafeSearch(annotation))
            }
            Capability::LanguageDetection => self.detect(request).await,
        }
    }
}

fn ensure_image(request: &AnalysisRequest, capability: Capability) -> Result<()> {
    if request.kind() != AnalysisKind::Image {
        return Err(Error::invalid_input().with_message(format!(
            "{capability} requires an image request, got {}",
            request.kind()
        )));
    }
    Ok(())
}

fn join(base: &Url, method: &str) -> Result<Url> {
    // A leading "./" keeps "documents:analyze..." from parsing as a URL scheme.
    base.join(&format!("./{method}")).map_err(|e| {
        Error::configuration()
            .with_message(format!("invalid endpoint path '{method}'"))
            .with_source(e)
    })
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| {
        Error::malformed_response()
            .with_message("response body is not valid JSON for the expected shape")
            .with_source(e)
    })
}

fn parse_sentiment(body: &[u8]) -> Result<AnalysisResponse> {
    let body: SentimentBody = decode(body)?;
    let document_sentiment = body.document_sentiment.ok_or_else(|| {
        Error::malformed_response().with_message("missing documentSentiment")
    })?;

    Ok(AnalysisResponse::Sentiment(SentimentAnalysis {
        document_sentiment,
        language: body.language,
    }))
}

fn parse_entity_sentiment(body: &[u8]) -> Result<AnalysisResponse> {
    let body: EntitySentimentBody = decode(body)?;
    let entities = body
        .entities
        .ok_or_else(|| Error::malformed_response().with_message("missing entities"))?;

    Ok(AnalysisResponse::EntitySentiment(EntitySentimentAnalysis {
        entities,
    }))
}

fn parse_annotate(body: &[u8]) -> Result<AnnotateImageBody> {
    let body: AnnotateBody = decode(body)?;
    let image = body
        .responses
        .into_iter()
        .next()
        .ok_or_else(|| Error::malformed_response().with_message("missing image response"))?;

    if let Some(status) = &image.error {
        return Err(Error::backend().with_message(format!(
            "image annotation failed with code {}: {}",
            status.code, status.message
        )));
    }

    Ok(image)
}

fn parse_detection(body: &[u8]) -> Result<AnalysisResponse> {
    let body: DetectBody = decode(body)?;
    let detection = body
        .data
        .and_then(|data| data.detections.into_iter().flatten().next())
        .ok_or_else(|| Error::malformed_response().with_message("missing detections"))?;

    Ok(AnalysisResponse::LanguageDetection(LanguageDetection {
        language: detection.language,
        confidence: detection.confidence,
    }))
}

fn from_reqwest(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::timeout().with_message(err.to_string()).with_source(err)
    } else if err.is_connect() {
        Error::network_error()
            .with_message("Connection failed")
            .with_source(err)
    } else {
        Error::backend().with_message(err.to_string()).with_source(err)
    }
}

fn from_status(status: StatusCode, body: &[u8]) -> Error {
    let snippet: String = String::from_utf8_lossy(body)
        .chars()
        .take(ERROR_BODY_LIMIT)
        .collect();
    let message = format!("HTTP {status}: {snippet}");

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::authentication().with_message(message)
        }
        StatusCode::TOO_MANY_REQUESTS => Error::rate_limited().with_message(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            Error::timeout().with_message(message)
        }
        _ => Error::backend().with_message(message),
    }
}

#[cfg(test)]
mod tests {
    use sentio_core::ErrorKind;
    use sentio_core::types::Likelihood;

    use super::*;

    #[test]
    fn sentiment_response() {
        let response = parse_sentiment(
            br#"{"documentSentiment":{"magnitude":2,"score":0.6},"language":"en","sentences":[]}"#,
        )
        .unwrap();
        let score = response.into_sentiment().unwrap();
        assert_eq!(score.score, 0.6);
        assert_eq!(score.magnitude, 2.0);
    }

    #[test]
    fn sentiment_response_without_document_sentiment() {
        let error = parse_sentiment(br#"{"language":"en"}"#).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn entity_sentiment_preserves_order() {
        let response = parse_entity_sentiment(
            br#"{"entities":[
                {"name":"Acme","type":"ORGANIZATION","sentiment":{"score":0.6,"magnitude":2}},
                {"name":"Globex","type":"ORGANIZATION","sentiment":{"score":-0.4,"magnitude":1}}
            ],"language":"en"}"#,
        )
        .unwrap();
        let entities = response.into_entities().unwrap();
        let names: Vec<_> = entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Acme", "Globex"]);
    }

    #[test]
    fn image_error_status_is_backend_error() {
        let error = parse_annotate(
            br#"{"responses":[{"error":{"code":7,"message":"permission denied"}}]}"#,
        )
        .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Backend);
        assert!(error.to_string().contains("permission denied"));
    }

    #[test]
    fn safe_search_annotation() {
        let image = parse_annotate(
            br#"{"responses":[{"safeSearchAnnotation":{"adult":"VERY_UNLIKELY","spoof":"UNLIKELY","medical":"POSSIBLE","violence":"VERY_UNLIKELY"}}]}"#,
        )
        .unwrap();
        let annotation = image.safe_search_annotation.unwrap();
        assert_eq!(annotation.medical, Likelihood::Possible);
    }

    #[test]
    fn language_detection() {
        let response = parse_detection(
            br#"{"data":{"detections":[[{"language":"en","confidence":1}]]}}"#,
        )
        .unwrap();
        assert_eq!(response.into_language().unwrap(), "en");

        let error = parse_detection(br#"{"data":{"detections":[]}}"#).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn status_mapping() {
        assert_eq!(
            from_status(StatusCode::FORBIDDEN, b"denied").kind(),
            ErrorKind::Authentication
        );
        assert_eq!(
            from_status(StatusCode::TOO_MANY_REQUESTS, b"").kind(),
            ErrorKind::RateLimited
        );
        assert_eq!(
            from_status(StatusCode::INTERNAL_SERVER_ERROR, b"").kind(),
            ErrorKind::Backend
        );
    }

    #[test]
    fn endpoint_join() {
        let base = Url::parse("https://language.googleapis.com/v1/").unwrap();
        let url = join(&base, "documents:analyzeSentiment").unwrap();
        assert_eq!(
            url.as_str(),
            "https://language.googleapis.com/v1/documents:analyzeSentiment"
        );
    }

    #[test]
    fn text_request_rejected_for_image_capability() {
        let request = AnalysisRequest::from_text("hello");
        let error = ensure_image(&request, Capability::TextDetection).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
    }
}
