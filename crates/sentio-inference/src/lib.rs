#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for analysis service operations.
pub const TRACING_TARGET: &str = "sentio_inference";

pub mod google;
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
mod mock;
mod request;
mod response;
mod service;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use mock::{MockCall, MockProvider};
pub use request::{AnalysisKind, AnalysisRequest, AnalysisRequestBuilder, Capability};
pub use response::{
    AnalysisResponse, EntitySentimentAnalysis, LanguageDetection, SentimentAnalysis,
    TextDetection,
};
pub use service::{AnalysisProvider, AnalysisService};
