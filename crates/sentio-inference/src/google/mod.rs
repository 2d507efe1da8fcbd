//! Google Cloud Natural Language, Vision and Translation backend.

mod client;
mod config;
mod wire;

pub use client::{GoogleCloudClient, TRACING_TARGET};
pub use config::{
    DEFAULT_LANGUAGE_URL, DEFAULT_TRANSLATE_URL, DEFAULT_VISION_URL, Endpoints, GoogleCloudConfig,
};

use crate::AnalysisService;

impl GoogleCloudClient {
    /// Wraps this client in an [`AnalysisService`].
    pub fn into_service(self) -> AnalysisService {
        AnalysisService::new(self)
    }
}

impl GoogleCloudConfig {
    /// Builds a client from this configuration and wraps it in an
    /// [`AnalysisService`].
    pub fn into_service(self) -> sentio_core::Result<AnalysisService> {
        Ok(GoogleCloudClient::new(self)?.into_service())
    }
}
