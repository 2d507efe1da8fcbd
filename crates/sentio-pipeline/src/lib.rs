#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for the ingest stage.
pub const TRACING_TARGET_INGEST: &str = "sentio_pipeline::ingest";

/// Tracing target for the consume stage.
pub const TRACING_TARGET_CONSUME: &str = "sentio_pipeline::consume";

/// Tracing target for result publishing.
pub const TRACING_TARGET_PUBLISHER: &str = "sentio_pipeline::publisher";

/// Tracing target for worker infrastructure.
pub const TRACING_TARGET_WORKER: &str = "sentio_pipeline::worker";

pub mod assembler;
pub mod classifier;
pub mod codec;
mod config;
mod error;
pub mod handler;
pub mod pipeline;
mod publisher;
mod state;
pub mod worker;

pub use config::{
    DEFAULT_CONSUMER_PREFIX, DEFAULT_IMAGE_TOPIC, DEFAULT_IMAGE_UPLOADS,
    DEFAULT_MAX_CONCURRENT_JOBS, DEFAULT_RESULTS_BUCKET, DEFAULT_TEXT_TOPIC,
    DEFAULT_TEXT_UPLOADS, PipelineConfig,
};
pub use error::{PipelineError, Result};
pub use handler::{ConsumeHandler, IngestHandler, IngestOutcome};
pub use pipeline::{ImagePipeline, Pipeline, TextPipeline};
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use publisher::MemoryPublisher;
pub use publisher::{NatsResultPublisher, ResultPublisher};
pub use state::PipelineState;
pub use worker::{ConsumeWorker, IngestWorker, JobHandler, Worker, WorkerHandles};
