//! Pipeline error types.

use std::borrow::Cow;

use sentio_core::ErrorKind;

/// Result type alias for pipeline operations.
pub type Result<T, E = PipelineError> = std::result::Result<T, E>;

/// Pipeline error type.
///
/// Every handler invocation ends either successfully or with exactly one of
/// these variants, which the worker uses to decide between redelivery and
/// discarding the message.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A required input field is missing or empty.
    #[error("validation failed: {0}")]
    Validation(Cow<'static, str>),

    /// An analysis backend rejected the call or did not answer in time.
    #[error("analysis backend error: {0}")]
    Backend(#[source] sentio_core::Error),

    /// An analysis response lacked the expected shape.
    #[error("malformed analysis response: {0}")]
    MalformedResponse(#[source] sentio_core::Error),

    /// A required analysis response is absent.
    #[error("incomplete analysis: missing {0} response")]
    IncompleteAnalysis(&'static str),

    /// The result could not be published to its topic.
    #[error("publish to '{topic}' failed: {source}")]
    Publish {
        topic: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A consumed message could not be decoded.
    #[error("decode failed: {message}")]
    Decode {
        message: Cow<'static, str>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The artifact could not be written to the results bucket.
    #[error("storage write failed: {0}")]
    Storage(#[from] sentio_object::Error),

    /// A worker could not attach to its stream.
    #[error("subscription failed: {0}")]
    Subscription(#[from] sentio_nats::Error),

    /// A worker task panicked or was aborted.
    #[error("worker task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl PipelineError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a publish error for `topic`.
    pub fn publish(
        topic: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Publish {
            topic: topic.into(),
            source: Box::new(source),
        }
    }

    /// Creates a decode error with a source.
    pub fn decode(
        message: impl Into<Cow<'static, str>>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Decode {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns `true` when redelivering the same message may succeed.
    ///
    /// Invalid input and undecodable or malformed data fail the same way on
    /// every attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Validation(_) | Self::Decode { .. } | Self::MalformedResponse(_) => false,
            Self::Backend(error) => !matches!(
                error.kind(),
                ErrorKind::Authentication | ErrorKind::Configuration | ErrorKind::InvalidInput
            ),
            Self::Storage(error) => error.is_retryable(),
            Self::IncompleteAnalysis(_)
            | Self::Publish { .. }
            | Self::Subscription(_)
            | Self::Task(_) => true,
        }
    }

    /// Returns a short, stable name for the error variant.
    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Backend(_) => "backend",
            Self::MalformedResponse(_) => "malformed_response",
            Self::IncompleteAnalysis(_) => "incomplete_analysis",
            Self::Publish { .. } => "publish",
            Self::Decode { .. } => "decode",
            Self::Storage(_) => "storage",
            Self::Subscription(_) => "subscription",
            Self::Task(_) => "task",
        }
    }
}

impl From<sentio_core::Error> for PipelineError {
    fn from(error: sentio_core::Error) -> Self {
        match error.kind() {
            ErrorKind::InvalidInput => Self::Validation(
                error
                    .message
                    .map_or(Cow::Borrowed("invalid input"), Cow::Owned),
            ),
            ErrorKind::MalformedResponse => Self::MalformedResponse(error),
            _ => Self::Backend(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_by_kind() {
        let error: PipelineError = sentio_core::Error::invalid_input()
            .with_message("filename not provided")
            .into();
        assert!(matches!(error, PipelineError::Validation(_)));
        assert_eq!(error.to_string(), "validation failed: filename not provided");

        let error: PipelineError = sentio_core::Error::malformed_response().into();
        assert_eq!(error.kind_str(), "malformed_response");

        let error: PipelineError = sentio_core::Error::timeout().into();
        assert_eq!(error.kind_str(), "backend");
        assert!(error.is_retryable());
    }

    #[test]
    fn permanent_failures_are_not_retryable() {
        assert!(!PipelineError::validation("bucket not provided").is_retryable());
        let error: PipelineError = sentio_core::Error::authentication().into();
        assert!(!error.is_retryable());
        assert!(PipelineError::IncompleteAnalysis("sentiment").is_retryable());
    }
}
