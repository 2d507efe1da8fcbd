//! Common error type definitions.

use strum::{AsRefStr, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
///
/// Used as the source of structured errors so that any backend error can be
/// carried without leaking its concrete type into the public API.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors that can occur while talking to analysis backends
/// or validating pipeline input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// A required field was missing or empty.
    InvalidInput,
    /// The remote analysis call was rejected.
    Backend,
    /// The remote call succeeded but the response lacked the expected shape.
    MalformedResponse,
    /// Network-related error occurred.
    NetworkError,
    /// Authentication failed.
    Authentication,
    /// Rate limit exceeded.
    RateLimited,
    /// Timeout occurred.
    Timeout,
    /// Configuration error.
    Configuration,
    /// Serialization/deserialization error.
    Serialization,
    /// Unknown error occurred.
    Unknown,
}

impl ErrorKind {
    /// Returns `true` for kinds that describe a failed or unreachable backend.
    pub fn is_backend_failure(self) -> bool {
        matches!(
            self,
            Self::Backend
                | Self::NetworkError
                | Self::Authentication
                | Self::RateLimited
                | Self::Timeout
        )
    }
}

/// A structured error type for sentio-core operations.
#[derive(Debug, Error)]
#[error("{kind:?}{}", message.as_ref().map(|m| format!(": {}", m)).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional error message.
    pub message: Option<String>,
    /// Optional source error.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a source error to this error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Creates a new invalid input error.
    pub fn invalid_input() -> Self {
        Self::new(ErrorKind::InvalidInput)
    }

    /// Creates a new backend error.
    pub fn backend() -> Self {
        Self::new(ErrorKind::Backend)
    }

    /// Creates a new malformed response error.
    pub fn malformed_response() -> Self {
        Self::new(ErrorKind::MalformedResponse)
    }

    /// Creates a new network error.
    pub fn network_error() -> Self {
        Self::new(ErrorKind::NetworkError)
    }

    /// Creates a new authentication error.
    pub fn authentication() -> Self {
        Self::new(ErrorKind::Authentication)
    }

    /// Creates a new rate limited error.
    pub fn rate_limited() -> Self {
        Self::new(ErrorKind::RateLimited)
    }

    /// Creates a new timeout error.
    pub fn timeout() -> Self {
        Self::new(ErrorKind::Timeout)
    }

    /// Creates a new configuration error.
    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }

    /// Creates a new serialization error.
    pub fn serialization() -> Self {
        Self::new(ErrorKind::Serialization)
    }

    /// Creates a new unknown error.
    pub fn unknown() -> Self {
        Self::new(ErrorKind::Unknown)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error kind as a string.
    pub fn kind_str(&self) -> &'static str {
        self.kind.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_message() {
        let error = Error::malformed_response().with_message("missing documentSentiment");
        assert_eq!(
            error.to_string(),
            "MalformedResponse: missing documentSentiment"
        );
        assert_eq!(error.kind_str(), "malformed_response");
    }

    #[test]
    fn display_without_message() {
        assert_eq!(Error::timeout().to_string(), "Timeout");
    }

    #[test]
    fn backend_failure_kinds() {
        assert!(ErrorKind::Backend.is_backend_failure());
        assert!(ErrorKind::Timeout.is_backend_failure());
        assert!(!ErrorKind::MalformedResponse.is_backend_failure());
        assert!(!ErrorKind::InvalidInput.is_backend_failure());
    }
}
