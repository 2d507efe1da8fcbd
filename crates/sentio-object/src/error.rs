//! Minimal error type for object-store operations.

use std::fmt;

type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for object-store operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A lightweight error carrying a message, an optional source, and a
/// retryable flag.
pub struct Error {
    message: String,
    source: Option<BoxedError>,
    retryable: bool,
}

impl Error {
    /// Create a runtime error formatted as `[{label}] {msg}`.
    pub fn runtime(msg: impl fmt::Display, label: &str, retryable: bool) -> Self {
        Self {
            message: format!("[{label}] {msg}"),
            source: None,
            retryable,
        }
    }

    /// Create a connection error formatted as `[{label}] {msg}`.
    ///
    /// Connection errors come from building a backend and are never
    /// retryable: the same configuration fails the same way.
    pub fn connection(msg: impl fmt::Display, label: &str) -> Self {
        Self {
            message: format!("[{label}] {msg}"),
            source: None,
            retryable: false,
        }
    }

    /// Attach a source error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Whether the caller should retry this operation.
    pub fn is_retryable(&self) -> bool {
        self.retryable
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("message", &self.message)
            .field("retryable", &self.retryable)
            .field("source", &self.source)
            .finish()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Convert an [`object_store::Error`] into a crate [`Error`].
pub(crate) fn from_object_store(err: object_store::Error) -> Error {
    let retryable = !matches!(
        err,
        object_store::Error::NotFound { .. }
            | object_store::Error::PermissionDenied { .. }
            | object_store::Error::Unauthenticated { .. }
            | object_store::Error::AlreadyExists { .. }
            | object_store::Error::Precondition { .. }
            | object_store::Error::NotSupported { .. }
    );
    Error::runtime(err.to_string(), "object-store", retryable).with_source(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_label() {
        let error = Error::runtime("boom", "gcs", true);
        assert_eq!(error.to_string(), "[gcs] boom");
        assert!(error.is_retryable());
        assert!(!Error::connection("bad bucket", "s3").is_retryable());
    }

    #[test]
    fn not_found_is_permanent() {
        let error = from_object_store(object_store::Error::NotFound {
            path: "missing".to_owned(),
            source: "no such key".into(),
        });
        assert!(!error.is_retryable());
        assert!(std::error::Error::source(&error).is_some());
    }
}
