//! Final output of the consume stage.

use serde::{Deserialize, Serialize};

/// Text content written once per consume invocation.
///
/// The key and content are pure functions of the consumed payload, so a
/// redelivered message overwrites the artifact with identical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersistedArtifact {
    /// Object key within the results bucket.
    pub key: String,
    /// Text content of the artifact.
    pub content: String,
}

impl PersistedArtifact {
    /// Derives the artifact key by appending `suffix` to the source object name.
    pub fn new(filename: &str, suffix: &str, content: impl Into<String>) -> Self {
        Self {
            key: format!("{filename}{suffix}"),
            content: content.into(),
        }
    }

    /// Returns the content size in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns `true` when the artifact has no content.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_appends_suffix() {
        let artifact = PersistedArtifact::new("doc1.txt", "Processed.txt", "\nNeutralAcme");
        assert_eq!(artifact.key, "doc1.txtProcessed.txt");
        assert_eq!(artifact.len(), 12);
    }
}
