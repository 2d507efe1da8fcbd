//! Stored object references and the upload events that carry them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Identifies a stored object by bucket and object name.
///
/// Both fields are guaranteed non-empty: the only way to obtain a
/// `FileReference` is through [`FileReference::new`] (or deserialization
/// followed by [`StorageEvent::file_reference`]), which rejects blanks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FileReference {
    bucket: String,
    name: String,
}

impl FileReference {
    /// Creates a validated reference.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::InvalidInput`](crate::ErrorKind::InvalidInput)
    /// error when either field is empty.
    pub fn new(bucket: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let bucket = bucket.into();
        let name = name.into();

        if bucket.is_empty() {
            return Err(missing_field("bucket"));
        }
        if name.is_empty() {
            return Err(missing_field("name"));
        }

        Ok(Self { bucket, name })
    }

    /// Returns the bucket holding the object.
    #[inline]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Returns the object name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renders the reference as a `gs://bucket/name` URI.
    pub fn gcs_uri(&self) -> String {
        format!("gs://{}/{}", self.bucket, self.name)
    }
}

impl fmt::Display for FileReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.name)
    }
}

/// Whether the object named by an event exists after the change.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceState {
    /// The object was created or overwritten.
    #[default]
    Exists,
    /// The object was deleted.
    NotExists,
}

/// Storage notification delivered to the ingest stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageEvent {
    /// Bucket the object lives in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    /// Object name within the bucket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// State of the object after the change.
    #[serde(default)]
    pub resource_state: ResourceState,
}

impl StorageEvent {
    /// Creates an upload event for the given object.
    pub fn uploaded(bucket: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bucket: Some(bucket.into()),
            name: Some(name.into()),
            resource_state: ResourceState::Exists,
        }
    }

    /// Creates a deletion event for the given object.
    pub fn deleted(bucket: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bucket: Some(bucket.into()),
            name: Some(name.into()),
            resource_state: ResourceState::NotExists,
        }
    }

    /// Returns `true` when the event reports a deletion.
    #[inline]
    pub fn is_deletion(&self) -> bool {
        self.resource_state == ResourceState::NotExists
    }

    /// Validates the event and resolves the referenced object.
    pub fn file_reference(&self) -> Result<FileReference> {
        let bucket = self.bucket.as_deref().unwrap_or_default();
        let name = self.name.as_deref().unwrap_or_default();
        FileReference::new(bucket, name)
    }
}

fn missing_field(field: &str) -> Error {
    Error::invalid_input().with_message(format!(
        "{field} not provided, make sure the request has a \"{field}\" property"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn file_reference_rejects_blank_fields() {
        let error = FileReference::new("", "doc1.txt").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
        assert!(error.to_string().contains("bucket"));

        let error = FileReference::new("b", "").unwrap_err();
        assert!(error.to_string().contains("name"));
    }

    #[test]
    fn file_reference_uri() {
        let file = FileReference::new("b", "doc1.txt").unwrap();
        assert_eq!(file.gcs_uri(), "gs://b/doc1.txt");
        assert_eq!(file.to_string(), "b/doc1.txt");
    }

    #[test]
    fn storage_event_wire_format() {
        let event: StorageEvent = serde_json::from_str(
            r#"{"bucket":"b","name":"doc1.txt","resourceState":"not_exists"}"#,
        )
        .unwrap();
        assert!(event.is_deletion());

        let event: StorageEvent = serde_json::from_str(r#"{"name":"doc1.txt"}"#).unwrap();
        assert_eq!(event.resource_state, ResourceState::Exists);
        assert!(event.file_reference().is_err());
    }

    #[test]
    fn storage_event_resolves_reference() {
        let event = StorageEvent::uploaded("b", "pic1.jpg");
        let file = event.file_reference().unwrap();
        assert_eq!(file.bucket(), "b");
        assert_eq!(file.name(), "pic1.jpg");
    }
}
