//! Transport envelope carried on result topics.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Envelope around a topic message.
///
/// `data` holds the base64 encoded message body; `attributes` carries free
/// form string metadata alongside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportMessage {
    /// Base64 encoded message body.
    #[serde(default)]
    pub data: String,
    /// Message attributes.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
}

impl TransportMessage {
    /// Wraps raw bytes into an envelope.
    pub fn from_bytes(body: impl AsRef<[u8]>) -> Self {
        Self {
            data: STANDARD.encode(body),
            attributes: HashMap::new(),
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Returns an attribute value.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Decodes the base64 message body.
    pub fn body(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.data.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_is_base64() {
        let message = TransportMessage::from_bytes(br#"{"filename":"a"}"#)
            .with_attribute("pipeline", "text");
        assert_eq!(message.data, "eyJmaWxlbmFtZSI6ImEifQ==");
        assert_eq!(message.body().unwrap(), br#"{"filename":"a"}"#);
        assert_eq!(message.attribute("pipeline"), Some("text"));
    }

    #[test]
    fn invalid_base64() {
        let message = TransportMessage {
            data: "not base64!".to_owned(),
            ..Default::default()
        };
        assert!(message.body().is_err());
    }

    #[test]
    fn envelope_without_attributes() {
        let message: TransportMessage = serde_json::from_str(r#"{"data":"aGVsbG8="}"#).unwrap();
        assert_eq!(message.body().unwrap(), b"hello");
        assert_eq!(
            serde_json::to_string(&message).unwrap(),
            r#"{"data":"aGVsbG8="}"#
        );
    }
}
