//! Conversion between payloads and transport envelopes.

use sentio_core::types::ResultPayload;
use sentio_nats::stream::TransportMessage;
use serde::de::DeserializeOwned;

use crate::error::{PipelineError, Result};

/// Attribute carrying the name of the analyzed object.
pub const FILENAME_ATTRIBUTE: &str = "filename";

/// Wraps a payload as base64 encoded JSON.
pub fn encode_payload(payload: &ResultPayload) -> serde_json::Result<TransportMessage> {
    let body = serde_json::to_vec(payload)?;
    Ok(TransportMessage::from_bytes(body).with_attribute(FILENAME_ATTRIBUTE, payload.filename()))
}

/// Decodes an envelope body: base64, then UTF-8, then JSON.
pub fn decode_payload<T>(message: &TransportMessage) -> Result<T>
where
    T: DeserializeOwned,
{
    let body = message
        .body()
        .map_err(|e| PipelineError::decode("message data is not valid base64", e))?;
    let text = String::from_utf8(body)
        .map_err(|e| PipelineError::decode("message data is not valid UTF-8", e))?;
    serde_json::from_str(&text)
        .map_err(|e| PipelineError::decode("message data is not a valid JSON payload", e))
}

#[cfg(test)]
mod tests {
    use sentio_core::types::{ImageResult, ImageResultCandidate, TextResultCandidate};

    use super::*;

    #[test]
    fn encoded_payload_decodes_as_candidate() {
        let payload = ResultPayload::Image(ImageResult {
            text: "hello".to_owned(),
            filename: "pic1.jpg".to_owned(),
            from: "en".to_owned(),
        });
        let message = encode_payload(&payload).unwrap();
        assert_eq!(message.attribute(FILENAME_ATTRIBUTE), Some("pic1.jpg"));

        let candidate: ImageResultCandidate = decode_payload(&message).unwrap();
        assert_eq!(candidate.text.as_deref(), Some("hello"));
        assert_eq!(candidate.from.as_deref(), Some("en"));
    }

    #[test]
    fn invalid_base64() {
        let message = TransportMessage {
            data: "%%%".to_owned(),
            ..Default::default()
        };
        let error = decode_payload::<TextResultCandidate>(&message).unwrap_err();
        assert!(matches!(error, PipelineError::Decode { .. }));
    }

    #[test]
    fn invalid_utf8() {
        let message = TransportMessage::from_bytes([0xff, 0xfe, 0xfd]);
        let error = decode_payload::<TextResultCandidate>(&message).unwrap_err();
        assert!(error.to_string().contains("UTF-8"));
    }

    #[test]
    fn invalid_json() {
        let message = TransportMessage::from_bytes("not json");
        let error = decode_payload::<TextResultCandidate>(&message).unwrap_err();
        assert!(error.to_string().contains("JSON"));
    }
}
