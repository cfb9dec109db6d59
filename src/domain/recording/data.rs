//! Result of a completed recording

use serde::{Deserialize, Serialize};

use super::audio::{CapturedAudio, EncodedAudio};

/// String carrying base64-encoded binary audio
pub type Base64String = String;

/// Output of a finished recording.
///
/// Serialized as `{"value": {"recordDataBase64"?, "msDuration", "mimeType", "uri"?}}`.
/// A usable result carries at least one of the base64 payload or the URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Envelope", into = "Envelope")]
pub struct RecordingData {
    pub record_data_base64: Option<Base64String>,
    pub ms_duration: u64,
    pub mime_type: String,
    pub uri: Option<String>,
}

impl RecordingData {
    /// Build the result for an encoded capture.
    /// `uri` is set when the audio was persisted; the payload is inlined when
    /// asked for, and always when there is nowhere else to find the audio.
    pub fn from_encoded(
        captured: &CapturedAudio,
        encoded: &EncodedAudio,
        uri: Option<String>,
        inline_payload: bool,
    ) -> Self {
        let record_data_base64 = if inline_payload || uri.is_none() {
            Some(encoded.to_base64())
        } else {
            None
        };

        Self {
            record_data_base64,
            ms_duration: captured.duration().as_millis(),
            mime_type: encoded.format().mime_type().to_string(),
            uri,
        }
    }

    pub fn is_usable(&self) -> bool {
        self.record_data_base64.is_some() || self.uri.is_some()
    }
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    value: Payload,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Payload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    record_data_base64: Option<Base64String>,
    ms_duration: u64,
    mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    uri: Option<String>,
}

impl From<Envelope> for RecordingData {
    fn from(envelope: Envelope) -> Self {
        let Payload {
            record_data_base64,
            ms_duration,
            mime_type,
            uri,
        } = envelope.value;
        Self {
            record_data_base64,
            ms_duration,
            mime_type,
            uri,
        }
    }
}

impl From<RecordingData> for Envelope {
    fn from(data: RecordingData) -> Self {
        Self {
            value: Payload {
                record_data_base64: data.record_data_base64,
                ms_duration: data.ms_duration,
                mime_type: data.mime_type,
                uri: data.uri,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recording::AudioFormat;
    use serde_json::json;

    fn sample() -> (CapturedAudio, EncodedAudio) {
        (
            CapturedAudio::new(vec![0; 67_200], 16_000),
            EncodedAudio::new(vec![9, 9, 9], AudioFormat::Flac),
        )
    }

    #[test]
    fn persisted_result_omits_payload() {
        let (captured, encoded) = sample();
        let data = RecordingData::from_encoded(
            &captured,
            &encoded,
            Some("file:///tmp/rec.flac".into()),
            false,
        );

        assert!(data.record_data_base64.is_none());
        assert_eq!(data.ms_duration, 4200);
        assert!(data.is_usable());
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({ "value": { "msDuration": 4200, "mimeType": "audio/flac", "uri": "file:///tmp/rec.flac" } })
        );
    }

    #[test]
    fn unpersisted_result_always_inlines_payload() {
        let (captured, encoded) = sample();
        let data = RecordingData::from_encoded(&captured, &encoded, None, false);
        assert_eq!(data.record_data_base64.as_deref(), Some("CQkJ"));
        assert!(data.uri.is_none());
        assert!(data.is_usable());
    }

    #[test]
    fn inline_payload_on_request() {
        let (captured, encoded) = sample();
        let data = RecordingData::from_encoded(&captured, &encoded, Some("file:///x".into()), true);
        assert!(data.record_data_base64.is_some());
        assert!(data.uri.is_some());
    }

    #[test]
    fn deserializes_wire_shape() {
        let data: RecordingData = serde_json::from_value(json!({
            "value": { "recordDataBase64": "AAAA", "msDuration": 10, "mimeType": "audio/wav" }
        }))
        .unwrap();
        assert_eq!(data.record_data_base64.as_deref(), Some("AAAA"));
        assert_eq!(data.ms_duration, 10);
        assert!(data.uri.is_none());
    }
}
