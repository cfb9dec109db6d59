//! Audio encoder port interface

use thiserror::Error;

use crate::domain::recording::{AudioFormat, CapturedAudio, EncodedAudio};

/// Encoding errors
#[derive(Debug, Clone, Error)]
pub enum EncodingError {
    #[error("{format} encoder configuration error: {message}")]
    Config {
        format: AudioFormat,
        message: String,
    },

    #[error("{format} encoding failed: {message}")]
    Encode {
        format: AudioFormat,
        message: String,
    },
}

/// Port for turning captured PCM into a container format.
///
/// Encoding is CPU-bound; callers run it off the async executor.
pub trait AudioEncoder: Send + Sync + 'static {
    fn encode(
        &self,
        audio: &CapturedAudio,
        format: AudioFormat,
    ) -> Result<EncodedAudio, EncodingError>;
}
