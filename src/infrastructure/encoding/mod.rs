//! Audio encoder adapters

mod flac;
mod wav;

pub use flac::encode_flac;
pub use wav::encode_wav;

use crate::application::ports::{AudioEncoder, EncodingError};
use crate::domain::recording::{AudioFormat, CapturedAudio, EncodedAudio};

/// Encoder covering every [`AudioFormat`]
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEncoder;

impl StandardEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl AudioEncoder for StandardEncoder {
    fn encode(
        &self,
        audio: &CapturedAudio,
        format: AudioFormat,
    ) -> Result<EncodedAudio, EncodingError> {
        let data = match format {
            AudioFormat::Flac => encode_flac(audio)?,
            AudioFormat::Wav => encode_wav(audio)?,
        };
        Ok(EncodedAudio::new(data, format))
    }
}
