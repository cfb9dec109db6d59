//! WAV encoding via hound

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::application::ports::EncodingError;
use crate::domain::recording::{AudioFormat, CapturedAudio};

fn encode_error(err: hound::Error) -> EncodingError {
    EncodingError::Encode {
        format: AudioFormat::Wav,
        message: err.to_string(),
    }
}

/// Encode mono 16-bit PCM as a RIFF/WAVE byte buffer
pub fn encode_wav(audio: &CapturedAudio) -> Result<Vec<u8>, EncodingError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: audio.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(44 + audio.samples().len() * 2));
    {
        let mut writer = WavWriter::new(&mut cursor, spec).map_err(encode_error)?;
        for &sample in audio.samples() {
            writer.write_sample(sample).map_err(encode_error)?;
        }
        writer.finalize().map_err(encode_error)?;
    }

    Ok(cursor.into_inner())
}
