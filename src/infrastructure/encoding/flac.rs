//! FLAC encoding via flacenc
//!
//! Lossless and roughly 40% of the WAV size for speech.

use flacenc::bitsink::ByteSink;
use flacenc::component::BitRepr;
use flacenc::config;
use flacenc::error::Verify;
use flacenc::source::MemSource;

use crate::application::ports::EncodingError;
use crate::domain::recording::{AudioFormat, CapturedAudio};

/// Bits per sample (16-bit audio)
const BITS_PER_SAMPLE: usize = 16;

/// Number of channels (mono)
const CHANNELS: usize = 1;

fn config_error(message: impl Into<String>) -> EncodingError {
    EncodingError::Config {
        format: AudioFormat::Flac,
        message: message.into(),
    }
}

fn encode_error(message: impl Into<String>) -> EncodingError {
    EncodingError::Encode {
        format: AudioFormat::Flac,
        message: message.into(),
    }
}

/// Encode mono 16-bit PCM to a FLAC stream at the capture's sample rate
pub fn encode_flac(audio: &CapturedAudio) -> Result<Vec<u8>, EncodingError> {
    // flacenc works on i32 samples
    let samples: Vec<i32> = audio.samples().iter().map(|&s| s as i32).collect();

    let config = config::Encoder::default()
        .into_verified()
        .map_err(|(_, e)| config_error(format!("{:?}", e)))?;

    let source = MemSource::from_samples(
        &samples,
        CHANNELS,
        BITS_PER_SAMPLE,
        audio.sample_rate() as usize,
    );

    let stream = flacenc::encode_with_fixed_block_size(&config, source, config.block_size)
        .map_err(|e| encode_error(format!("{:?}", e)))?;

    let mut sink = ByteSink::new();
    stream
        .write(&mut sink)
        .map_err(|e| encode_error(e.to_string()))?;

    Ok(sink.into_inner())
}
