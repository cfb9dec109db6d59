//! Audio value objects: output formats, raw captures and encoded recordings

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::duration::Duration;
use crate::domain::error::AudioFormatParseError;

/// Container format a finished recording is encoded to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Flac,
    Wav,
}

impl AudioFormat {
    /// Get the MIME type string
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Flac => "audio/flac",
            Self::Wav => "audio/wav",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Flac => "flac",
            Self::Wav => "wav",
        }
    }

    pub const fn as_str(&self) -> &'static str {
        self.extension()
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioFormat {
    type Err = AudioFormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flac" => Ok(Self::Flac),
            "wav" | "wave" => Ok(Self::Wav),
            _ => Err(AudioFormatParseError {
                input: s.to_string(),
            }),
        }
    }
}

/// Raw mono PCM handed back by a capture device
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedAudio {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl CapturedAudio {
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Playback length derived from the sample count
    pub fn duration(&self) -> Duration {
        Duration::from_samples(self.samples.len(), self.sample_rate)
    }
}

/// Encoded audio bytes with their container format
#[derive(Debug, Clone)]
pub struct EncodedAudio {
    data: Vec<u8>,
    format: AudioFormat,
}

impl EncodedAudio {
    pub fn new(data: Vec<u8>, format: AudioFormat) -> Self {
        Self { data, format }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }

    /// Standard-alphabet, padded base64 of the encoded bytes
    pub fn to_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_metadata() {
        assert_eq!(AudioFormat::Flac.mime_type(), "audio/flac");
        assert_eq!(AudioFormat::Wav.mime_type(), "audio/wav");
        assert_eq!(AudioFormat::Flac.extension(), "flac");
        assert_eq!(AudioFormat::default(), AudioFormat::Flac);
    }

    #[test]
    fn format_parse() {
        assert_eq!("FLAC".parse::<AudioFormat>().unwrap(), AudioFormat::Flac);
        assert_eq!("wave".parse::<AudioFormat>().unwrap(), AudioFormat::Wav);
        assert!("mp3".parse::<AudioFormat>().is_err());
    }

    #[test]
    fn captured_duration() {
        let audio = CapturedAudio::new(vec![0; 8000], 16_000);
        assert_eq!(audio.duration().as_millis(), 500);
        assert!(!audio.is_empty());
        assert!(CapturedAudio::default().is_empty());
    }

    #[test]
    fn human_readable_sizes() {
        assert_eq!(EncodedAudio::new(vec![0; 500], AudioFormat::Wav).human_readable_size(), "500 B");
        assert_eq!(EncodedAudio::new(vec![0; 2048], AudioFormat::Wav).human_readable_size(), "2.0 KB");
        assert_eq!(
            EncodedAudio::new(vec![0; 2 * 1024 * 1024], AudioFormat::Wav).human_readable_size(),
            "2.0 MB"
        );
    }

    #[test]
    fn base64_decodes_back() {
        use base64::Engine;
        let audio = EncodedAudio::new(vec![1, 2, 3, 4], AudioFormat::Flac);
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(audio.to_base64())
            .unwrap();
        assert_eq!(decoded, vec![1, 2, 3, 4]);
    }
}
