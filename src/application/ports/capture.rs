//! Audio capture port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::CapturedAudio;

/// Capture device errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("No audio input device available")]
    NoAudioDevice,

    #[error("Access to the microphone was denied: {0}")]
    PermissionDenied(String),

    #[error("Microphone is in use: {0}")]
    DeviceBusy(String),

    #[error("Failed to start capture: {0}")]
    StartFailed(String),

    #[error("Capture failed: {0}")]
    StreamFailed(String),

    #[error("No capture in progress")]
    NotCapturing,
}

/// Port for the platform microphone.
///
/// Implementations hold at most one open capture. Samples arriving while
/// paused are discarded.
#[async_trait]
pub trait AudioCapture: Send + Sync {
    /// Whether an input device exists that could record.
    async fn is_available(&self) -> bool;

    /// Whether the process may read from the input device.
    async fn has_permission(&self) -> Result<bool, CaptureError>;

    /// Ask the platform for microphone access, prompting where supported.
    ///
    /// # Returns
    /// Whether access is granted afterwards
    async fn request_permission(&self) -> Result<bool, CaptureError>;

    /// Open the input stream and start collecting samples.
    async fn begin(&self) -> Result<(), CaptureError>;

    /// Stop collecting samples without closing the stream.
    async fn pause(&self) -> Result<(), CaptureError>;

    /// Continue collecting samples after [`AudioCapture::pause`].
    async fn resume(&self) -> Result<(), CaptureError>;

    /// Close the stream and hand back everything collected.
    async fn finish(&self) -> Result<CapturedAudio, CaptureError>;

    /// Milliseconds of audio collected so far, pauses excluded
    fn elapsed_ms(&self) -> u64;
}
