//! Voice recorder contract

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::{
    CurrentRecordingStatus, InvalidStateTransition, RecordingData, SessionAction,
};
use crate::domain::response::GenericResponse;
use crate::domain::storage::RecordingOptions;

use super::ports::{CaptureError, EncodingError, StorageError};

/// Failures of a recorder operation.
///
/// Expected yes/no outcomes are reported through [`GenericResponse`];
/// everything here is a real failure the caller has to handle.
#[derive(Debug, Clone, Error)]
pub enum VoiceRecorderError {
    #[error("This device cannot record audio")]
    DeviceCannotVoiceRecord,

    #[error("Missing permission to record audio")]
    MissingPermission,

    #[error("Could not query microphone permission: {0}")]
    PermissionQueryFailed(String),

    #[error("Microphone is being used by another application")]
    MicrophoneBeingUsed,

    #[error("A recording is already in progress")]
    AlreadyRecording,

    #[error("Recording has not started")]
    RecordingHasNotStarted,

    #[error("Failed to record: {0}")]
    FailedToRecord(String),

    #[error("Recording is empty")]
    EmptyRecording,

    #[error("Failed to fetch recording: {0}")]
    FailedToFetchRecording(String),

    #[error("{0}")]
    InvalidPath(String),
}

impl VoiceRecorderError {
    /// Stable machine-readable code
    pub const fn code(&self) -> &'static str {
        match self {
            Self::DeviceCannotVoiceRecord => "DEVICE_CANNOT_VOICE_RECORD",
            Self::MissingPermission => "MISSING_PERMISSION",
            Self::PermissionQueryFailed(_) => "COULD_NOT_QUERY_PERMISSION_STATUS",
            Self::MicrophoneBeingUsed => "MICROPHONE_BEING_USED",
            Self::AlreadyRecording => "ALREADY_RECORDING",
            Self::RecordingHasNotStarted => "RECORDING_HAS_NOT_STARTED",
            Self::FailedToRecord(_) => "FAILED_TO_RECORD",
            Self::EmptyRecording => "EMPTY_RECORDING",
            Self::FailedToFetchRecording(_) => "FAILED_TO_FETCH_RECORDING",
            Self::InvalidPath(_) => "INVALID_PATH",
        }
    }
}

impl From<InvalidStateTransition> for VoiceRecorderError {
    fn from(err: InvalidStateTransition) -> Self {
        match err.action {
            SessionAction::Start if err.current.is_active() => Self::AlreadyRecording,
            _ => Self::RecordingHasNotStarted,
        }
    }
}

impl From<CaptureError> for VoiceRecorderError {
    fn from(err: CaptureError) -> Self {
        match err {
            CaptureError::NoAudioDevice => Self::DeviceCannotVoiceRecord,
            CaptureError::PermissionDenied(_) => Self::MissingPermission,
            CaptureError::DeviceBusy(_) => Self::MicrophoneBeingUsed,
            CaptureError::NotCapturing => Self::RecordingHasNotStarted,
            CaptureError::StartFailed(_) | CaptureError::StreamFailed(_) => {
                Self::FailedToRecord(err.to_string())
            }
        }
    }
}

impl From<StorageError> for VoiceRecorderError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidPath(_) => Self::InvalidPath(err.to_string()),
            StorageError::DirectoryUnavailable(_) | StorageError::WriteFailed(_) => {
                Self::FailedToFetchRecording(err.to_string())
            }
        }
    }
}

impl From<EncodingError> for VoiceRecorderError {
    fn from(err: EncodingError) -> Self {
        Self::FailedToFetchRecording(err.to_string())
    }
}

/// The operations an audio-recording capability provider supports.
///
/// Every call is an independent request; ordering is whatever the caller
/// imposes by awaiting one call before issuing the next.
#[async_trait]
pub trait VoiceRecorderPlugin: Send + Sync {
    /// Capability probe, no side effects.
    async fn can_device_voice_record(&self) -> Result<GenericResponse, VoiceRecorderError>;

    /// Ask for microphone access. May show a platform prompt.
    async fn request_audio_recording_permission(
        &self,
    ) -> Result<GenericResponse, VoiceRecorderError>;

    /// Whether microphone access is currently granted.
    async fn has_audio_recording_permission(&self)
        -> Result<GenericResponse, VoiceRecorderError>;

    /// Begin capturing. Status becomes RECORDING.
    async fn start_recording(
        &self,
        options: Option<RecordingOptions>,
    ) -> Result<GenericResponse, VoiceRecorderError>;

    /// End capturing and finalize the output. Status becomes NONE.
    async fn stop_recording(&self) -> Result<RecordingData, VoiceRecorderError>;

    /// RECORDING -> PAUSED. Resolves `false` when already paused.
    async fn pause_recording(&self) -> Result<GenericResponse, VoiceRecorderError>;

    /// PAUSED -> RECORDING. Resolves `false` when not paused.
    async fn resume_recording(&self) -> Result<GenericResponse, VoiceRecorderError>;

    /// Current lifecycle state.
    async fn get_current_status(&self) -> Result<CurrentRecordingStatus, VoiceRecorderError>;
}
