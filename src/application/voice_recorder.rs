//! Voice recorder use case
//!
//! Owns the recording session for one capture device. All state lives in
//! this value; two recorders never share a session.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::config::RecorderConfig;
use crate::domain::recording::{
    AudioFormat, CurrentRecordingStatus, RecordingData, RecordingSession, RecordingStatus,
};
use crate::domain::response::GenericResponse;
use crate::domain::storage::RecordingOptions;

use super::plugin::{VoiceRecorderError, VoiceRecorderPlugin};
use super::ports::{AudioCapture, AudioEncoder, RecordingStore};

/// Settings a recorder applies to every recording
#[derive(Debug, Clone, Default)]
pub struct RecorderSettings {
    /// Container format of finished recordings
    pub format: AudioFormat,
    /// Inline the base64 payload even when the file was written
    pub include_base64: bool,
    /// Location used for option fields a caller leaves unset
    pub default_options: RecordingOptions,
}

impl From<&RecorderConfig> for RecorderSettings {
    fn from(config: &RecorderConfig) -> Self {
        Self {
            format: config.format_or_default(),
            include_base64: config.include_base64_or_default(),
            default_options: config.default_options(),
        }
    }
}

#[derive(Debug, Default)]
struct ActiveRecording {
    session: RecordingSession,
    /// File the current recording is written to on stop
    target: Option<PathBuf>,
}

/// Recorder bound to one capture device, store and encoder
pub struct VoiceRecorder<C, S, E>
where
    C: AudioCapture,
    S: RecordingStore,
    E: AudioEncoder,
{
    capture: C,
    store: S,
    encoder: Arc<E>,
    settings: RecorderSettings,
    active: Mutex<ActiveRecording>,
}

impl<C, S, E> VoiceRecorder<C, S, E>
where
    C: AudioCapture,
    S: RecordingStore,
    E: AudioEncoder,
{
    /// Create a new recorder instance
    pub fn new(capture: C, store: S, encoder: E, settings: RecorderSettings) -> Self {
        Self {
            capture,
            store,
            encoder: Arc::new(encoder),
            settings,
            active: Mutex::new(ActiveRecording::default()),
        }
    }

    /// Milliseconds captured by the current recording, pauses excluded
    pub fn elapsed_ms(&self) -> u64 {
        self.capture.elapsed_ms()
    }

    pub async fn status(&self) -> RecordingStatus {
        self.active.lock().await.session.status()
    }

    fn output_target(
        &self,
        options: Option<RecordingOptions>,
    ) -> Result<Option<PathBuf>, VoiceRecorderError> {
        let options = options
            .unwrap_or_default()
            .or(self.settings.default_options.clone());

        if !options.is_persistent() {
            return Ok(None);
        }

        let path = self.store.resolve(&options, self.settings.format)?;
        Ok(Some(path))
    }
}

#[async_trait]
impl<C, S, E> VoiceRecorderPlugin for VoiceRecorder<C, S, E>
where
    C: AudioCapture,
    S: RecordingStore,
    E: AudioEncoder,
{
    async fn can_device_voice_record(&self) -> Result<GenericResponse, VoiceRecorderError> {
        Ok(GenericResponse::from_bool(self.capture.is_available().await))
    }

    async fn request_audio_recording_permission(
        &self,
    ) -> Result<GenericResponse, VoiceRecorderError> {
        if self.has_audio_recording_permission().await?.value {
            return Ok(GenericResponse::success());
        }

        let granted = self
            .capture
            .request_permission()
            .await
            .map_err(|e| VoiceRecorderError::PermissionQueryFailed(e.to_string()))?;
        info!(granted, "microphone permission requested");
        Ok(GenericResponse::from_bool(granted))
    }

    async fn has_audio_recording_permission(
        &self,
    ) -> Result<GenericResponse, VoiceRecorderError> {
        let granted = self
            .capture
            .has_permission()
            .await
            .map_err(|e| VoiceRecorderError::PermissionQueryFailed(e.to_string()))?;
        Ok(GenericResponse::from_bool(granted))
    }

    async fn start_recording(
        &self,
        options: Option<RecordingOptions>,
    ) -> Result<GenericResponse, VoiceRecorderError> {
        let mut active = self.active.lock().await;

        if !self.capture.is_available().await {
            return Err(VoiceRecorderError::DeviceCannotVoiceRecord);
        }
        if !self.has_audio_recording_permission().await?.value {
            return Err(VoiceRecorderError::MissingPermission);
        }
        if active.session.status().is_active() {
            return Err(VoiceRecorderError::AlreadyRecording);
        }

        let target = self.output_target(options)?;

        active.session.start()?;

        if let Err(e) = self.capture.begin().await {
            warn!(error = %e, "capture failed to start");
            active.session.reset();
            return Err(e.into());
        }

        debug!(output = ?target, format = %self.settings.format, "recording started");
        active.target = target;
        Ok(GenericResponse::success())
    }

    async fn stop_recording(&self) -> Result<RecordingData, VoiceRecorderError> {
        let mut active = self.active.lock().await;

        active.session.stop()?;
        let target = active.target.take();

        let captured = self
            .capture
            .finish()
            .await
            .map_err(|e| VoiceRecorderError::FailedToFetchRecording(e.to_string()))?;

        if captured.is_empty() {
            return Err(VoiceRecorderError::EmptyRecording);
        }

        let format = self.settings.format;
        let encoder = Arc::clone(&self.encoder);
        let to_encode = captured.clone();
        let encoded = tokio::task::spawn_blocking(move || encoder.encode(&to_encode, format))
            .await
            .map_err(|e| {
                VoiceRecorderError::FailedToFetchRecording(format!("Encode task error: {}", e))
            })??;

        let uri = match target {
            Some(path) => Some(self.store.persist(&path, &encoded).await?),
            None => None,
        };

        info!(
            ms = captured.duration().as_millis(),
            size = %encoded.human_readable_size(),
            uri = uri.as_deref().unwrap_or("-"),
            "recording finished"
        );

        Ok(RecordingData::from_encoded(
            &captured,
            &encoded,
            uri,
            self.settings.include_base64,
        ))
    }

    async fn pause_recording(&self) -> Result<GenericResponse, VoiceRecorderError> {
        let mut active = self.active.lock().await;

        match active.session.status() {
            RecordingStatus::None => Err(VoiceRecorderError::RecordingHasNotStarted),
            RecordingStatus::Paused => Ok(GenericResponse::fail()),
            RecordingStatus::Recording => {
                self.capture.pause().await?;
                active.session.pause()?;
                debug!("recording paused");
                Ok(GenericResponse::success())
            }
        }
    }

    async fn resume_recording(&self) -> Result<GenericResponse, VoiceRecorderError> {
        let mut active = self.active.lock().await;

        match active.session.status() {
            RecordingStatus::None => Err(VoiceRecorderError::RecordingHasNotStarted),
            RecordingStatus::Recording => Ok(GenericResponse::fail()),
            RecordingStatus::Paused => {
                self.capture.resume().await?;
                active.session.resume()?;
                debug!("recording resumed");
                Ok(GenericResponse::success())
            }
        }
    }

    async fn get_current_status(&self) -> Result<CurrentRecordingStatus, VoiceRecorderError> {
        Ok(CurrentRecordingStatus::new(self.status().await))
    }
}
