//! Domain layer - Core recording model
//!
//! Contains value objects, the recording session state machine, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod recording;
pub mod response;
pub mod storage;

// Re-export common types
pub use config::RecorderConfig;
pub use error::*;
pub use recording::{
    AudioFormat, Base64String, CapturedAudio, CurrentRecordingStatus, Duration, EncodedAudio,
    InvalidStateTransition, RecordingData, RecordingSession, RecordingStatus,
};
pub use response::GenericResponse;
pub use storage::{Directory, RecordingOptions};
