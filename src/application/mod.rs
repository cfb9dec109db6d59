//! Application layer - Use cases and port interfaces
//!
//! Contains the recorder contract, the use case implementing it,
//! and trait definitions for external system interactions.

pub mod plugin;
pub mod ports;
pub mod voice_recorder;

// Re-export use cases
pub use plugin::{VoiceRecorderError, VoiceRecorderPlugin};
pub use voice_recorder::{RecorderSettings, VoiceRecorder};
