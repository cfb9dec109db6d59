//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod capture;
pub mod config;
pub mod encoder;
pub mod storage;

// Re-export common types
pub use capture::{AudioCapture, CaptureError};
pub use config::ConfigStore;
pub use encoder::{AudioEncoder, EncodingError};
pub use storage::{RecordingStore, StorageError};
