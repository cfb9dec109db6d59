//! Infrastructure layer - Adapter implementations
//!
//! Concrete implementations of the port interfaces, integrating with
//! cpal, the FLAC/WAV encoders, the filesystem and XDG config.

pub mod capture;
pub mod config;
pub mod encoding;
pub mod storage;

pub use capture::CpalCapture;
pub use config::XdgConfigStore;
pub use encoding::StandardEncoder;
pub use storage::FsRecordingStore;
