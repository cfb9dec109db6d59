//! Recording domain module

mod audio;
mod data;
mod duration;
mod session;
mod status;

pub use audio::{AudioFormat, CapturedAudio, EncodedAudio};
pub use data::{Base64String, RecordingData};
pub use duration::{Duration, DEFAULT_MAX_DURATION_SECS};
pub use session::{InvalidStateTransition, RecordingSession, SessionAction};
pub use status::{CurrentRecordingStatus, RecordingStatus};
