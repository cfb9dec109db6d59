//! Recording session state machine

use std::fmt;

use thiserror::Error;

use super::status::RecordingStatus;

/// Session transitions a caller can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionAction {
    Start,
    Pause,
    Resume,
    Stop,
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Stop => "stop",
        };
        write!(f, "{} recording", verb)
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid state transition: cannot {action} while status is {current}")]
pub struct InvalidStateTransition {
    pub current: RecordingStatus,
    pub action: SessionAction,
}

/// Recording session entity.
///
/// State machine:
///   NONE -> RECORDING (start)
///   RECORDING -> PAUSED (pause)
///   PAUSED -> RECORDING (resume)
///   RECORDING | PAUSED -> NONE (stop)
#[derive(Debug, Default)]
pub struct RecordingSession {
    status: RecordingStatus,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> RecordingStatus {
        self.status
    }

    pub fn is_idle(&self) -> bool {
        self.status == RecordingStatus::None
    }

    pub fn is_recording(&self) -> bool {
        self.status == RecordingStatus::Recording
    }

    pub fn is_paused(&self) -> bool {
        self.status == RecordingStatus::Paused
    }

    /// Transition from NONE to RECORDING
    pub fn start(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(SessionAction::Start, RecordingStatus::Recording, |s| {
            s == RecordingStatus::None
        })
    }

    /// Transition from RECORDING to PAUSED
    pub fn pause(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(SessionAction::Pause, RecordingStatus::Paused, |s| {
            s == RecordingStatus::Recording
        })
    }

    /// Transition from PAUSED to RECORDING
    pub fn resume(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(SessionAction::Resume, RecordingStatus::Recording, |s| {
            s == RecordingStatus::Paused
        })
    }

    /// Transition from RECORDING or PAUSED to NONE
    pub fn stop(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(SessionAction::Stop, RecordingStatus::None, |s| s.is_active())
    }

    /// Force the session back to NONE, e.g. after the capture device failed.
    pub fn reset(&mut self) {
        self.status = RecordingStatus::None;
    }

    fn transition(
        &mut self,
        action: SessionAction,
        next: RecordingStatus,
        allowed: impl Fn(RecordingStatus) -> bool,
    ) -> Result<(), InvalidStateTransition> {
        if !allowed(self.status) {
            return Err(InvalidStateTransition {
                current: self.status,
                action,
            });
        }
        self.status = next;
        Ok(())
    }
}
