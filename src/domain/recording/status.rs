//! Recording lifecycle status

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::StatusParseError;

/// The three lifecycle states a recorder exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordingStatus {
    Recording,
    Paused,
    #[default]
    None,
}

impl RecordingStatus {
    /// Wire representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recording => "RECORDING",
            Self::Paused => "PAUSED",
            Self::None => "NONE",
        }
    }

    /// True while a capture is open (recording or paused)
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Recording | Self::Paused)
    }
}

impl fmt::Display for RecordingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordingStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RECORDING" => Ok(Self::Recording),
            "PAUSED" => Ok(Self::Paused),
            "NONE" => Ok(Self::None),
            _ => Err(StatusParseError {
                input: s.to_string(),
            }),
        }
    }
}

/// Response of a status query: `{"status": "RECORDING"}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentRecordingStatus {
    pub status: RecordingStatus,
}

impl CurrentRecordingStatus {
    pub const fn new(status: RecordingStatus) -> Self {
        Self { status }
    }
}

impl From<RecordingStatus> for CurrentRecordingStatus {
    fn from(status: RecordingStatus) -> Self {
        Self::new(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_screaming_strings() {
        assert_eq!(
            serde_json::to_string(&RecordingStatus::Recording).unwrap(),
            "\"RECORDING\""
        );
        assert_eq!(
            serde_json::to_string(&RecordingStatus::None).unwrap(),
            "\"NONE\""
        );
    }

    #[test]
    fn current_status_shape() {
        let json = serde_json::to_value(CurrentRecordingStatus::new(RecordingStatus::Paused)).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "PAUSED" }));
    }

    #[test]
    fn parse_matches_display() {
        for status in [
            RecordingStatus::Recording,
            RecordingStatus::Paused,
            RecordingStatus::None,
        ] {
            assert_eq!(status.to_string().parse::<RecordingStatus>().unwrap(), status);
        }
        assert!("recording".parse::<RecordingStatus>().is_err());
    }

    #[test]
    fn default_is_none_and_inactive() {
        assert_eq!(RecordingStatus::default(), RecordingStatus::None);
        assert!(!RecordingStatus::None.is_active());
        assert!(RecordingStatus::Paused.is_active());
    }
}
