//! Recorder configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::error::DurationParseError;
use crate::domain::recording::{AudioFormat, Duration};
use crate::domain::storage::{Directory, RecordingOptions};

/// Recorder configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecorderConfig {
    pub directory: Option<String>,
    pub sub_directory: Option<String>,
    pub format: Option<String>,
    pub max_duration: Option<String>,
    pub include_base64: Option<bool>,
}

impl RecorderConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            directory: None,
            sub_directory: None,
            format: Some("flac".to_string()),
            max_duration: Some("5m".to_string()),
            include_base64: Some(false),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            directory: other.directory.or(self.directory),
            sub_directory: other.sub_directory.or(self.sub_directory),
            format: other.format.or(self.format),
            max_duration: other.max_duration.or(self.max_duration),
            include_base64: other.include_base64.or(self.include_base64),
        }
    }

    /// Configured directory, ignoring unparseable values
    pub fn directory_or_none(&self) -> Option<Directory> {
        self.directory.as_ref().and_then(|s| s.parse().ok())
    }

    /// Get format as parsed AudioFormat, or FLAC if not set/invalid
    pub fn format_or_default(&self) -> AudioFormat {
        self.format
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get max_duration as parsed Duration, or the default if not set.
    /// A set but unparsable value is an error.
    pub fn max_duration_or_default(&self) -> Result<Duration, DurationParseError> {
        match &self.max_duration {
            Some(s) => s.parse(),
            None => Ok(Duration::default_max_duration()),
        }
    }

    /// Get include_base64 setting, or false if not set
    pub fn include_base64_or_default(&self) -> bool {
        self.include_base64.unwrap_or(false)
    }

    /// Output location applied when a caller leaves fields unset
    pub fn default_options(&self) -> RecordingOptions {
        RecordingOptions {
            directory: self.directory_or_none(),
            sub_directory: self.sub_directory.clone(),
            path: None,
        }
    }
}
