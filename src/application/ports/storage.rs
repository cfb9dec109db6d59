//! Recording storage port interface

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::{AudioFormat, EncodedAudio};
use crate::domain::storage::{Directory, RecordingOptions};

/// Storage errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Invalid output path \"{0}\": must be relative and must not contain '..'")]
    InvalidPath(String),

    #[error("Directory {0} is not available on this platform")]
    DirectoryUnavailable(Directory),

    #[error("Failed to write recording: {0}")]
    WriteFailed(String),
}

/// Port for persisting finished recordings
#[async_trait]
pub trait RecordingStore: Send + Sync {
    /// Resolve the file a recording with these options is written to.
    ///
    /// The same directory, sub-directory and path always resolve to the same
    /// file. When `path` is unset a file name is generated with the
    /// extension of `format`.
    fn resolve(
        &self,
        options: &RecordingOptions,
        format: AudioFormat,
    ) -> Result<PathBuf, StorageError>;

    /// Write the encoded audio to `path`, creating parent directories.
    ///
    /// # Returns
    /// The `file://` URI of the written file
    async fn persist(&self, path: &Path, audio: &EncodedAudio) -> Result<String, StorageError>;
}
