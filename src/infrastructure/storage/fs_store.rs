//! Filesystem recording store

use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;
use url::Url;

use crate::application::ports::{RecordingStore, StorageError};
use crate::domain::recording::{AudioFormat, EncodedAudio};
use crate::domain::storage::{Directory, RecordingOptions};

/// Namespace appended to every per-user base directory
const APP_DIR: &str = "voice-recorder";

/// Writes recordings below the platform directories from `dirs`
#[derive(Debug, Clone, Default)]
pub struct FsRecordingStore {
    root: Option<PathBuf>,
}

impl FsRecordingStore {
    /// Store backed by the platform's standard directories
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Store that maps every [`Directory`] to a sub-folder of `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Base folder for a directory choice
    pub fn base(&self, directory: Directory) -> Result<PathBuf, StorageError> {
        if let Some(root) = &self.root {
            return Ok(root.join(directory.as_str().to_lowercase()));
        }

        let base = match directory {
            Directory::Documents => dirs::document_dir(),
            Directory::Data => dirs::data_dir(),
            Directory::Library | Directory::LibraryNoCloud => dirs::data_local_dir(),
            Directory::Cache | Directory::ExternalCache => dirs::cache_dir(),
            Directory::External | Directory::ExternalStorage => dirs::home_dir(),
            Directory::Temporary => Some(std::env::temp_dir()),
        };

        base.map(|dir| dir.join(APP_DIR))
            .ok_or(StorageError::DirectoryUnavailable(directory))
    }

    /// Relative, naming at least one entry and free of `..`, root or prefix components
    fn validate_relative(value: &str) -> Result<&Path, StorageError> {
        let path = Path::new(value);
        let mut named = false;

        for component in path.components() {
            match component {
                Component::Normal(_) => named = true,
                Component::CurDir => {}
                _ => return Err(StorageError::InvalidPath(value.to_string())),
            }
        }

        if named {
            Ok(path)
        } else {
            Err(StorageError::InvalidPath(value.to_string()))
        }
    }

    /// Like [`Self::validate_relative`], but a trailing separator names a directory
    fn validate_file_path(value: &str) -> Result<&Path, StorageError> {
        if value.ends_with('/') || value.ends_with(std::path::MAIN_SEPARATOR) {
            return Err(StorageError::InvalidPath(value.to_string()));
        }
        Self::validate_relative(value)
    }

    fn generated_file_name(format: AudioFormat) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        format!("recording-{}.{}", millis, format.extension())
    }

    fn file_uri(path: &Path) -> Result<String, StorageError> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|e| StorageError::WriteFailed(e.to_string()))?
                .join(path)
        };
        Url::from_file_path(&absolute)
            .map(String::from)
            .map_err(|()| StorageError::InvalidPath(absolute.display().to_string()))
    }
}

#[async_trait]
impl RecordingStore for FsRecordingStore {
    fn resolve(
        &self,
        options: &RecordingOptions,
        format: AudioFormat,
    ) -> Result<PathBuf, StorageError> {
        let mut target = self.base(options.anchor())?;

        if let Some(sub_directory) = &options.sub_directory {
            target.push(Self::validate_relative(sub_directory)?);
        }

        match &options.path {
            Some(path) => target.push(Self::validate_file_path(path)?),
            None => target.push(Self::generated_file_name(format)),
        }

        Ok(target)
    }

    async fn persist(&self, path: &Path, audio: &EncodedAudio) -> Result<String, StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::WriteFailed(format!("{}: {}", parent.display(), e)))?;
        }

        fs::write(path, audio.data())
            .await
            .map_err(|e| StorageError::WriteFailed(format!("{}: {}", path.display(), e)))?;

        debug!(path = %path.display(), size = audio.human_readable_size(), "recording written");
        Self::file_uri(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn resolve_is_deterministic_with_path() {
        let dir = TempDir::new().unwrap();
        let store = FsRecordingStore::with_root(dir.path());
        let options = RecordingOptions::in_directory(Directory::Documents)
            .with_sub_directory("memos")
            .with_path("take1.flac");

        let first = store.resolve(&options, AudioFormat::Flac).unwrap();
        let second = store.resolve(&options, AudioFormat::Flac).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, dir.path().join("documents").join("memos").join("take1.flac"));
    }

    #[test]
    fn generated_name_uses_format_extension() {
        let store = FsRecordingStore::with_root("/tmp/vr");
        let path = store
            .resolve(&RecordingOptions::in_directory(Directory::Cache), AudioFormat::Wav)
            .unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("recording-"));
        assert!(name.ends_with(".wav"));
    }

    #[test]
    fn rejects_escaping_paths() {
        let store = FsRecordingStore::with_root("/tmp/vr");
        for bad in ["../x.flac", "/etc/passwd", "a/../../b", "", ".", "./", "./.", "memos/"] {
            let options = RecordingOptions::in_directory(Directory::Data).with_path(bad);
            assert!(
                matches!(store.resolve(&options, AudioFormat::Flac), Err(StorageError::InvalidPath(_))),
                "accepted {:?}",
                bad
            );
        }

        for bad in ["../up", "."] {
            let options = RecordingOptions::in_directory(Directory::Data).with_sub_directory(bad);
            assert!(store.resolve(&options, AudioFormat::Flac).is_err(), "accepted {:?}", bad);
        }

        let options = RecordingOptions::in_directory(Directory::Data)
            .with_sub_directory("memos/")
            .with_path("./take.flac");
        assert_eq!(
            store.resolve(&options, AudioFormat::Flac).unwrap(),
            Path::new("/tmp/vr/data/memos/take.flac")
        );
    }

    #[test]
    fn platform_bases_are_namespaced() {
        let store = FsRecordingStore::new();
        if let Ok(base) = store.base(Directory::Cache) {
            assert!(base.ends_with(APP_DIR));
        }
        assert!(store.base(Directory::Temporary).unwrap().starts_with(std::env::temp_dir()));
    }

    #[tokio::test]
    async fn persist_creates_parents_and_returns_uri() {
        let dir = TempDir::new().unwrap();
        let store = FsRecordingStore::with_root(dir.path());
        let options = RecordingOptions::in_directory(Directory::Cache)
            .with_sub_directory("deep/nested")
            .with_path("clip.wav");
        let path = store.resolve(&options, AudioFormat::Wav).unwrap();

        let audio = EncodedAudio::new(vec![1, 2, 3], AudioFormat::Wav);
        let uri = store.persist(&path, &audio).await.unwrap();

        assert_eq!(Url::parse(&uri).unwrap().to_file_path().unwrap(), path);
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn uri_escapes_spaces() {
        let dir = TempDir::new().unwrap();
        let store = FsRecordingStore::with_root(dir.path());
        let options = RecordingOptions::in_directory(Directory::Documents).with_path("team sync.flac");
        let path = store.resolve(&options, AudioFormat::Flac).unwrap();

        let uri = store
            .persist(&path, &EncodedAudio::new(vec![0], AudioFormat::Flac))
            .await
            .unwrap();

        assert!(uri.starts_with("file://"));
        assert!(uri.ends_with("team%20sync.flac"));
        assert_eq!(Url::parse(&uri).unwrap().to_file_path().unwrap(), path);
    }
}
